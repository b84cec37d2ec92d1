//! Songs, performances and rehearsals.

use std::sync::Arc;

use async_trait::async_trait;

use crate::repository::{PerformanceRepository, RehearsalRepository, SongRepository};
use common::{AppResult, OptionExt};
use domain::{
    ensure_not_blank, NewSong, Performance, PerformanceDetail, PerformanceDraft, Rehearsal,
    RehearsalDetail, RehearsalDraft, Song, SongChanges,
};

#[async_trait]
pub trait SongService: Send + Sync {
    /// Optional case-insensitive title search
    async fn list_songs(&self, search: Option<String>) -> AppResult<Vec<Song>>;

    async fn get_song(&self, id: i32) -> AppResult<Song>;

    async fn create_song(&self, song: NewSong) -> AppResult<Song>;

    async fn update_song(&self, id: i32, changes: SongChanges) -> AppResult<Song>;

    async fn delete_song(&self, id: i32) -> AppResult<()>;
}

pub struct SongManager {
    repo: Arc<dyn SongRepository>,
}

impl SongManager {
    pub fn new(repo: Arc<dyn SongRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SongService for SongManager {
    async fn list_songs(&self, search: Option<String>) -> AppResult<Vec<Song>> {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.repo.list(search).await
    }

    async fn get_song(&self, id: i32) -> AppResult<Song> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_song(&self, mut song: NewSong) -> AppResult<Song> {
        song.title = song.title.trim().to_string();
        ensure_not_blank(&song.title, "title")?;
        self.repo.create(song).await
    }

    async fn update_song(&self, id: i32, mut changes: SongChanges) -> AppResult<Song> {
        if let Some(title) = changes.title.as_mut() {
            *title = title.trim().to_string();
            ensure_not_blank(title, "title")?;
        }
        self.repo.update(id, changes).await
    }

    async fn delete_song(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }
}

#[async_trait]
pub trait PerformanceService: Send + Sync {
    async fn list_performances(&self) -> AppResult<Vec<Performance>>;

    /// The performance with its songs, musicians and voice parts
    async fn get_performance(&self, id: i32) -> AppResult<PerformanceDetail>;

    async fn create_performance(&self, draft: PerformanceDraft) -> AppResult<PerformanceDetail>;

    /// Replace the whole song tree; nothing is merged with the old one
    async fn replace_performance(
        &self,
        id: i32,
        draft: PerformanceDraft,
    ) -> AppResult<PerformanceDetail>;

    async fn delete_performance(&self, id: i32) -> AppResult<()>;
}

pub struct PerformanceManager {
    repo: Arc<dyn PerformanceRepository>,
}

impl PerformanceManager {
    pub fn new(repo: Arc<dyn PerformanceRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl PerformanceService for PerformanceManager {
    async fn list_performances(&self) -> AppResult<Vec<Performance>> {
        self.repo.list().await
    }

    async fn get_performance(&self, id: i32) -> AppResult<PerformanceDetail> {
        self.repo.find_detail(id).await?.ok_or_not_found()
    }

    async fn create_performance(&self, draft: PerformanceDraft) -> AppResult<PerformanceDetail> {
        draft.validate()?;
        let created = self.repo.create(draft).await?;
        tracing::info!(
            performance_id = created.performance.id,
            songs = created.songs.len(),
            "Performance created"
        );
        Ok(created)
    }

    async fn replace_performance(
        &self,
        id: i32,
        draft: PerformanceDraft,
    ) -> AppResult<PerformanceDetail> {
        draft.validate()?;
        self.repo.replace(id, draft).await
    }

    async fn delete_performance(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(performance_id = id, "Performance deleted");
        Ok(())
    }
}

#[async_trait]
pub trait RehearsalService: Send + Sync {
    async fn list_rehearsals(&self) -> AppResult<Vec<Rehearsal>>;

    async fn get_rehearsal(&self, id: i32) -> AppResult<RehearsalDetail>;

    async fn create_rehearsal(&self, draft: RehearsalDraft) -> AppResult<RehearsalDetail>;

    async fn replace_rehearsal(&self, id: i32, draft: RehearsalDraft)
        -> AppResult<RehearsalDetail>;

    async fn delete_rehearsal(&self, id: i32) -> AppResult<()>;
}

pub struct RehearsalManager {
    repo: Arc<dyn RehearsalRepository>,
}

impl RehearsalManager {
    pub fn new(repo: Arc<dyn RehearsalRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RehearsalService for RehearsalManager {
    async fn list_rehearsals(&self) -> AppResult<Vec<Rehearsal>> {
        self.repo.list().await
    }

    async fn get_rehearsal(&self, id: i32) -> AppResult<RehearsalDetail> {
        self.repo.find_detail(id).await?.ok_or_not_found()
    }

    async fn create_rehearsal(&self, draft: RehearsalDraft) -> AppResult<RehearsalDetail> {
        draft.validate()?;
        self.repo.create(draft).await
    }

    async fn replace_rehearsal(
        &self,
        id: i32,
        draft: RehearsalDraft,
    ) -> AppResult<RehearsalDetail> {
        draft.validate()?;
        self.repo.replace(id, draft).await
    }

    async fn delete_rehearsal(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockPerformanceRepository, MockRehearsalRepository, MockSongRepository};
    use chrono::Utc;
    use common::AppError;
    use domain::{PerformanceSongDraft, RehearsalSongDraft, VoicePartDraft, VoiceType};

    fn song_draft(order: i32, voice_parts: Vec<VoicePartDraft>) -> PerformanceSongDraft {
        PerformanceSongDraft {
            song_id: 1,
            order,
            musical_key: None,
            notes: None,
            musicians: vec![],
            voice_parts,
        }
    }

    fn performance(songs: Vec<PerformanceSongDraft>) -> PerformanceDraft {
        PerformanceDraft {
            title: "Easter concert".to_string(),
            venue: Some("Cathedral".to_string()),
            performance_date: Utc::now(),
            description: None,
            songs,
        }
    }

    fn voice(voice_type: VoiceType) -> VoicePartDraft {
        VoicePartDraft {
            voice_type,
            notes: None,
            member_ids: vec![],
        }
    }

    #[tokio::test]
    async fn blank_song_title_never_reaches_storage() {
        let mut repo = MockSongRepository::new();
        repo.expect_create().never();

        let service = SongManager::new(Arc::new(repo));
        let result = service
            .create_song(NewSong {
                title: "   ".to_string(),
                composer: None,
                genre: None,
                language: None,
                musical_key: None,
                lyrics: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_song_is_not_found() {
        let mut repo = MockSongRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = SongManager::new(Arc::new(repo));

        assert!(matches!(service.get_song(9).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn duplicate_voice_type_rejects_the_whole_tree() {
        let mut repo = MockPerformanceRepository::new();
        repo.expect_create().never();

        let service = PerformanceManager::new(Arc::new(repo));
        let draft = performance(vec![song_draft(
            1,
            vec![voice(VoiceType::Soprano), voice(VoiceType::Soprano)],
        )]);

        tokio_test::assert_err!(service.create_performance(draft).await);
    }

    #[tokio::test]
    async fn replacing_a_performance_revalidates_song_order() {
        let mut repo = MockPerformanceRepository::new();
        repo.expect_replace().never();

        let service = PerformanceManager::new(Arc::new(repo));
        let draft = performance(vec![song_draft(2, vec![]), song_draft(2, vec![])]);
        let result = service.replace_performance(4, draft).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn missing_rehearsal_is_not_found() {
        let mut repo = MockRehearsalRepository::new();
        repo.expect_find_detail().returning(|_| Ok(None));

        let service = RehearsalManager::new(Arc::new(repo));

        assert!(matches!(service.get_rehearsal(1).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn rehearsal_song_order_must_be_positive() {
        let mut repo = MockRehearsalRepository::new();
        repo.expect_create().never();

        let service = RehearsalManager::new(Arc::new(repo));
        let result = service
            .create_rehearsal(RehearsalDraft {
                title: "Tuesday sectionals".to_string(),
                venue: None,
                starts_at: Utc::now(),
                ends_at: None,
                performance_id: None,
                notes: None,
                rehearsal_songs: vec![RehearsalSongDraft {
                    song_id: 1,
                    musical_key: Some("C Major".to_string()),
                    order: 0,
                }],
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
