//! Song repertoire repository.

use async_trait::async_trait;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::entities::song::{self, ActiveModel, Entity as SongEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{NewSong, Song, SongChanges};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Alphabetical; `search` matches the title case-insensitively
    async fn list(&self, search: Option<String>) -> AppResult<Vec<Song>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Song>>;

    async fn create(&self, song: NewSong) -> AppResult<Song>;

    async fn update(&self, id: i32, changes: SongChanges) -> AppResult<Song>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct SongStore {
    db: DatabaseConnection,
}

impl SongStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards so user input matches literally.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl SongRepository for SongStore {
    async fn list(&self, search: Option<String>) -> AppResult<Vec<Song>> {
        let mut query = SongEntity::find();
        if let Some(search) = search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(Expr::col(song::Column::Title).ilike(like_pattern(search)));
        }

        let models = query
            .order_by_asc(song::Column::Title)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Song::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Song>> {
        let result = SongEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Song::from))
    }

    async fn create(&self, song: NewSong) -> AppResult<Song> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            title: Set(song.title),
            composer: Set(song.composer),
            genre: Set(song.genre),
            language: Set(song.language),
            musical_key: Set(song.musical_key),
            lyrics: Set(song.lyrics),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Song::from(model))
    }

    async fn update(&self, id: i32, changes: SongChanges) -> AppResult<Song> {
        let existing = SongEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let mut active: ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(composer) = changes.composer {
            active.composer = Set(Some(composer));
        }
        if let Some(genre) = changes.genre {
            active.genre = Set(Some(genre));
        }
        if let Some(language) = changes.language {
            active.language = Set(Some(language));
        }
        if let Some(musical_key) = changes.musical_key {
            active.musical_key = Set(Some(musical_key));
        }
        if let Some(lyrics) = changes.lyrics {
            active.lyrics = Set(Some(lyrics));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Song::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = SongEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn search_wildcards_are_escaped() {
        assert_eq!(like_pattern("Ave"), "%Ave%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
