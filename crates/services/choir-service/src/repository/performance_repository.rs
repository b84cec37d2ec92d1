//! Performance repository.
//!
//! A performance is stored across five tables. Creation and replacement write
//! the whole tree inside one transaction; deletion relies on the cascading
//! foreign keys to remove songs, musicians, voice parts and memberships.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::entities::{
    performance, performance_song, performance_song_musician, performance_voice_part,
    performance_voice_part_member,
};
use common::{AppError, AppResult, OptionExt};
use domain::{
    Performance, PerformanceDetail, PerformanceDraft, PerformanceMusician, PerformanceSong,
    PerformanceSongDraft, VoicePart,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    /// Headers only, most recent performance first
    async fn list(&self) -> AppResult<Vec<Performance>>;

    async fn find_detail(&self, id: i32) -> AppResult<Option<PerformanceDetail>>;

    async fn create(&self, draft: PerformanceDraft) -> AppResult<PerformanceDetail>;

    /// Overwrite the header and rebuild the song tree from `draft`
    async fn replace(&self, id: i32, draft: PerformanceDraft) -> AppResult<PerformanceDetail>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct PerformanceStore {
    db: DatabaseConnection,
}

impl PerformanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn insert_songs<C: ConnectionTrait>(
    conn: &C,
    performance_id: i32,
    songs: &[PerformanceSongDraft],
) -> Result<(), DbErr> {
    for draft in songs {
        let song = performance_song::ActiveModel {
            performance_id: Set(performance_id),
            song_id: Set(draft.song_id),
            song_order: Set(draft.order),
            musical_key: Set(draft.musical_key.clone()),
            notes: Set(draft.notes.clone()),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        for musician in &draft.musicians {
            performance_song_musician::ActiveModel {
                performance_song_id: Set(song.id),
                user_id: Set(musician.user_id),
                instrument: Set(musician.instrument.clone()),
                is_solo: Set(musician.is_solo),
                is_accompanist: Set(musician.is_accompanist),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }

        for part in &draft.voice_parts {
            let voice_part = performance_voice_part::ActiveModel {
                performance_song_id: Set(song.id),
                voice_type: Set(part.voice_type),
                notes: Set(part.notes.clone()),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            if part.member_ids.is_empty() {
                continue;
            }
            let members = part.member_ids.iter().map(|user_id| {
                performance_voice_part_member::ActiveModel {
                    voice_part_id: Set(voice_part.id),
                    user_id: Set(*user_id),
                }
            });
            performance_voice_part_member::Entity::insert_many(members)
                .exec_without_returning(conn)
                .await?;
        }
    }
    Ok(())
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    header: performance::Model,
) -> Result<PerformanceDetail, DbErr> {
    let songs = performance_song::Entity::find()
        .filter(performance_song::Column::PerformanceId.eq(header.id))
        .order_by_asc(performance_song::Column::SongOrder)
        .all(conn)
        .await?;
    let song_ids: Vec<i32> = songs.iter().map(|s| s.id).collect();

    let mut musicians_by_song: HashMap<i32, Vec<PerformanceMusician>> = HashMap::new();
    let mut parts_by_song: HashMap<i32, Vec<VoicePart>> = HashMap::new();

    if !song_ids.is_empty() {
        let musicians = performance_song_musician::Entity::find()
            .filter(performance_song_musician::Column::PerformanceSongId.is_in(song_ids.clone()))
            .order_by_asc(performance_song_musician::Column::Id)
            .all(conn)
            .await?;
        for musician in musicians {
            musicians_by_song
                .entry(musician.performance_song_id)
                .or_default()
                .push(PerformanceMusician::from(musician));
        }

        let parts = performance_voice_part::Entity::find()
            .filter(performance_voice_part::Column::PerformanceSongId.is_in(song_ids))
            .order_by_asc(performance_voice_part::Column::Id)
            .all(conn)
            .await?;
        let part_ids: Vec<i32> = parts.iter().map(|p| p.id).collect();

        let mut members_by_part: HashMap<i32, Vec<i32>> = HashMap::new();
        if !part_ids.is_empty() {
            let members = performance_voice_part_member::Entity::find()
                .filter(performance_voice_part_member::Column::VoicePartId.is_in(part_ids))
                .order_by_asc(performance_voice_part_member::Column::UserId)
                .all(conn)
                .await?;
            for member in members {
                members_by_part
                    .entry(member.voice_part_id)
                    .or_default()
                    .push(member.user_id);
            }
        }

        for part in parts {
            parts_by_song
                .entry(part.performance_song_id)
                .or_default()
                .push(VoicePart {
                    id: part.id,
                    voice_type: part.voice_type,
                    notes: part.notes,
                    member_ids: members_by_part.remove(&part.id).unwrap_or_default(),
                });
        }
    }

    let songs = songs
        .into_iter()
        .map(|song| PerformanceSong {
            id: song.id,
            song_id: song.song_id,
            order: song.song_order,
            musical_key: song.musical_key,
            notes: song.notes,
            musicians: musicians_by_song.remove(&song.id).unwrap_or_default(),
            voice_parts: parts_by_song.remove(&song.id).unwrap_or_default(),
        })
        .collect();

    Ok(PerformanceDetail {
        performance: Performance::from(header),
        songs,
    })
}

#[async_trait]
impl PerformanceRepository for PerformanceStore {
    async fn list(&self) -> AppResult<Vec<Performance>> {
        let models = performance::Entity::find()
            .order_by_desc(performance::Column::PerformanceDate)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Performance::from).collect())
    }

    async fn find_detail(&self, id: i32) -> AppResult<Option<PerformanceDetail>> {
        let Some(header) = performance::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(load_detail(&self.db, header).await?))
    }

    async fn create(&self, draft: PerformanceDraft) -> AppResult<PerformanceDetail> {
        let now = chrono::Utc::now();
        let txn = self.db.begin().await?;

        let header = performance::ActiveModel {
            title: Set(draft.title),
            venue: Set(draft.venue),
            performance_date: Set(draft.performance_date),
            description: Set(draft.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_songs(&txn, header.id, &draft.songs).await?;
        let detail = load_detail(&txn, header).await?;
        txn.commit().await?;

        tracing::info!(
            performance_id = detail.performance.id,
            songs = detail.songs.len(),
            "Performance created"
        );
        Ok(detail)
    }

    async fn replace(&self, id: i32, draft: PerformanceDraft) -> AppResult<PerformanceDetail> {
        let txn = self.db.begin().await?;

        let existing = performance::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found()?;

        let mut active: performance::ActiveModel = existing.into();
        active.title = Set(draft.title);
        active.venue = Set(draft.venue);
        active.performance_date = Set(draft.performance_date);
        active.description = Set(draft.description);
        active.updated_at = Set(chrono::Utc::now());
        let header = active.update(&txn).await?;

        performance_song::Entity::delete_many()
            .filter(performance_song::Column::PerformanceId.eq(id))
            .exec(&txn)
            .await?;
        insert_songs(&txn, id, &draft.songs).await?;

        let detail = load_detail(&txn, header).await?;
        txn.commit().await?;
        Ok(detail)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = performance::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
