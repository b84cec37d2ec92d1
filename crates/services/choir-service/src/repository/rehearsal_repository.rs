//! Rehearsal repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::entities::{rehearsal, rehearsal_song};
use common::{AppError, AppResult, OptionExt};
use domain::{Rehearsal, RehearsalDetail, RehearsalDraft, RehearsalSong, RehearsalSongDraft};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RehearsalRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Rehearsal>>;

    async fn find_detail(&self, id: i32) -> AppResult<Option<RehearsalDetail>>;

    async fn create(&self, draft: RehearsalDraft) -> AppResult<RehearsalDetail>;

    async fn replace(&self, id: i32, draft: RehearsalDraft) -> AppResult<RehearsalDetail>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct RehearsalStore {
    db: DatabaseConnection,
}

impl RehearsalStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn insert_songs<C: ConnectionTrait>(
    conn: &C,
    rehearsal_id: i32,
    songs: &[RehearsalSongDraft],
) -> Result<(), DbErr> {
    if songs.is_empty() {
        return Ok(());
    }
    let rows = songs.iter().map(|song| rehearsal_song::ActiveModel {
        rehearsal_id: Set(rehearsal_id),
        song_id: Set(song.song_id),
        song_order: Set(song.order),
        musical_key: Set(song.musical_key.clone()),
        ..Default::default()
    });
    rehearsal_song::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    header: rehearsal::Model,
) -> Result<RehearsalDetail, DbErr> {
    let songs = rehearsal_song::Entity::find()
        .filter(rehearsal_song::Column::RehearsalId.eq(header.id))
        .order_by_asc(rehearsal_song::Column::SongOrder)
        .all(conn)
        .await?;

    Ok(RehearsalDetail {
        rehearsal: Rehearsal::from(header),
        rehearsal_songs: songs.into_iter().map(RehearsalSong::from).collect(),
    })
}

#[async_trait]
impl RehearsalRepository for RehearsalStore {
    async fn list(&self) -> AppResult<Vec<Rehearsal>> {
        let models = rehearsal::Entity::find()
            .order_by_desc(rehearsal::Column::StartsAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Rehearsal::from).collect())
    }

    async fn find_detail(&self, id: i32) -> AppResult<Option<RehearsalDetail>> {
        let Some(header) = rehearsal::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Some(load_detail(&self.db, header).await?))
    }

    async fn create(&self, draft: RehearsalDraft) -> AppResult<RehearsalDetail> {
        let now = chrono::Utc::now();
        let txn = self.db.begin().await?;

        let header = rehearsal::ActiveModel {
            title: Set(draft.title),
            venue: Set(draft.venue),
            starts_at: Set(draft.starts_at),
            ends_at: Set(draft.ends_at),
            performance_id: Set(draft.performance_id),
            notes: Set(draft.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        insert_songs(&txn, header.id, &draft.rehearsal_songs).await?;
        let detail = load_detail(&txn, header).await?;
        txn.commit().await?;
        Ok(detail)
    }

    async fn replace(&self, id: i32, draft: RehearsalDraft) -> AppResult<RehearsalDetail> {
        let txn = self.db.begin().await?;

        let existing = rehearsal::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found()?;

        let mut active: rehearsal::ActiveModel = existing.into();
        active.title = Set(draft.title);
        active.venue = Set(draft.venue);
        active.starts_at = Set(draft.starts_at);
        active.ends_at = Set(draft.ends_at);
        active.performance_id = Set(draft.performance_id);
        active.notes = Set(draft.notes);
        active.updated_at = Set(chrono::Utc::now());
        let header = active.update(&txn).await?;

        rehearsal_song::Entity::delete_many()
            .filter(rehearsal_song::Column::RehearsalId.eq(id))
            .exec(&txn)
            .await?;
        insert_songs(&txn, id, &draft.rehearsal_songs).await?;

        let detail = load_detail(&txn, header).await?;
        txn.commit().await?;
        Ok(detail)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = rehearsal::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
