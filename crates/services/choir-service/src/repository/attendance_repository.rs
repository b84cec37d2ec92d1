//! Attendance repository.
//!
//! A member has at most one attendance row per event; recording a batch
//! upserts on `(event_id, user_id)`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use super::day_bounds;
use super::entities::attendance::{self, ActiveModel, Entity as AttendanceEntity};
use super::entities::event;
use common::{AppError, AppResult};
use domain::{AttendanceMark, AttendanceRecord};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Insert or overwrite the marks for one event in a single transaction
    async fn record(
        &self,
        event_id: i32,
        marks: Vec<AttendanceMark>,
    ) -> AppResult<Vec<AttendanceRecord>>;

    async fn list_for_event(&self, event_id: i32) -> AppResult<Vec<AttendanceRecord>>;

    /// A member's records for events starting inside `[from, to]`
    async fn list_for_user(
        &self,
        user_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<AttendanceRecord>>;
}

pub struct AttendanceStore {
    db: DatabaseConnection,
}

impl AttendanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AttendanceRepository for AttendanceStore {
    async fn record(
        &self,
        event_id: i32,
        marks: Vec<AttendanceMark>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let now = chrono::Utc::now();
        let txn = self.db.begin().await?;
        let mut records = Vec::with_capacity(marks.len());

        for mark in marks {
            let row = ActiveModel {
                event_id: Set(event_id),
                user_id: Set(mark.user_id),
                status: Set(mark.status),
                note: Set(mark.note),
                recorded_at: Set(now),
                ..Default::default()
            };
            let model = AttendanceEntity::insert(row)
                .on_conflict(
                    OnConflict::columns([attendance::Column::EventId, attendance::Column::UserId])
                        .update_columns([
                            attendance::Column::Status,
                            attendance::Column::Note,
                            attendance::Column::RecordedAt,
                        ])
                        .to_owned(),
                )
                .exec_with_returning(&txn)
                .await?;
            records.push(AttendanceRecord::from(model));
        }

        txn.commit().await?;
        tracing::debug!(event_id, count = records.len(), "Attendance recorded");
        Ok(records)
    }

    async fn list_for_event(&self, event_id: i32) -> AppResult<Vec<AttendanceRecord>> {
        let models = AttendanceEntity::find()
            .filter(attendance::Column::EventId.eq(event_id))
            .order_by_asc(attendance::Column::UserId)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn list_for_user(
        &self,
        user_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let models = AttendanceEntity::find()
            .inner_join(event::Entity)
            .filter(attendance::Column::UserId.eq(user_id))
            .filter(day_bounds(event::Column::StartsAt, from, to))
            .order_by_asc(event::Column::StartsAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(AttendanceRecord::from).collect())
    }
}
