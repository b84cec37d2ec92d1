//! Leadership and louado shift repositories.
//!
//! Only one leadership shift may be `Active`. Every write that makes a shift
//! active first demotes the current one to `Completed` inside the same
//! transaction; the partial unique index `uq_leadership_shifts_single_active`
//! turns a lost race into a unique violation, reported as a conflict.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::entities::leadership_shift::{self, Entity as LeadershipShiftEntity};
use super::entities::louado_shift::{self, Entity as LouadoShiftEntity};
use common::{AppError, AppResult, OptionExt};
use domain::{
    LeadershipShift, LeadershipShiftChanges, LouadoShift, LouadoShiftChanges, NewLeadershipShift,
    NewLouadoShift, ShiftStatus,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LeadershipShiftRepository: Send + Sync {
    /// Latest start date first
    async fn list(&self) -> AppResult<Vec<LeadershipShift>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<LeadershipShift>>;

    /// The shift currently `Active`, if any
    async fn find_active(&self) -> AppResult<Option<LeadershipShift>>;

    async fn create(&self, shift: NewLeadershipShift) -> AppResult<LeadershipShift>;

    async fn update(&self, id: i32, changes: LeadershipShiftChanges)
        -> AppResult<LeadershipShift>;

    /// Make the shift active, completing whichever shift was active before.
    /// Activating the active shift is a no-op.
    async fn activate(&self, id: i32) -> AppResult<LeadershipShift>;

    async fn set_status(&self, id: i32, status: ShiftStatus) -> AppResult<LeadershipShift>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct LeadershipShiftStore {
    db: DatabaseConnection,
}

impl LeadershipShiftStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn lock(txn: &DatabaseTransaction, id: i32) -> AppResult<leadership_shift::Model> {
        LeadershipShiftEntity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_not_found()
    }

    /// Complete every active shift other than `keep`.
    async fn demote_active(txn: &DatabaseTransaction, keep: Option<i32>) -> AppResult<()> {
        let mut query = LeadershipShiftEntity::find()
            .filter(leadership_shift::Column::Status.eq(ShiftStatus::Active));
        if let Some(keep) = keep {
            query = query.filter(leadership_shift::Column::Id.ne(keep));
        }

        for current in query.lock_exclusive().all(txn).await? {
            tracing::info!(shift_id = current.id, "Completing previously active shift");
            let mut active: leadership_shift::ActiveModel = current.into();
            active.status = Set(ShiftStatus::Completed);
            active.updated_at = Set(chrono::Utc::now());
            active.update(txn).await?;
        }
        Ok(())
    }

    /// Move a locked shift to `next` through the transition table.
    async fn transition(
        txn: &DatabaseTransaction,
        model: leadership_shift::Model,
        next: ShiftStatus,
    ) -> AppResult<leadership_shift::Model> {
        model.status.ensure_transition_to(next)?;
        if next == ShiftStatus::Active {
            Self::demote_active(txn, Some(model.id)).await?;
        }

        let mut active: leadership_shift::ActiveModel = model.into();
        active.status = Set(next);
        active.updated_at = Set(chrono::Utc::now());
        Ok(active.update(txn).await?)
    }
}

#[async_trait]
impl LeadershipShiftRepository for LeadershipShiftStore {
    async fn list(&self) -> AppResult<Vec<LeadershipShift>> {
        let models = LeadershipShiftEntity::find()
            .order_by_desc(leadership_shift::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(LeadershipShift::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<LeadershipShift>> {
        let result = LeadershipShiftEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(LeadershipShift::from))
    }

    async fn find_active(&self) -> AppResult<Option<LeadershipShift>> {
        let result = LeadershipShiftEntity::find()
            .filter(leadership_shift::Column::Status.eq(ShiftStatus::Active))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(LeadershipShift::from))
    }

    async fn create(&self, shift: NewLeadershipShift) -> AppResult<LeadershipShift> {
        let now = chrono::Utc::now();
        let txn = self.db.begin().await?;

        if shift.status == ShiftStatus::Active {
            Self::demote_active(&txn, None).await?;
        }

        let model = leadership_shift::ActiveModel {
            name: Set(shift.name),
            leader_id: Set(shift.leader_id),
            start_date: Set(shift.start_date),
            end_date: Set(shift.end_date),
            status: Set(shift.status),
            notes: Set(shift.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(LeadershipShift::from(model))
    }

    async fn update(
        &self,
        id: i32,
        changes: LeadershipShiftChanges,
    ) -> AppResult<LeadershipShift> {
        let txn = self.db.begin().await?;
        let mut model = Self::lock(&txn, id).await?;

        if let Some(next) = changes.status.filter(|next| *next != model.status) {
            model = Self::transition(&txn, model, next).await?;
        }

        let start_date = changes.start_date.unwrap_or(model.start_date);
        let end_date = changes.end_date.unwrap_or(model.end_date);
        domain::validation::ensure_date_range(start_date, end_date, "Shift")?;

        let mut active: leadership_shift::ActiveModel = model.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(leader_id) = changes.leader_id {
            active.leader_id = Set(leader_id);
        }
        active.start_date = Set(start_date);
        active.end_date = Set(end_date);
        if let Some(notes) = changes.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&txn).await?;
        txn.commit().await?;
        Ok(LeadershipShift::from(model))
    }

    async fn activate(&self, id: i32) -> AppResult<LeadershipShift> {
        let txn = self.db.begin().await?;
        let model = Self::lock(&txn, id).await?;

        let model = if model.status == ShiftStatus::Active {
            model
        } else {
            Self::transition(&txn, model, ShiftStatus::Active).await?
        };

        txn.commit().await?;
        tracing::info!(shift_id = id, "Leadership shift activated");
        Ok(LeadershipShift::from(model))
    }

    async fn set_status(&self, id: i32, status: ShiftStatus) -> AppResult<LeadershipShift> {
        let txn = self.db.begin().await?;
        let model = Self::lock(&txn, id).await?;
        let model = Self::transition(&txn, model, status).await?;
        txn.commit().await?;
        Ok(LeadershipShift::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = LeadershipShiftEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LouadoShiftRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<LouadoShift>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<LouadoShift>>;

    async fn create(&self, shift: NewLouadoShift) -> AppResult<LouadoShift>;

    async fn update(&self, id: i32, changes: LouadoShiftChanges) -> AppResult<LouadoShift>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct LouadoShiftStore {
    db: DatabaseConnection,
}

impl LouadoShiftStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LouadoShiftRepository for LouadoShiftStore {
    async fn list(&self) -> AppResult<Vec<LouadoShift>> {
        let models = LouadoShiftEntity::find()
            .order_by_asc(louado_shift::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(LouadoShift::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<LouadoShift>> {
        let result = LouadoShiftEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(LouadoShift::from))
    }

    async fn create(&self, shift: NewLouadoShift) -> AppResult<LouadoShift> {
        let active_model = louado_shift::ActiveModel {
            user_id: Set(shift.user_id),
            start_date: Set(shift.start_date),
            end_date: Set(shift.end_date),
            notes: Set(shift.notes),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(LouadoShift::from(model))
    }

    async fn update(&self, id: i32, changes: LouadoShiftChanges) -> AppResult<LouadoShift> {
        let existing = LouadoShiftEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found()?;

        let start_date = changes.start_date.unwrap_or(existing.start_date);
        let end_date = changes.end_date.unwrap_or(existing.end_date);
        domain::validation::ensure_date_range(start_date, end_date, "Louado shift")?;

        let mut active: louado_shift::ActiveModel = existing.into();
        if let Some(user_id) = changes.user_id {
            active.user_id = Set(user_id);
        }
        active.start_date = Set(start_date);
        active.end_date = Set(end_date);
        if let Some(notes) = changes.notes {
            active.notes = Set(Some(notes));
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(LouadoShift::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = LouadoShiftEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
