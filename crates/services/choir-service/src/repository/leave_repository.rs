//! Leave request repository.
//!
//! Decisions lock the request row so two reviewers cannot decide the same
//! request. Approval also puts the member on leave in the same transaction.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::choir_condition;
use super::entities::leave::{self, ActiveModel, Entity as LeaveEntity};
use super::entities::user;
use common::{AppError, AppResult, OptionExt};
use domain::{validate_status_change, ChoirScope, Leave, LeaveStatus, MemberStatus, NewLeave};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LeaveRepository: Send + Sync {
    /// Newest first. Only requests of members inside `scope`, optionally
    /// narrowed by status and owner.
    async fn list(
        &self,
        scope: ChoirScope,
        status: Option<LeaveStatus>,
        user_id: Option<i32>,
    ) -> AppResult<Vec<Leave>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Leave>>;

    async fn create(&self, leave: NewLeave) -> AppResult<Leave>;

    /// Approve a pending request and mark the member `ON_LEAVE` with the
    /// request's reason, unless the member is already on leave.
    async fn approve(&self, id: i32, reviewer_id: Option<i32>) -> AppResult<Leave>;

    /// Move a pending request to `Rejected` or `Cancelled`
    async fn close(&self, id: i32, status: LeaveStatus, reviewer_id: Option<i32>)
        -> AppResult<Leave>;
}

pub struct LeaveStore {
    db: DatabaseConnection,
}

impl LeaveStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn lock_leave(txn: &DatabaseTransaction, id: i32) -> AppResult<leave::Model> {
        LeaveEntity::find_by_id(id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_not_found()
    }

    async fn decide(
        txn: &DatabaseTransaction,
        model: leave::Model,
        status: LeaveStatus,
        reviewer_id: Option<i32>,
    ) -> AppResult<leave::Model> {
        model.status.ensure_transition_to(status)?;

        let now = chrono::Utc::now();
        let mut active: ActiveModel = model.into();
        active.status = Set(status);
        active.reviewed_by = Set(reviewer_id);
        active.reviewed_at = Set(Some(now));
        active.updated_at = Set(now);

        Ok(active.update(txn).await?)
    }
}

#[async_trait]
impl LeaveRepository for LeaveStore {
    async fn list(
        &self,
        scope: ChoirScope,
        status: Option<LeaveStatus>,
        user_id: Option<i32>,
    ) -> AppResult<Vec<Leave>> {
        let mut query = LeaveEntity::find();
        if scope != ChoirScope::All {
            query = query
                .inner_join(user::Entity)
                .filter(choir_condition(user::Column::ChoirId, scope));
        }
        if let Some(status) = status {
            query = query.filter(leave::Column::Status.eq(status));
        }
        if let Some(user_id) = user_id {
            query = query.filter(leave::Column::UserId.eq(user_id));
        }

        let models = query
            .order_by_desc(leave::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Leave::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Leave>> {
        let result = LeaveEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Leave::from))
    }

    async fn create(&self, leave: NewLeave) -> AppResult<Leave> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            user_id: Set(leave.user_id),
            reason: Set(leave.reason.as_str().to_string()),
            start_date: Set(leave.start_date),
            end_date: Set(leave.end_date),
            status: Set(LeaveStatus::Pending),
            note: Set(leave.note),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Leave::from(model))
    }

    async fn approve(&self, id: i32, reviewer_id: Option<i32>) -> AppResult<Leave> {
        let txn = self.db.begin().await?;

        let request = Self::lock_leave(&txn, id).await?;
        let member = user::Entity::find_by_id(request.user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_not_found()?;

        let decided = Self::decide(&txn, request, LeaveStatus::Approved, reviewer_id).await?;
        let approved = Leave::from(decided);

        if member.status != Some(MemberStatus::OnLeave) {
            validate_status_change(member.status, MemberStatus::OnLeave, approved.reason)?;

            let mut active: user::ActiveModel = member.into();
            active.status = Set(Some(MemberStatus::OnLeave));
            active.status_reason = Set(Some(approved.reason.as_str().to_string()));
            active.updated_at = Set(chrono::Utc::now());
            active.update(&txn).await?;
        }

        txn.commit().await?;
        tracing::info!(leave_id = id, user_id = approved.user_id, "Leave approved");
        Ok(approved)
    }

    async fn close(
        &self,
        id: i32,
        status: LeaveStatus,
        reviewer_id: Option<i32>,
    ) -> AppResult<Leave> {
        if !matches!(status, LeaveStatus::Rejected | LeaveStatus::Cancelled) {
            return Err(AppError::internal(format!(
                "close() cannot move a leave to {}",
                status.as_str()
            )));
        }

        let txn = self.db.begin().await?;
        let request = Self::lock_leave(&txn, id).await?;
        let model = Self::decide(&txn, request, status, reviewer_id).await?;
        txn.commit().await?;

        Ok(Leave::from(model))
    }
}
