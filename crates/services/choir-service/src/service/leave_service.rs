//! Leave requests.
//!
//! Requests belong to the choir of the member they are for; reviewers only
//! see and decide requests inside their own scope.

use std::sync::Arc;

use async_trait::async_trait;

use super::{ensure_self_or_role, within_scope};
use crate::repository::{LeaveRepository, UserRepository};
use common::{AppError, AppResult, OptionExt};
use domain::{ChoirScope, Leave, LeaveStatus, NewLeave, Principal, Role};

const LEAVE_REVIEWERS: &[Role] = &[Role::ChoirAdmin];

#[async_trait]
pub trait LeaveService: Send + Sync {
    /// File a request for oneself, or for any member in scope as a choir admin
    async fn request_leave(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        leave: NewLeave,
    ) -> AppResult<Leave>;

    async fn my_leaves(&self, actor: &Principal) -> AppResult<Vec<Leave>>;

    async fn list_leaves(
        &self,
        scope: ChoirScope,
        status: Option<LeaveStatus>,
    ) -> AppResult<Vec<Leave>>;

    async fn get_leave(&self, actor: &Principal, scope: ChoirScope, id: i32) -> AppResult<Leave>;

    /// Approve and put the member on leave in one transaction
    async fn approve_leave(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        id: i32,
    ) -> AppResult<Leave>;

    async fn reject_leave(&self, actor: &Principal, scope: ChoirScope, id: i32)
        -> AppResult<Leave>;

    /// Owners may withdraw their own request while it is pending
    async fn cancel_leave(&self, actor: &Principal, id: i32) -> AppResult<Leave>;
}

pub struct LeaveManager {
    repo: Arc<dyn LeaveRepository>,
    users: Arc<dyn UserRepository>,
}

impl LeaveManager {
    pub fn new(repo: Arc<dyn LeaveRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { repo, users }
    }

    async fn ensure_member_in_scope(&self, scope: ChoirScope, user_id: i32) -> AppResult<()> {
        within_scope(scope, self.users.find_by_id(user_id).await?).map(|_| ())
    }

    /// A request whose member is outside `scope` is reported as missing.
    async fn scoped(&self, scope: ChoirScope, id: i32) -> AppResult<Leave> {
        let leave = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        self.ensure_member_in_scope(scope, leave.user_id).await?;
        Ok(leave)
    }
}

#[async_trait]
impl LeaveService for LeaveManager {
    async fn request_leave(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        leave: NewLeave,
    ) -> AppResult<Leave> {
        ensure_self_or_role(actor, leave.user_id, LEAVE_REVIEWERS)?;
        leave.validate()?;
        self.ensure_member_in_scope(scope, leave.user_id).await?;

        let created = self.repo.create(leave).await?;
        tracing::info!(leave_id = created.id, user_id = created.user_id, "Leave requested");
        Ok(created)
    }

    async fn my_leaves(&self, actor: &Principal) -> AppResult<Vec<Leave>> {
        match actor.member_id() {
            Some(user_id) => self.repo.list(ChoirScope::All, None, Some(user_id)).await,
            None => Ok(Vec::new()),
        }
    }

    async fn list_leaves(
        &self,
        scope: ChoirScope,
        status: Option<LeaveStatus>,
    ) -> AppResult<Vec<Leave>> {
        self.repo.list(scope, status, None).await
    }

    async fn get_leave(&self, actor: &Principal, scope: ChoirScope, id: i32) -> AppResult<Leave> {
        let leave = self.scoped(scope, id).await?;
        ensure_self_or_role(actor, leave.user_id, LEAVE_REVIEWERS)?;
        Ok(leave)
    }

    async fn approve_leave(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        id: i32,
    ) -> AppResult<Leave> {
        self.scoped(scope, id).await?;
        self.repo.approve(id, actor.member_id()).await
    }

    async fn reject_leave(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        id: i32,
    ) -> AppResult<Leave> {
        self.scoped(scope, id).await?;
        let rejected = self
            .repo
            .close(id, LeaveStatus::Rejected, actor.member_id())
            .await?;
        tracing::info!(leave_id = id, "Leave rejected");
        Ok(rejected)
    }

    async fn cancel_leave(&self, actor: &Principal, id: i32) -> AppResult<Leave> {
        let leave = self.repo.find_by_id(id).await?.ok_or_not_found()?;
        if actor.member_id() != Some(leave.user_id) {
            return Err(AppError::Forbidden);
        }
        leave.status.ensure_transition_to(LeaveStatus::Cancelled)?;

        self.repo.close(id, LeaveStatus::Cancelled, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockLeaveRepository, MockUserRepository};
    use crate::service::test_support::{as_admin, as_member, date, member};
    use chrono::Utc;
    use domain::StatusReason;
    use mockall::predicate::eq;

    fn leave(id: i32, user_id: i32, status: LeaveStatus) -> Leave {
        let now = Utc::now();
        Leave {
            id,
            user_id,
            reason: StatusReason::Travel,
            start_date: date(2024, 7, 1),
            end_date: date(2024, 7, 31),
            status,
            note: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(user_id: i32, reason: StatusReason) -> NewLeave {
        NewLeave {
            user_id,
            reason,
            start_date: date(2024, 7, 1),
            end_date: date(2024, 7, 31),
            note: None,
        }
    }

    /// Members live in the choir given by `choir_id`.
    fn members_of(choir_id: i32) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |id| Ok(Some(member(id, Some(choir_id)))));
        users
    }

    fn manager(repo: MockLeaveRepository, users: MockUserRepository) -> LeaveManager {
        LeaveManager::new(Arc::new(repo), Arc::new(users))
    }

    #[tokio::test]
    async fn member_files_own_request() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_create()
            .returning(|new| Ok(leave(1, new.user_id, LeaveStatus::Pending)));

        let service = manager(repo, members_of(1));
        let actor = as_member(3, Role::ChoirMember, vec![]);
        let created = service
            .request_leave(&actor, ChoirScope::Choir(1), request(3, StatusReason::Travel))
            .await
            .unwrap();

        assert_eq!(created.status, LeaveStatus::Pending);
    }

    #[tokio::test]
    async fn member_cannot_file_for_someone_else() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_create().never();

        let service = manager(repo, MockUserRepository::new());
        let actor = as_member(3, Role::ChoirMember, vec![]);
        let result = service
            .request_leave(&actor, ChoirScope::Choir(1), request(4, StatusReason::Travel))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn choir_admin_cannot_file_for_another_choirs_member() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_create().never();

        let service = manager(repo, members_of(2));
        let result = service
            .request_leave(
                &as_admin(Role::ChoirAdmin, Some(1)),
                ChoirScope::Choir(1),
                request(4, StatusReason::Travel),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn suspension_reason_is_not_a_leave_reason() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_create().never();

        let service = manager(repo, members_of(1));
        let actor = as_member(3, Role::ChoirMember, vec![]);
        let result = service
            .request_leave(&actor, ChoirScope::Choir(1), request(3, StatusReason::Misconduct))
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn list_is_narrowed_to_scope() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_list()
            .with(eq(ChoirScope::Choir(1)), eq(Some(LeaveStatus::Pending)), eq(None::<i32>))
            .times(1)
            .returning(|_, _, _| Ok(vec![leave(1, 3, LeaveStatus::Pending)]));

        let service = manager(repo, MockUserRepository::new());
        let leaves = service
            .list_leaves(ChoirScope::Choir(1), Some(LeaveStatus::Pending))
            .await
            .unwrap();

        assert_eq!(leaves.len(), 1);
    }

    #[tokio::test]
    async fn only_owner_cancels() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(leave(id, 3, LeaveStatus::Pending))));
        repo.expect_close().never();

        let service = manager(repo, MockUserRepository::new());
        let result = service
            .cancel_leave(&as_admin(Role::ChoirAdmin, None), 1)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn owner_cancels_pending_request() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(leave(id, 3, LeaveStatus::Pending))));
        repo.expect_close()
            .with(eq(1), eq(LeaveStatus::Cancelled), eq(None::<i32>))
            .times(1)
            .returning(|id, status, _| Ok(leave(id, 3, status)));

        let service = manager(repo, MockUserRepository::new());
        let actor = as_member(3, Role::ChoirMember, vec![]);
        let cancelled = service.cancel_leave(&actor, 1).await.unwrap();

        assert_eq!(cancelled.status, LeaveStatus::Cancelled);
    }

    #[tokio::test]
    async fn approved_request_cannot_be_cancelled() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(leave(id, 3, LeaveStatus::Approved))));
        repo.expect_close().never();

        let service = manager(repo, MockUserRepository::new());
        let actor = as_member(3, Role::ChoirMember, vec![]);
        let result = service.cancel_leave(&actor, 1).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn reviewer_is_recorded_for_member_reviewers() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(leave(id, 3, LeaveStatus::Pending))));
        repo.expect_approve()
            .with(eq(1), eq(Some(8)))
            .returning(|id, reviewer| {
                let mut approved = leave(id, 3, LeaveStatus::Approved);
                approved.reviewed_by = reviewer;
                Ok(approved)
            });

        let service = manager(repo, members_of(1));
        let actor = as_member(8, Role::ChoirAdmin, vec![]);
        let approved = service
            .approve_leave(&actor, ChoirScope::Choir(1), 1)
            .await
            .unwrap();

        assert_eq!(approved.reviewed_by, Some(8));
    }

    #[tokio::test]
    async fn approving_another_choirs_request_is_not_found() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(leave(id, 3, LeaveStatus::Pending))));
        repo.expect_approve().never();

        let service = manager(repo, members_of(2));
        let result = service
            .approve_leave(&as_admin(Role::ChoirAdmin, Some(1)), ChoirScope::Choir(1), 1)
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn rejecting_another_choirs_request_is_not_found() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(leave(id, 3, LeaveStatus::Pending))));
        repo.expect_close().never();

        let service = manager(repo, members_of(2));
        let result = service
            .reject_leave(&as_admin(Role::ChoirAdmin, Some(1)), ChoirScope::Choir(1), 1)
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn admins_have_no_leaves_of_their_own() {
        let mut repo = MockLeaveRepository::new();
        repo.expect_list().never();

        let service = manager(repo, MockUserRepository::new());
        let leaves = service
            .my_leaves(&as_admin(Role::SuperAdmin, None))
            .await
            .unwrap();

        assert!(leaves.is_empty());
    }
}
