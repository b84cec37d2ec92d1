//! Leadership and louado (praise leading) rotations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::repository::{LeadershipShiftRepository, LouadoShiftRepository};
use common::{AppResult, OptionExt};
use domain::{
    ensure_date_range, ensure_not_blank, LeadershipShift, LeadershipShiftChanges, LouadoShift,
    LouadoShiftChanges, NewLeadershipShift, NewLouadoShift, ShiftStatus,
};

#[async_trait]
pub trait LeadershipShiftService: Send + Sync {
    async fn list_shifts(&self) -> AppResult<Vec<LeadershipShift>>;

    /// The shift currently in charge, if any
    async fn current_shift(&self) -> AppResult<Option<LeadershipShift>>;

    async fn get_shift(&self, id: i32) -> AppResult<LeadershipShift>;

    async fn create_shift(&self, shift: NewLeadershipShift) -> AppResult<LeadershipShift>;

    async fn update_shift(
        &self,
        id: i32,
        changes: LeadershipShiftChanges,
    ) -> AppResult<LeadershipShift>;

    /// Make a shift the active one, completing whichever was active before
    async fn activate_shift(&self, id: i32) -> AppResult<LeadershipShift>;

    async fn set_shift_status(&self, id: i32, status: ShiftStatus) -> AppResult<LeadershipShift>;

    async fn delete_shift(&self, id: i32) -> AppResult<()>;
}

pub struct LeadershipShiftManager {
    repo: Arc<dyn LeadershipShiftRepository>,
}

impl LeadershipShiftManager {
    pub fn new(repo: Arc<dyn LeadershipShiftRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl LeadershipShiftService for LeadershipShiftManager {
    async fn list_shifts(&self) -> AppResult<Vec<LeadershipShift>> {
        self.repo.list().await
    }

    async fn current_shift(&self) -> AppResult<Option<LeadershipShift>> {
        self.repo.find_active().await
    }

    async fn get_shift(&self, id: i32) -> AppResult<LeadershipShift> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_shift(&self, mut shift: NewLeadershipShift) -> AppResult<LeadershipShift> {
        shift.name = shift.name.trim().to_string();
        shift.validate()?;

        let created = self.repo.create(shift).await?;
        tracing::info!(
            shift_id = created.id,
            status = %created.status.as_str(),
            "Leadership shift created"
        );
        Ok(created)
    }

    async fn update_shift(
        &self,
        id: i32,
        mut changes: LeadershipShiftChanges,
    ) -> AppResult<LeadershipShift> {
        if let Some(name) = changes.name.as_mut() {
            *name = name.trim().to_string();
            ensure_not_blank(name, "name")?;
        }
        self.repo.update(id, changes).await
    }

    async fn activate_shift(&self, id: i32) -> AppResult<LeadershipShift> {
        self.repo.activate(id).await
    }

    async fn set_shift_status(&self, id: i32, status: ShiftStatus) -> AppResult<LeadershipShift> {
        let updated = self.repo.set_status(id, status).await?;
        tracing::info!(shift_id = id, status = %status.as_str(), "Leadership shift status changed");
        Ok(updated)
    }

    async fn delete_shift(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }
}

#[async_trait]
pub trait LouadoShiftService: Send + Sync {
    async fn list_louado_shifts(&self) -> AppResult<Vec<LouadoShift>>;

    async fn get_louado_shift(&self, id: i32) -> AppResult<LouadoShift>;

    async fn create_louado_shift(&self, shift: NewLouadoShift) -> AppResult<LouadoShift>;

    async fn update_louado_shift(
        &self,
        id: i32,
        changes: LouadoShiftChanges,
    ) -> AppResult<LouadoShift>;

    async fn delete_louado_shift(&self, id: i32) -> AppResult<()>;
}

pub struct LouadoShiftManager {
    repo: Arc<dyn LouadoShiftRepository>,
}

impl LouadoShiftManager {
    pub fn new(repo: Arc<dyn LouadoShiftRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl LouadoShiftService for LouadoShiftManager {
    async fn list_louado_shifts(&self) -> AppResult<Vec<LouadoShift>> {
        self.repo.list().await
    }

    async fn get_louado_shift(&self, id: i32) -> AppResult<LouadoShift> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_louado_shift(&self, shift: NewLouadoShift) -> AppResult<LouadoShift> {
        ensure_date_range(shift.start_date, shift.end_date, "Louado shift")?;
        self.repo.create(shift).await
    }

    async fn update_louado_shift(
        &self,
        id: i32,
        changes: LouadoShiftChanges,
    ) -> AppResult<LouadoShift> {
        self.repo.update(id, changes).await
    }

    async fn delete_louado_shift(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockLeadershipShiftRepository, MockLouadoShiftRepository};
    use crate::service::test_support::date;
    use chrono::Utc;
    use common::AppError;

    fn new_shift(status: ShiftStatus) -> NewLeadershipShift {
        NewLeadershipShift {
            name: "  2024 committee ".to_string(),
            leader_id: 2,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
            status,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_trims_name() {
        let mut repo = MockLeadershipShiftRepository::new();
        repo.expect_create().returning(|new| {
            let now = Utc::now();
            Ok(LeadershipShift {
                id: 1,
                name: new.name,
                leader_id: new.leader_id,
                start_date: new.start_date,
                end_date: new.end_date,
                status: new.status,
                notes: new.notes,
                created_at: now,
                updated_at: now,
            })
        });

        let service = LeadershipShiftManager::new(Arc::new(repo));
        let shift = service
            .create_shift(new_shift(ShiftStatus::Active))
            .await
            .unwrap();

        assert_eq!(shift.name, "2024 committee");
    }

    #[tokio::test]
    async fn shift_cannot_start_completed() {
        let mut repo = MockLeadershipShiftRepository::new();
        repo.expect_create().never();

        let service = LeadershipShiftManager::new(Arc::new(repo));
        let result = service.create_shift(new_shift(ShiftStatus::Completed)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn blank_rename_is_rejected() {
        let mut repo = MockLeadershipShiftRepository::new();
        repo.expect_update().never();

        let service = LeadershipShiftManager::new(Arc::new(repo));
        let changes = LeadershipShiftChanges {
            name: Some("  ".to_string()),
            ..Default::default()
        };

        tokio_test::assert_err!(service.update_shift(1, changes).await);
    }

    #[tokio::test]
    async fn louado_shift_needs_ordered_dates() {
        let mut repo = MockLouadoShiftRepository::new();
        repo.expect_create().never();

        let service = LouadoShiftManager::new(Arc::new(repo));
        let result = service
            .create_louado_shift(NewLouadoShift {
                user_id: 4,
                start_date: date(2024, 6, 9),
                end_date: date(2024, 6, 2),
                notes: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
