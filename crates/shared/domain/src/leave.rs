//! Leave requests.
//!
//! A request starts `PENDING` and is decided once: approved, rejected, or
//! cancelled by its owner.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::status::{MemberStatus, StatusReason};
use crate::validation::ensure_date_range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_status")
)]
pub enum LeaveStatus {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "PENDING"))]
    Pending,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "APPROVED"))]
    Approved,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "REJECTED"))]
    Rejected,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "CANCELLED"))]
    Cancelled,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Rejected => "REJECTED",
            LeaveStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn can_transition_to(&self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (
                LeaveStatus::Pending,
                LeaveStatus::Approved | LeaveStatus::Rejected | LeaveStatus::Cancelled
            )
        )
    }

    pub fn ensure_transition_to(&self, next: LeaveStatus) -> DomainResult<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(format!(
                "Leave request is {} and cannot become {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Leave {
    pub id: i32,
    pub user_id: i32,
    pub reason: StatusReason,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    pub note: Option<String>,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLeave {
    pub user_id: i32,
    pub reason: StatusReason,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub note: Option<String>,
}

impl NewLeave {
    /// The reason must be one that an `ON_LEAVE` status accepts, since approval
    /// carries it onto the member.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_date_range(self.start_date, self.end_date, "Leave")?;
        if !MemberStatus::OnLeave.admits(self.reason) {
            return Err(DomainError::validation(format!(
                "{} is not a leave reason",
                self.reason
            )));
        }
        Ok(())
    }
}
