//! Leadership and louado shifts.
//!
//! At most one leadership shift is `Active` at a time. The database holds the
//! invariant with a partial unique index; activation demotes the current
//! active shift to `Completed` before promoting the new one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::validation::{ensure_date_range, ensure_not_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "shift_status")
)]
pub enum ShiftStatus {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "Upcoming"))]
    Upcoming,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "Active"))]
    Active,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "Completed"))]
    Completed,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "Cancelled"))]
    Cancelled,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Upcoming => "Upcoming",
            ShiftStatus::Active => "Active",
            ShiftStatus::Completed => "Completed",
            ShiftStatus::Cancelled => "Cancelled",
        }
    }

    pub fn successors(&self) -> &'static [ShiftStatus] {
        match self {
            ShiftStatus::Upcoming => &[ShiftStatus::Active, ShiftStatus::Cancelled],
            ShiftStatus::Active => &[ShiftStatus::Completed, ShiftStatus::Cancelled],
            ShiftStatus::Completed | ShiftStatus::Cancelled => &[],
        }
    }

    pub fn ensure_transition_to(&self, next: ShiftStatus) -> DomainResult<()> {
        if self.successors().contains(&next) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(format!(
                "Shift is {} and cannot become {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LeadershipShift {
    pub id: i32,
    pub name: String,
    pub leader_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ShiftStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLeadershipShift {
    pub name: String,
    pub leader_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ShiftStatus,
    pub notes: Option<String>,
}

impl NewLeadershipShift {
    /// New shifts start `Upcoming` or `Active`.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_not_blank(&self.name, "name")?;
        ensure_date_range(self.start_date, self.end_date, "Shift")?;
        match self.status {
            ShiftStatus::Upcoming | ShiftStatus::Active => Ok(()),
            other => Err(DomainError::validation(format!(
                "A new shift cannot start as {}",
                other.as_str()
            ))),
        }
    }
}

/// Field edits on a shift. A status here goes through the transition table.
#[derive(Debug, Clone, Default)]
pub struct LeadershipShiftChanges {
    pub name: Option<String>,
    pub leader_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ShiftStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LouadoShift {
    pub id: i32,
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLouadoShift {
    pub user_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LouadoShiftChanges {
    pub user_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ShiftStatus; 4] = [
        ShiftStatus::Upcoming,
        ShiftStatus::Active,
        ShiftStatus::Completed,
        ShiftStatus::Cancelled,
    ];

    #[test]
    fn transition_table() {
        let allowed = [
            (ShiftStatus::Upcoming, ShiftStatus::Active),
            (ShiftStatus::Upcoming, ShiftStatus::Cancelled),
            (ShiftStatus::Active, ShiftStatus::Completed),
            (ShiftStatus::Active, ShiftStatus::Cancelled),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.ensure_transition_to(to).is_ok(),
                    allowed.contains(&(from, to)),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn status_serializes_as_stored() {
        assert_eq!(serde_json::to_string(&ShiftStatus::Active).unwrap(), "\"Active\"");
    }

    #[test]
    fn new_shift_cannot_be_completed() {
        let shift = NewLeadershipShift {
            name: "Term A".to_string(),
            leader_id: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            status: ShiftStatus::Completed,
            notes: None,
        };
        assert!(shift.validate().is_err());
        assert!(NewLeadershipShift {
            status: ShiftStatus::Upcoming,
            ..shift
        }
        .validate()
        .is_ok());
    }
}
