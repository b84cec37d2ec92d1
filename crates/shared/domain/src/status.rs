//! Member status lifecycle.
//!
//! A member either has no status or is `ON_LEAVE`, `SUSPENDED` or `EXPELLED`.
//! Status changes follow a fixed successor table and each status admits a
//! fixed set of reasons:
//!
//! | from       | allowed targets                    |
//! |------------|------------------------------------|
//! | none       | ON_LEAVE, SUSPENDED, EXPELLED      |
//! | ON_LEAVE   | SUSPENDED, EXPELLED                |
//! | SUSPENDED  | EXPELLED                           |
//! | EXPELLED   | (terminal)                         |
//!
//! Clearing a status is not a transition and is always rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Non-null member status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_status")
)]
pub enum MemberStatus {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "ON_LEAVE"))]
    OnLeave,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "SUSPENDED"))]
    Suspended,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "EXPELLED"))]
    Expelled,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::OnLeave => "ON_LEAVE",
            MemberStatus::Suspended => "SUSPENDED",
            MemberStatus::Expelled => "EXPELLED",
        }
    }

    /// Statuses reachable from this one.
    pub fn successors(&self) -> &'static [MemberStatus] {
        match self {
            MemberStatus::OnLeave => &[MemberStatus::Suspended, MemberStatus::Expelled],
            MemberStatus::Suspended => &[MemberStatus::Expelled],
            MemberStatus::Expelled => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }

    /// Reasons that may accompany this status.
    pub fn allowed_reasons(&self) -> &'static [StatusReason] {
        use StatusReason::*;
        match self {
            MemberStatus::OnLeave => &[Birth, Illness, Travel, Education, Work, Family, Other],
            MemberStatus::Suspended => &[Absenteeism, Misconduct, UnpaidContributions, Other],
            MemberStatus::Expelled => &[GrossMisconduct, ProlongedAbsence, RepeatedSuspension, Other],
        }
    }

    pub fn admits(&self, reason: StatusReason) -> bool {
        self.allowed_reasons().contains(&reason)
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason recorded alongside a member status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum StatusReason {
    Birth,
    Illness,
    Travel,
    Education,
    Work,
    Family,
    Absenteeism,
    Misconduct,
    UnpaidContributions,
    GrossMisconduct,
    ProlongedAbsence,
    RepeatedSuspension,
    Other,
}

impl StatusReason {
    pub const ALL: [StatusReason; 13] = [
        StatusReason::Birth,
        StatusReason::Illness,
        StatusReason::Travel,
        StatusReason::Education,
        StatusReason::Work,
        StatusReason::Family,
        StatusReason::Absenteeism,
        StatusReason::Misconduct,
        StatusReason::UnpaidContributions,
        StatusReason::GrossMisconduct,
        StatusReason::ProlongedAbsence,
        StatusReason::RepeatedSuspension,
        StatusReason::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusReason::Birth => "BIRTH",
            StatusReason::Illness => "ILLNESS",
            StatusReason::Travel => "TRAVEL",
            StatusReason::Education => "EDUCATION",
            StatusReason::Work => "WORK",
            StatusReason::Family => "FAMILY",
            StatusReason::Absenteeism => "ABSENTEEISM",
            StatusReason::Misconduct => "MISCONDUCT",
            StatusReason::UnpaidContributions => "UNPAID_CONTRIBUTIONS",
            StatusReason::GrossMisconduct => "GROSS_MISCONDUCT",
            StatusReason::ProlongedAbsence => "PROLONGED_ABSENCE",
            StatusReason::RepeatedSuspension => "REPEATED_SUSPENSION",
            StatusReason::Other => "OTHER",
        }
    }
}

impl fmt::Display for StatusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusReason::ALL
            .into_iter()
            .find(|reason| reason.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Unknown status reason '{}'", s)))
    }
}

/// Whether a member currently in `from` may move to `to`.
pub fn can_transition(from: Option<MemberStatus>, to: MemberStatus) -> bool {
    match from {
        None => true,
        Some(current) => current.successors().contains(&to),
    }
}

/// Validate a requested status change before it is persisted.
pub fn validate_status_change(
    from: Option<MemberStatus>,
    to: MemberStatus,
    reason: StatusReason,
) -> DomainResult<()> {
    if !can_transition(from, to) {
        let current = from.map(|s| s.as_str()).unwrap_or("NONE");
        return Err(DomainError::invalid_transition(format!(
            "Cannot change member status from {} to {}",
            current, to
        )));
    }

    if !to.admits(reason) {
        return Err(DomainError::validation(format!(
            "Reason {} is not valid for status {}",
            reason, to
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [MemberStatus; 3] = [
        MemberStatus::OnLeave,
        MemberStatus::Suspended,
        MemberStatus::Expelled,
    ];

    #[test]
    fn any_status_can_be_assigned_initially() {
        for status in ALL_STATUSES {
            assert!(can_transition(None, status));
        }
    }

    #[test]
    fn transition_table_is_exact() {
        let allowed = [
            (MemberStatus::OnLeave, MemberStatus::Suspended),
            (MemberStatus::OnLeave, MemberStatus::Expelled),
            (MemberStatus::Suspended, MemberStatus::Expelled),
        ];

        for from in ALL_STATUSES {
            for to in ALL_STATUSES {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    can_transition(Some(from), to),
                    expected,
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn expelled_is_terminal() {
        assert!(MemberStatus::Expelled.is_terminal());
        assert!(!MemberStatus::OnLeave.is_terminal());
    }

    #[test]
    fn suspension_cannot_revert_to_leave() {
        let result = validate_status_change(
            Some(MemberStatus::Suspended),
            MemberStatus::OnLeave,
            StatusReason::Illness,
        );
        assert!(matches!(result, Err(DomainError::InvalidTransition(_))));
    }

    #[test]
    fn reason_must_belong_to_target_status() {
        let result =
            validate_status_change(None, MemberStatus::OnLeave, StatusReason::Misconduct);
        assert!(matches!(result, Err(DomainError::Validation(_))));

        assert!(validate_status_change(None, MemberStatus::OnLeave, StatusReason::Birth).is_ok());
        assert!(validate_status_change(
            Some(MemberStatus::OnLeave),
            MemberStatus::Suspended,
            StatusReason::Absenteeism
        )
        .is_ok());
    }

    #[test]
    fn other_is_valid_for_every_status() {
        for status in ALL_STATUSES {
            assert!(status.admits(StatusReason::Other));
        }
    }

    #[test]
    fn reason_strings_round_trip() {
        for reason in StatusReason::ALL {
            assert_eq!(reason.as_str().parse::<StatusReason>().unwrap(), reason);
        }
    }
}
