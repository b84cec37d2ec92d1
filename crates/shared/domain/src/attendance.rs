//! Events and the attendance recorded against them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_type")
)]
pub enum EventType {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "REHEARSAL"))]
    Rehearsal,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "SERVICE"))]
    Service,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "CONCERT"))]
    Concert,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "MEETING"))]
    Meeting,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "OTHER"))]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Event {
    pub id: i32,
    pub choir_id: Option<i32>,
    pub title: String,
    pub event_type: EventType,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub choir_id: Option<i32>,
    pub title: String,
    pub event_type: EventType,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_event_window(self.starts_at, self.ends_at)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub event_type: Option<EventType>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// An event may not end before it starts.
pub fn ensure_event_window(starts_at: DateTime<Utc>, ends_at: Option<DateTime<Utc>>) -> DomainResult<()> {
    match ends_at {
        Some(end) if end < starts_at => Err(DomainError::validation(
            "Event must not end before it starts",
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")
)]
pub enum AttendanceStatus {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "PRESENT"))]
    Present,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "ABSENT"))]
    Absent,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "LATE"))]
    Late,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "EXCUSED"))]
    Excused,
}

impl AttendanceStatus {
    /// Present or late both count as attended.
    pub fn counts_as_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AttendanceRecord {
    pub id: i32,
    pub event_id: i32,
    pub user_id: i32,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// One row of a batch attendance submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AttendanceMark {
    pub user_id: i32,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

/// Reject batches that mark the same member twice.
pub fn ensure_unique_marks(marks: &[AttendanceMark]) -> DomainResult<()> {
    let mut seen = std::collections::HashSet::new();
    for mark in marks {
        if !seen.insert(mark.user_id) {
            return Err(DomainError::validation(format!(
                "Member {} is marked more than once",
                mark.user_id
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AttendanceSummary {
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub excused: u32,
    /// Share of events attended (present or late), 0.0 to 1.0.
    pub attendance_rate: f64,
}

impl AttendanceSummary {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut summary = AttendanceSummary::default();
        for status in statuses {
            summary.total += 1;
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Excused => summary.excused += 1,
            }
        }
        if summary.total > 0 {
            summary.attendance_rate =
                f64::from(summary.present + summary.late) / f64::from(summary.total);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn summary_counts_each_status() {
        let summary = AttendanceSummary::from_statuses([
            AttendanceStatus::Present,
            AttendanceStatus::Late,
            AttendanceStatus::Absent,
            AttendanceStatus::Excused,
        ]);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.excused, 1);
        assert!((summary.attendance_rate - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_summary_has_zero_rate() {
        let summary = AttendanceSummary::from_statuses([]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.attendance_rate, 0.0);
    }

    #[test]
    fn duplicate_marks_are_rejected() {
        let mark = AttendanceMark {
            user_id: 3,
            status: AttendanceStatus::Present,
            note: None,
        };
        assert!(ensure_unique_marks(&[mark.clone(), mark]).is_err());
    }

    #[test]
    fn event_cannot_end_before_start() {
        let start = Utc::now();
        assert!(ensure_event_window(start, Some(start - Duration::hours(1))).is_err());
        assert!(ensure_event_window(start, Some(start + Duration::hours(2))).is_ok());
        assert!(ensure_event_window(start, None).is_ok());
    }
}
