//! Stored reports.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainResult;
use crate::validation::{ensure_date_range, ensure_not_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "report_type")
)]
pub enum ReportType {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "ATTENDANCE"))]
    Attendance,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "FINANCIAL"))]
    Financial,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "ACTIVITY"))]
    Activity,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "GENERAL"))]
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Report {
    pub id: i32,
    pub choir_id: Option<i32>,
    pub title: String,
    pub report_type: ReportType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub content: String,
    pub author_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReport {
    pub choir_id: Option<i32>,
    pub title: String,
    pub report_type: ReportType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub content: String,
    pub author_id: Option<i32>,
}

impl NewReport {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_not_blank(&self.title, "title")?;
        ensure_date_range(self.period_start, self.period_end, "Report period")
    }
}
