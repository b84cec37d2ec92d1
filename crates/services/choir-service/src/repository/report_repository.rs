//! Report repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::choir_condition;
use super::entities::report::{self, ActiveModel, Entity as ReportEntity};
use common::{AppError, AppResult};
use domain::{ChoirScope, NewReport, Report, ReportType};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn list(
        &self,
        scope: ChoirScope,
        report_type: Option<ReportType>,
    ) -> AppResult<Vec<Report>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Report>>;

    async fn create(&self, report: NewReport) -> AppResult<Report>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct ReportStore {
    db: DatabaseConnection,
}

impl ReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportRepository for ReportStore {
    async fn list(
        &self,
        scope: ChoirScope,
        report_type: Option<ReportType>,
    ) -> AppResult<Vec<Report>> {
        let mut query =
            ReportEntity::find().filter(choir_condition(report::Column::ChoirId, scope));
        if let Some(report_type) = report_type {
            query = query.filter(report::Column::ReportType.eq(report_type));
        }

        let models = query
            .order_by_desc(report::Column::PeriodEnd)
            .order_by_desc(report::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Report::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Report>> {
        let result = ReportEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Report::from))
    }

    async fn create(&self, report: NewReport) -> AppResult<Report> {
        let active_model = ActiveModel {
            choir_id: Set(report.choir_id),
            title: Set(report.title),
            report_type: Set(report.report_type),
            period_start: Set(report.period_start),
            period_end: Set(report.period_end),
            content: Set(report.content),
            author_id: Set(report.author_id),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Report::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = ReportEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
