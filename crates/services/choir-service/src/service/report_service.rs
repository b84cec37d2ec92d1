use std::sync::Arc;

use async_trait::async_trait;

use super::within_scope;
use crate::repository::ReportRepository;
use common::AppResult;
use domain::{ChoirScope, NewReport, Principal, Report, ReportType};

#[async_trait]
pub trait ReportService: Send + Sync {
    async fn list_reports(
        &self,
        scope: ChoirScope,
        report_type: Option<ReportType>,
    ) -> AppResult<Vec<Report>>;

    async fn get_report(&self, scope: ChoirScope, id: i32) -> AppResult<Report>;

    async fn create_report(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        report: NewReport,
    ) -> AppResult<Report>;

    async fn delete_report(&self, scope: ChoirScope, id: i32) -> AppResult<()>;
}

pub struct ReportManager {
    repo: Arc<dyn ReportRepository>,
}

impl ReportManager {
    pub fn new(repo: Arc<dyn ReportRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ReportService for ReportManager {
    async fn list_reports(
        &self,
        scope: ChoirScope,
        report_type: Option<ReportType>,
    ) -> AppResult<Vec<Report>> {
        self.repo.list(scope, report_type).await
    }

    async fn get_report(&self, scope: ChoirScope, id: i32) -> AppResult<Report> {
        within_scope(scope, self.repo.find_by_id(id).await?)
    }

    async fn create_report(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        mut report: NewReport,
    ) -> AppResult<Report> {
        report.validate()?;
        report.choir_id = scope.assign(report.choir_id);
        report.author_id = actor.member_id();
        self.repo.create(report).await
    }

    async fn delete_report(&self, scope: ChoirScope, id: i32) -> AppResult<()> {
        self.get_report(scope, id).await?;
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockReportRepository;
    use crate::service::test_support::{as_admin, as_member, date};
    use chrono::Utc;
    use common::AppError;
    use domain::Role;

    fn stored(new: NewReport) -> Report {
        Report {
            id: 3,
            choir_id: new.choir_id,
            title: new.title,
            report_type: new.report_type,
            period_start: new.period_start,
            period_end: new.period_end,
            content: new.content,
            author_id: new.author_id,
            created_at: Utc::now(),
        }
    }

    fn quarter(choir_id: Option<i32>) -> NewReport {
        NewReport {
            choir_id,
            title: "Q1 attendance".to_string(),
            report_type: ReportType::Attendance,
            period_start: date(2024, 1, 1),
            period_end: date(2024, 3, 31),
            content: String::new(),
            author_id: None,
        }
    }

    #[tokio::test]
    async fn report_is_filed_under_the_callers_choir() {
        let mut repo = MockReportRepository::new();
        repo.expect_create()
            .withf(|r| r.choir_id == Some(1) && r.author_id == Some(12))
            .times(1)
            .returning(|r| Ok(stored(r)));

        let service = ReportManager::new(Arc::new(repo));
        let actor = as_member(12, Role::ChoirAdmin, vec![]);
        let report = service
            .create_report(&actor, ChoirScope::Choir(1), quarter(Some(4)))
            .await
            .unwrap();

        assert_eq!(report.choir_id, Some(1));
    }

    #[tokio::test]
    async fn admin_reports_have_no_member_author() {
        let mut repo = MockReportRepository::new();
        repo.expect_create()
            .withf(|r| r.author_id.is_none())
            .returning(|r| Ok(stored(r)));

        let service = ReportManager::new(Arc::new(repo));
        let actor = as_admin(Role::FinanceAdmin, Some(1));
        tokio_test::assert_ok!(
            service
                .create_report(&actor, ChoirScope::Choir(1), quarter(None))
                .await
        );
    }

    #[tokio::test]
    async fn inverted_period_is_rejected() {
        let mut repo = MockReportRepository::new();
        repo.expect_create().never();

        let service = ReportManager::new(Arc::new(repo));
        let mut report = quarter(None);
        report.period_end = date(2023, 12, 31);
        let result = service
            .create_report(&as_admin(Role::SuperAdmin, None), ChoirScope::All, report)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn other_choirs_reports_cannot_be_deleted() {
        let mut repo = MockReportRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(stored(quarter(Some(2))))));
        repo.expect_delete().never();

        let service = ReportManager::new(Arc::new(repo));
        let result = service.delete_report(ChoirScope::Choir(1), 3).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
