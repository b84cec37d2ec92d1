//! Events and attendance.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{ensure_self_or_role, within_scope};
use crate::repository::{AttendanceRepository, EventRepository, UserRepository};
use common::{AppError, AppResult};
use domain::attendance::{ensure_event_window, ensure_unique_marks};
use domain::{
    ensure_not_blank, AttendanceMark, AttendanceRecord, AttendanceSummary, ChoirScope, Event,
    EventChanges, EventFilter, NewEvent, Principal, Role,
};

/// Roles that may read anyone's attendance.
const ATTENDANCE_READERS: &[Role] = &[Role::AttendanceAdmin, Role::ChoirAdmin];

#[async_trait]
pub trait EventService: Send + Sync {
    async fn list_events(&self, scope: ChoirScope, filter: EventFilter) -> AppResult<Vec<Event>>;

    async fn get_event(&self, scope: ChoirScope, id: i32) -> AppResult<Event>;

    async fn create_event(&self, scope: ChoirScope, event: NewEvent) -> AppResult<Event>;

    async fn update_event(
        &self,
        scope: ChoirScope,
        id: i32,
        changes: EventChanges,
    ) -> AppResult<Event>;

    async fn delete_event(&self, scope: ChoirScope, id: i32) -> AppResult<()>;
}

pub struct EventManager {
    repo: Arc<dyn EventRepository>,
}

impl EventManager {
    pub fn new(repo: Arc<dyn EventRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl EventService for EventManager {
    async fn list_events(&self, scope: ChoirScope, filter: EventFilter) -> AppResult<Vec<Event>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            domain::ensure_date_range(from, to, "Event filter")?;
        }
        self.repo.list(scope, filter).await
    }

    async fn get_event(&self, scope: ChoirScope, id: i32) -> AppResult<Event> {
        within_scope(scope, self.repo.find_by_id(id).await?)
    }

    async fn create_event(&self, scope: ChoirScope, mut event: NewEvent) -> AppResult<Event> {
        ensure_not_blank(&event.title, "title")?;
        event.validate()?;
        event.choir_id = scope.assign(event.choir_id);
        self.repo.create(event).await
    }

    async fn update_event(
        &self,
        scope: ChoirScope,
        id: i32,
        changes: EventChanges,
    ) -> AppResult<Event> {
        let current = self.get_event(scope, id).await?;
        if let Some(title) = &changes.title {
            ensure_not_blank(title, "title")?;
        }
        ensure_event_window(
            changes.starts_at.unwrap_or(current.starts_at),
            changes.ends_at.or(current.ends_at),
        )?;
        self.repo.update(id, changes).await
    }

    async fn delete_event(&self, scope: ChoirScope, id: i32) -> AppResult<()> {
        self.get_event(scope, id).await?;
        self.repo.delete(id).await
    }
}

#[async_trait]
pub trait AttendanceService: Send + Sync {
    /// Record a batch of marks for one event, overwriting earlier marks
    async fn record_attendance(
        &self,
        scope: ChoirScope,
        event_id: i32,
        marks: Vec<AttendanceMark>,
    ) -> AppResult<Vec<AttendanceRecord>>;

    async fn event_attendance(
        &self,
        scope: ChoirScope,
        event_id: i32,
    ) -> AppResult<Vec<AttendanceRecord>>;

    /// A member's records; members may read their own
    async fn member_attendance(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        user_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<AttendanceRecord>>;

    async fn member_summary(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        user_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<AttendanceSummary>;
}

pub struct AttendanceManager {
    events: Arc<dyn EventRepository>,
    repo: Arc<dyn AttendanceRepository>,
    users: Arc<dyn UserRepository>,
}

impl AttendanceManager {
    pub fn new(
        events: Arc<dyn EventRepository>,
        repo: Arc<dyn AttendanceRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            events,
            repo,
            users,
        }
    }

    async fn ensure_event(&self, scope: ChoirScope, event_id: i32) -> AppResult<Event> {
        within_scope(scope, self.events.find_by_id(event_id).await?)
    }

    /// Marks on a choir's event may only name that choir's members.
    async fn ensure_marks_in_choir(
        &self,
        event: &Event,
        marks: &[AttendanceMark],
    ) -> AppResult<()> {
        let Some(choir_id) = event.choir_id else {
            return Ok(());
        };

        let ids: Vec<i32> = marks.iter().map(|m| m.user_id).collect();
        let members = self.users.find_many(ids).await?;
        for mark in marks {
            let belongs = members
                .iter()
                .any(|m| m.id == mark.user_id && m.choir_id == Some(choir_id));
            if !belongs {
                return Err(AppError::validation(format!(
                    "Member {} does not belong to the event's choir",
                    mark.user_id
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceService for AttendanceManager {
    async fn record_attendance(
        &self,
        scope: ChoirScope,
        event_id: i32,
        marks: Vec<AttendanceMark>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        if marks.is_empty() {
            return Err(AppError::validation("At least one attendance mark is required"));
        }
        ensure_unique_marks(&marks)?;
        let event = self.ensure_event(scope, event_id).await?;
        self.ensure_marks_in_choir(&event, &marks).await?;

        self.repo.record(event_id, marks).await
    }

    async fn event_attendance(
        &self,
        scope: ChoirScope,
        event_id: i32,
    ) -> AppResult<Vec<AttendanceRecord>> {
        self.ensure_event(scope, event_id).await?;
        self.repo.list_for_event(event_id).await
    }

    async fn member_attendance(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        user_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        ensure_self_or_role(actor, user_id, ATTENDANCE_READERS)?;
        within_scope(scope, self.users.find_by_id(user_id).await?)?;
        if let (Some(from), Some(to)) = (from, to) {
            domain::ensure_date_range(from, to, "Attendance period")?;
        }
        self.repo.list_for_user(user_id, from, to).await
    }

    async fn member_summary(
        &self,
        actor: &Principal,
        scope: ChoirScope,
        user_id: i32,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<AttendanceSummary> {
        let records = self
            .member_attendance(actor, scope, user_id, from, to)
            .await?;
        Ok(AttendanceSummary::from_statuses(
            records.into_iter().map(|r| r.status),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockAttendanceRepository, MockEventRepository, MockUserRepository};
    use crate::service::test_support::{as_member, date, member};
    use chrono::{TimeZone, Utc};
    use domain::{AttendanceStatus, EventType};
    use mockall::predicate::eq;

    fn event(id: i32, choir_id: Option<i32>) -> Event {
        Event {
            id,
            choir_id,
            title: "Sunday service".to_string(),
            event_type: EventType::Service,
            location: None,
            starts_at: Utc.with_ymd_and_hms(2024, 5, 5, 9, 0, 0).unwrap(),
            ends_at: None,
            description: None,
            created_at: Utc::now(),
        }
    }

    fn mark(user_id: i32, status: AttendanceStatus) -> AttendanceMark {
        AttendanceMark {
            user_id,
            status,
            note: None,
        }
    }

    fn record(user_id: i32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: user_id,
            event_id: 1,
            user_id,
            status,
            note: None,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_event_rejects_end_before_start() {
        let mut repo = MockEventRepository::new();
        repo.expect_create().never();

        let service = EventManager::new(Arc::new(repo));
        let starts_at = Utc.with_ymd_and_hms(2024, 5, 5, 9, 0, 0).unwrap();
        let result = service
            .create_event(
                ChoirScope::All,
                NewEvent {
                    choir_id: None,
                    title: "Concert".to_string(),
                    event_type: EventType::Concert,
                    location: None,
                    starts_at,
                    ends_at: Some(starts_at - chrono::Duration::hours(1)),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    fn manager(
        events: MockEventRepository,
        repo: MockAttendanceRepository,
        users: MockUserRepository,
    ) -> AttendanceManager {
        AttendanceManager::new(Arc::new(events), Arc::new(repo), Arc::new(users))
    }

    fn members_of(choir_id: i32) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |id| Ok(Some(member(id, Some(choir_id)))));
        users.expect_find_many().returning(move |ids| {
            Ok(ids.into_iter().map(|id| member(id, Some(choir_id))).collect())
        });
        users
    }

    #[tokio::test]
    async fn record_rejects_duplicate_members() {
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().returning(|id| Ok(Some(event(id, None))));
        let mut repo = MockAttendanceRepository::new();
        repo.expect_record().never();

        let service = manager(events, repo, MockUserRepository::new());
        let result = service
            .record_attendance(
                ChoirScope::All,
                1,
                vec![
                    mark(3, AttendanceStatus::Present),
                    mark(3, AttendanceStatus::Absent),
                ],
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn record_for_event_in_other_choir_is_not_found() {
        let mut events = MockEventRepository::new();
        events
            .expect_find_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(event(id, Some(9)))));
        let mut repo = MockAttendanceRepository::new();
        repo.expect_record().never();

        let service = manager(events, repo, MockUserRepository::new());
        let result = service
            .record_attendance(
                ChoirScope::Choir(1),
                1,
                vec![mark(3, AttendanceStatus::Present)],
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn record_passes_batch_through() {
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().returning(|id| Ok(Some(event(id, Some(1)))));
        let mut repo = MockAttendanceRepository::new();
        repo.expect_record().times(1).returning(|_, marks| {
            Ok(marks
                .into_iter()
                .map(|m| record(m.user_id, m.status))
                .collect())
        });

        let service = manager(events, repo, members_of(1));
        let records = service
            .record_attendance(
                ChoirScope::Choir(1),
                1,
                vec![
                    mark(3, AttendanceStatus::Present),
                    mark(4, AttendanceStatus::Late),
                ],
            )
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn record_rejects_members_of_another_choir() {
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().returning(|id| Ok(Some(event(id, Some(1)))));
        let mut users = MockUserRepository::new();
        users.expect_find_many().returning(|_| {
            Ok(vec![member(3, Some(1)), member(4, Some(2))])
        });
        let mut repo = MockAttendanceRepository::new();
        repo.expect_record().never();

        let service = manager(events, repo, users);
        let result = service
            .record_attendance(
                ChoirScope::Choir(1),
                1,
                vec![
                    mark(3, AttendanceStatus::Present),
                    mark(4, AttendanceStatus::Present),
                ],
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("Member 4")));
    }

    #[tokio::test]
    async fn members_read_only_their_own_attendance() {
        let service = manager(
            MockEventRepository::new(),
            MockAttendanceRepository::new(),
            MockUserRepository::new(),
        );
        let actor = as_member(5, Role::ChoirMember, vec![]);
        let result = service
            .member_attendance(&actor, ChoirScope::Choir(1), 6, None, None)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn attendance_admin_cannot_read_another_choirs_member() {
        let mut repo = MockAttendanceRepository::new();
        repo.expect_list_for_user().never();

        let service = manager(MockEventRepository::new(), repo, members_of(2));
        let actor = as_member(5, Role::AttendanceAdmin, vec![]);
        let result = service
            .member_summary(&actor, ChoirScope::Choir(1), 6, None, None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn summary_counts_statuses() {
        let mut repo = MockAttendanceRepository::new();
        repo.expect_list_for_user()
            .with(eq(5), eq(Some(date(2024, 1, 1))), eq(Some(date(2024, 12, 31))))
            .returning(|_, _, _| {
                Ok(vec![
                    record(5, AttendanceStatus::Present),
                    record(5, AttendanceStatus::Late),
                    record(5, AttendanceStatus::Absent),
                    record(5, AttendanceStatus::Excused),
                ])
            });

        let service = manager(MockEventRepository::new(), repo, members_of(1));
        let actor = as_member(5, Role::ChoirMember, vec![]);
        let summary = service
            .member_summary(
                &actor,
                ChoirScope::Choir(1),
                5,
                Some(date(2024, 1, 1)),
                Some(date(2024, 12, 31)),
            )
            .await
            .unwrap();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.present, 1);
        assert_eq!(summary.late, 1);
        assert!((summary.attendance_rate - 0.5).abs() < f64::EPSILON);
    }
}
