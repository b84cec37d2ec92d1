//! Repository layer for data access.
//!
//! One trait per aggregate, each with a SeaORM-backed store. Writes that touch
//! several rows (performance and rehearsal trees, shift activation, leave
//! approval) run inside a single database transaction owned by the store.

pub mod entities;
mod attendance_repository;
mod choir_repository;
mod communique_repository;
mod event_repository;
mod leave_repository;
mod performance_repository;
mod rehearsal_repository;
mod report_repository;
mod shift_repository;
mod song_repository;
mod transaction_repository;
mod user_repository;

pub use attendance_repository::{AttendanceRepository, AttendanceStore};
pub use choir_repository::{ChoirRepository, ChoirStore};
pub use communique_repository::{CommuniqueRepository, CommuniqueStore};
pub use event_repository::{EventRepository, EventStore};
pub use leave_repository::{LeaveRepository, LeaveStore};
pub use performance_repository::{PerformanceRepository, PerformanceStore};
pub use rehearsal_repository::{RehearsalRepository, RehearsalStore};
pub use report_repository::{ReportRepository, ReportStore};
pub use shift_repository::{
    LeadershipShiftRepository, LeadershipShiftStore, LouadoShiftRepository, LouadoShiftStore,
};
pub use song_repository::{SongRepository, SongStore};
pub use transaction_repository::{TransactionRepository, TransactionStore};
pub use user_repository::{AdminUserRepository, AdminUserStore, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use attendance_repository::MockAttendanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use choir_repository::MockChoirRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use communique_repository::MockCommuniqueRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use event_repository::MockEventRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use leave_repository::MockLeaveRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use performance_repository::MockPerformanceRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use rehearsal_repository::MockRehearsalRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use report_repository::MockReportRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use shift_repository::{MockLeadershipShiftRepository, MockLouadoShiftRepository};
#[cfg(any(test, feature = "test-utils"))]
pub use song_repository::MockSongRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use transaction_repository::MockTransactionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::{MockAdminUserRepository, MockUserRepository};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use domain::ChoirScope;
use sea_orm::{ColumnTrait, Condition};

/// Row filter for a `choir_id` column under the given scope.
pub(crate) fn choir_condition<C: ColumnTrait>(column: C, scope: ChoirScope) -> Condition {
    match scope {
        ChoirScope::All => Condition::all(),
        ChoirScope::Choir(id) => Condition::all().add(column.eq(id)),
        ChoirScope::Unaffiliated => Condition::all().add(column.is_null()),
    }
}

/// Midnight UTC at the start of `date`.
pub(crate) fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Half-open timestamp bounds covering the inclusive date range `[from, to]`.
pub(crate) fn day_bounds<C: ColumnTrait>(
    column: C,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Condition {
    let mut condition = Condition::all();
    if let Some(from) = from {
        condition = condition.add(column.gte(start_of_day(from)));
    }
    if let Some(to) = to.and_then(|d| d.succ_opt()) {
        condition = condition.add(column.lt(start_of_day(to)));
    }
    condition
}
