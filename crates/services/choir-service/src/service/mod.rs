//! Application services.
//!
//! Services enforce the rules that need more than one row or the caller's
//! identity: tenant scoping, ownership, role grants and lifecycle checks.
//! Route-level role and category guards live in the gateway.

mod attendance_service;
mod auth_service;
mod choir_service;
mod communique_service;
mod container;
mod finance_service;
mod leave_service;
mod repertoire_service;
mod report_service;
mod shift_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use attendance_service::{AttendanceManager, AttendanceService, EventManager, EventService};
pub use auth_service::{AuthService, Authenticator};
pub use choir_service::{ChoirManager, ChoirService};
pub use communique_service::{CommuniqueManager, CommuniqueService};
pub use container::{Repositories, ServiceContainer, Services};
pub use finance_service::{TransactionManager, TransactionService};
pub use leave_service::{LeaveManager, LeaveService};
pub use repertoire_service::{
    PerformanceManager, PerformanceService, RehearsalManager, RehearsalService, SongManager,
    SongService,
};
pub use report_service::{ReportManager, ReportService};
pub use shift_service::{
    LeadershipShiftManager, LeadershipShiftService, LouadoShiftManager, LouadoShiftService,
};
pub use user_service::{AdminManager, AdminService, NewAdminAccount, UserManager, UserService};

use common::{AppError, AppResult};
use domain::{ChoirScope, Communique, Event, Principal, Report, Role, Transaction, User};

/// Records owned by a choir.
pub(crate) trait ChoirOwned {
    fn owner_choir(&self) -> Option<i32>;
}

macro_rules! choir_owned {
    ($($ty:ty),*) => {
        $(impl ChoirOwned for $ty {
            fn owner_choir(&self) -> Option<i32> {
                self.choir_id
            }
        })*
    };
}

choir_owned!(User, Event, Transaction, Communique, Report);

/// A record outside the caller's scope is reported as missing.
pub(crate) fn within_scope<T: ChoirOwned>(scope: ChoirScope, record: Option<T>) -> AppResult<T> {
    match record {
        Some(record) if scope.contains(record.owner_choir()) => Ok(record),
        _ => Err(AppError::NotFound),
    }
}

/// Members may act on their own records; anyone else needs one of `roles`.
pub(crate) fn ensure_self_or_role(actor: &Principal, user_id: i32, roles: &[Role]) -> AppResult<()> {
    if actor.member_id() == Some(user_id) || actor.role.satisfies(roles) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
