//! Service container - one place to reach every application service.
//!
//! The gateway holds an `Arc<dyn ServiceContainer>`, so handler tests can
//! swap in `MockServiceContainer` without a database.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AdminManager, AdminService, AttendanceManager, AttendanceService, AuthService, Authenticator,
    ChoirManager, ChoirService, CommuniqueManager, CommuniqueService, EventManager, EventService,
    LeadershipShiftManager, LeadershipShiftService, LeaveManager, LeaveService,
    LouadoShiftManager, LouadoShiftService, PerformanceManager, PerformanceService,
    RehearsalManager, RehearsalService, ReportManager, ReportService, SongManager, SongService,
    TransactionManager, TransactionService, UserManager, UserService,
};
use crate::repository::{
    AdminUserRepository, AdminUserStore, AttendanceRepository, AttendanceStore, ChoirRepository,
    ChoirStore, CommuniqueRepository, CommuniqueStore, EventRepository, EventStore,
    LeadershipShiftRepository, LeadershipShiftStore, LeaveRepository, LeaveStore,
    LouadoShiftRepository, LouadoShiftStore, PerformanceRepository, PerformanceStore,
    RehearsalRepository, RehearsalStore, ReportRepository, ReportStore, SongRepository,
    SongStore, TransactionRepository, TransactionStore, UserRepository, UserStore,
};
use common::JwtConfig;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn choirs(&self) -> Arc<dyn ChoirService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn admins(&self) -> Arc<dyn AdminService>;

    fn events(&self) -> Arc<dyn EventService>;

    fn attendance(&self) -> Arc<dyn AttendanceService>;

    fn leaves(&self) -> Arc<dyn LeaveService>;

    fn transactions(&self) -> Arc<dyn TransactionService>;

    fn songs(&self) -> Arc<dyn SongService>;

    fn performances(&self) -> Arc<dyn PerformanceService>;

    fn rehearsals(&self) -> Arc<dyn RehearsalService>;

    fn leadership_shifts(&self) -> Arc<dyn LeadershipShiftService>;

    fn louado_shifts(&self) -> Arc<dyn LouadoShiftService>;

    fn communiques(&self) -> Arc<dyn CommuniqueService>;

    fn reports(&self) -> Arc<dyn ReportService>;
}

/// Every repository the services depend on.
#[derive(Clone)]
pub struct Repositories {
    pub choirs: Arc<dyn ChoirRepository>,
    pub users: Arc<dyn UserRepository>,
    pub admins: Arc<dyn AdminUserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub leaves: Arc<dyn LeaveRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub songs: Arc<dyn SongRepository>,
    pub performances: Arc<dyn PerformanceRepository>,
    pub rehearsals: Arc<dyn RehearsalRepository>,
    pub leadership_shifts: Arc<dyn LeadershipShiftRepository>,
    pub louado_shifts: Arc<dyn LouadoShiftRepository>,
    pub communiques: Arc<dyn CommuniqueRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl Repositories {
    /// SeaORM stores sharing one connection pool
    pub fn postgres(db: DatabaseConnection) -> Self {
        Self {
            choirs: Arc::new(ChoirStore::new(db.clone())),
            users: Arc::new(UserStore::new(db.clone())),
            admins: Arc::new(AdminUserStore::new(db.clone())),
            events: Arc::new(EventStore::new(db.clone())),
            attendance: Arc::new(AttendanceStore::new(db.clone())),
            leaves: Arc::new(LeaveStore::new(db.clone())),
            transactions: Arc::new(TransactionStore::new(db.clone())),
            songs: Arc::new(SongStore::new(db.clone())),
            performances: Arc::new(PerformanceStore::new(db.clone())),
            rehearsals: Arc::new(RehearsalStore::new(db.clone())),
            leadership_shifts: Arc::new(LeadershipShiftStore::new(db.clone())),
            louado_shifts: Arc::new(LouadoShiftStore::new(db.clone())),
            communiques: Arc::new(CommuniqueStore::new(db.clone())),
            reports: Arc::new(ReportStore::new(db)),
        }
    }
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth: Arc<dyn AuthService>,
    choirs: Arc<dyn ChoirService>,
    users: Arc<dyn UserService>,
    admins: Arc<dyn AdminService>,
    events: Arc<dyn EventService>,
    attendance: Arc<dyn AttendanceService>,
    leaves: Arc<dyn LeaveService>,
    transactions: Arc<dyn TransactionService>,
    songs: Arc<dyn SongService>,
    performances: Arc<dyn PerformanceService>,
    rehearsals: Arc<dyn RehearsalService>,
    leadership_shifts: Arc<dyn LeadershipShiftService>,
    louado_shifts: Arc<dyn LouadoShiftService>,
    communiques: Arc<dyn CommuniqueService>,
    reports: Arc<dyn ReportService>,
}

impl Services {
    /// Wire every service over the given repositories
    pub fn new(repos: Repositories, jwt: JwtConfig) -> Self {
        Self {
            auth: Arc::new(Authenticator::new(
                repos.users.clone(),
                repos.admins.clone(),
                jwt,
            )),
            choirs: Arc::new(ChoirManager::new(repos.choirs)),
            users: Arc::new(UserManager::new(repos.users.clone())),
            admins: Arc::new(AdminManager::new(repos.admins)),
            events: Arc::new(EventManager::new(repos.events.clone())),
            attendance: Arc::new(AttendanceManager::new(
                repos.events,
                repos.attendance,
                repos.users.clone(),
            )),
            leaves: Arc::new(LeaveManager::new(repos.leaves, repos.users)),
            transactions: Arc::new(TransactionManager::new(repos.transactions)),
            songs: Arc::new(SongManager::new(repos.songs)),
            performances: Arc::new(PerformanceManager::new(repos.performances)),
            rehearsals: Arc::new(RehearsalManager::new(repos.rehearsals)),
            leadership_shifts: Arc::new(LeadershipShiftManager::new(repos.leadership_shifts)),
            louado_shifts: Arc::new(LouadoShiftManager::new(repos.louado_shifts)),
            communiques: Arc::new(CommuniqueManager::new(repos.communiques)),
            reports: Arc::new(ReportManager::new(repos.reports)),
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: DatabaseConnection, jwt: JwtConfig) -> Self {
        Self::new(Repositories::postgres(db), jwt)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn choirs(&self) -> Arc<dyn ChoirService> {
        self.choirs.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn admins(&self) -> Arc<dyn AdminService> {
        self.admins.clone()
    }

    fn events(&self) -> Arc<dyn EventService> {
        self.events.clone()
    }

    fn attendance(&self) -> Arc<dyn AttendanceService> {
        self.attendance.clone()
    }

    fn leaves(&self) -> Arc<dyn LeaveService> {
        self.leaves.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionService> {
        self.transactions.clone()
    }

    fn songs(&self) -> Arc<dyn SongService> {
        self.songs.clone()
    }

    fn performances(&self) -> Arc<dyn PerformanceService> {
        self.performances.clone()
    }

    fn rehearsals(&self) -> Arc<dyn RehearsalService> {
        self.rehearsals.clone()
    }

    fn leadership_shifts(&self) -> Arc<dyn LeadershipShiftService> {
        self.leadership_shifts.clone()
    }

    fn louado_shifts(&self) -> Arc<dyn LouadoShiftService> {
        self.louado_shifts.clone()
    }

    fn communiques(&self) -> Arc<dyn CommuniqueService> {
        self.communiques.clone()
    }

    fn reports(&self) -> Arc<dyn ReportService> {
        self.reports.clone()
    }
}
