//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Lifecycle rules (member status, leave decisions, shift activation) live
//! here so every caller validates them the same way.

pub mod access;
pub mod attendance;
pub mod auth;
pub mod choir;
pub mod communique;
pub mod constants;
pub mod error;
pub mod finance;
pub mod leave;
pub mod password;
pub mod performance;
pub mod rehearsal;
pub mod report;
pub mod repertoire;
pub mod shift;
pub mod status;
pub mod user;
pub mod validation;

pub use access::{has_any_category, Category, Role};
pub use attendance::{
    AttendanceMark, AttendanceRecord, AttendanceStatus, AttendanceSummary, Event, EventChanges,
    EventFilter, EventType, NewEvent,
};
pub use auth::{Claims, TokenResponse};
pub use choir::{Choir, ChoirChanges, ChoirScope, NewChoir};
pub use communique::{can_manage_communiques, Communique, CommuniqueChanges, NewCommunique};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use finance::{
    CurrencyTotals, FinancialSummary, NewTransaction, Transaction, TransactionCategory,
    TransactionChanges, TransactionFilter, TransactionType,
};
pub use leave::{Leave, LeaveStatus, NewLeave};
pub use password::{Password, DUMMY_PASSWORD_HASH};
pub use performance::{
    MusicianDraft, Performance, PerformanceDetail, PerformanceDraft, PerformanceMusician,
    PerformanceSong, PerformanceSongDraft, VoicePart, VoicePartDraft, VoiceType,
};
pub use rehearsal::{Rehearsal, RehearsalDetail, RehearsalDraft, RehearsalSong, RehearsalSongDraft};
pub use report::{NewReport, Report, ReportType};
pub use repertoire::{NewSong, Song, SongChanges};
pub use shift::{
    LeadershipShift, LeadershipShiftChanges, LouadoShift, LouadoShiftChanges, NewLeadershipShift,
    NewLouadoShift, ShiftStatus,
};
pub use status::{can_transition, validate_status_change, MemberStatus, StatusReason};
pub use user::{
    AdminUser, AdminUserResponse, Gender, NewAdminUser, NewUser, Principal, PrincipalKind, User,
    UserFilter, UserProfileChanges, UserResponse,
};
pub use validation::{ensure_date_range, ensure_not_blank, normalize_email};
