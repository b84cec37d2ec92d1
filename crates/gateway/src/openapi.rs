//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::{
    admin_user_handler, auth_handler, choir_handler, communique_handler, event_handler,
    health_handler, leave_handler, performance_handler, rehearsal_handler, report_handler,
    shift_handler, song_handler, transaction_handler, upload_handler, user_handler,
};
use domain::{
    AdminUserResponse, AttendanceMark, AttendanceRecord, AttendanceStatus, AttendanceSummary,
    Category, Choir, Communique, CurrencyTotals, Event, EventType, FinancialSummary, Gender,
    LeadershipShift, Leave, LeaveStatus, LouadoShift, MemberStatus, MusicianDraft, Performance,
    PerformanceDetail, PerformanceMusician, PerformanceSong, PerformanceSongDraft, Principal,
    PrincipalKind, Rehearsal, RehearsalDetail, RehearsalSong, RehearsalSongDraft, Report,
    ReportType, Role, ShiftStatus, Song, StatusReason, TokenResponse, Transaction,
    TransactionCategory, TransactionType, UserResponse, VoicePart, VoicePartDraft, VoiceType,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler::health,
        auth_handler::login,
        auth_handler::admin_login,
        auth_handler::me,
        choir_handler::list_choirs,
        choir_handler::get_choir,
        choir_handler::create_choir,
        choir_handler::update_choir,
        choir_handler::delete_choir,
        admin_user_handler::list_admins,
        admin_user_handler::create_admin,
        admin_user_handler::deactivate_admin,
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::change_status,
        user_handler::change_role,
        user_handler::change_categories,
        user_handler::deactivate_user,
        user_handler::restore_user,
        user_handler::member_attendance,
        user_handler::member_attendance_summary,
        event_handler::list_events,
        event_handler::get_event,
        event_handler::create_event,
        event_handler::update_event,
        event_handler::delete_event,
        event_handler::event_attendance,
        event_handler::record_attendance,
        leave_handler::request_leave,
        leave_handler::my_leaves,
        leave_handler::list_leaves,
        leave_handler::get_leave,
        leave_handler::approve_leave,
        leave_handler::reject_leave,
        leave_handler::cancel_leave,
        transaction_handler::list_transactions,
        transaction_handler::summary,
        transaction_handler::get_transaction,
        transaction_handler::create_transaction,
        transaction_handler::update_transaction,
        transaction_handler::delete_transaction,
        song_handler::list_songs,
        song_handler::get_song,
        song_handler::create_song,
        song_handler::update_song,
        song_handler::delete_song,
        performance_handler::list_performances,
        performance_handler::get_performance,
        performance_handler::create_performance,
        performance_handler::replace_performance,
        performance_handler::delete_performance,
        rehearsal_handler::list_rehearsals,
        rehearsal_handler::get_rehearsal,
        rehearsal_handler::create_rehearsal,
        rehearsal_handler::replace_rehearsal,
        rehearsal_handler::delete_rehearsal,
        shift_handler::list_shifts,
        shift_handler::current_shift,
        shift_handler::get_shift,
        shift_handler::create_shift,
        shift_handler::update_shift,
        shift_handler::activate_shift,
        shift_handler::set_shift_status,
        shift_handler::delete_shift,
        shift_handler::list_louado_shifts,
        shift_handler::get_louado_shift,
        shift_handler::create_louado_shift,
        shift_handler::update_louado_shift,
        shift_handler::delete_louado_shift,
        communique_handler::list_communiques,
        communique_handler::get_communique,
        communique_handler::create_communique,
        communique_handler::update_communique,
        communique_handler::publish_communique,
        communique_handler::delete_communique,
        report_handler::list_reports,
        report_handler::get_report,
        report_handler::create_report,
        report_handler::delete_report,
        upload_handler::upload_image,
    ),
    components(
        schemas(
            health_handler::HealthResponse,
            health_handler::ServiceHealth,
            health_handler::ServiceStatus,
            auth_handler::LoginRequest,
            choir_handler::CreateChoirRequest,
            choir_handler::UpdateChoirRequest,
            admin_user_handler::CreateAdminRequest,
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            user_handler::ChangeStatusRequest,
            user_handler::ChangeRoleRequest,
            user_handler::ChangeCategoriesRequest,
            event_handler::CreateEventRequest,
            event_handler::UpdateEventRequest,
            event_handler::RecordAttendanceRequest,
            leave_handler::LeaveRequest,
            transaction_handler::CreateTransactionRequest,
            transaction_handler::UpdateTransactionRequest,
            song_handler::CreateSongRequest,
            song_handler::UpdateSongRequest,
            performance_handler::PerformanceRequest,
            rehearsal_handler::RehearsalRequest,
            shift_handler::CreateShiftRequest,
            shift_handler::UpdateShiftRequest,
            shift_handler::ShiftStatusRequest,
            shift_handler::CreateLouadoShiftRequest,
            shift_handler::UpdateLouadoShiftRequest,
            communique_handler::CreateCommuniqueRequest,
            communique_handler::UpdateCommuniqueRequest,
            report_handler::CreateReportRequest,
            upload_handler::ImageUploadForm,
            upload_handler::UploadResponse,
            TokenResponse,
            Principal,
            PrincipalKind,
            Role,
            Category,
            Gender,
            MemberStatus,
            StatusReason,
            Choir,
            UserResponse,
            AdminUserResponse,
            Event,
            EventType,
            AttendanceMark,
            AttendanceRecord,
            AttendanceStatus,
            AttendanceSummary,
            Leave,
            LeaveStatus,
            Transaction,
            TransactionType,
            TransactionCategory,
            FinancialSummary,
            CurrencyTotals,
            Song,
            Performance,
            PerformanceDetail,
            PerformanceSong,
            PerformanceMusician,
            VoicePart,
            VoiceType,
            PerformanceSongDraft,
            MusicianDraft,
            VoicePartDraft,
            Rehearsal,
            RehearsalDetail,
            RehearsalSong,
            RehearsalSongDraft,
            LeadershipShift,
            ShiftStatus,
            LouadoShift,
            Communique,
            Report,
            ReportType,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Member and admin login"),
        (name = "Choirs", description = "Choirs of the organization"),
        (name = "Admin users", description = "Back-office accounts"),
        (name = "Users", description = "Member records and lifecycle"),
        (name = "Events", description = "Choir events"),
        (name = "Attendance", description = "Attendance marks and summaries"),
        (name = "Leaves", description = "Leave requests and their review"),
        (name = "Finance", description = "Ledger and per-currency summary"),
        (name = "Repertoire", description = "Songs, performances and rehearsals"),
        (name = "Shifts", description = "Leadership and louado shifts"),
        (name = "Communiques", description = "Announcements to member categories"),
        (name = "Reports", description = "Filed reports"),
        (name = "Uploads", description = "Image uploads"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource_and_bearer_scheme() {
        let doc = ApiDoc::openapi();

        for path in [
            "/health",
            "/auth/login",
            "/users/{id}/status",
            "/events/{id}/attendance",
            "/transactions/summary",
            "/performances/{id}",
            "/rehearsals",
            "/leadership-shifts/{id}/activate",
            "/louado-shifts",
            "/communiques/{id}/publish",
            "/reports",
            "/uploads/images",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn amounts_are_documented_as_decimal_strings() {
        let components = ApiDoc::openapi().components.expect("components");
        let transaction = serde_json::to_value(&components.schemas["Transaction"]).unwrap();

        let amount = &transaction["properties"]["amount"];
        assert_eq!(amount["type"], "string");
        assert_eq!(amount["example"], "15000.00");
    }
}
