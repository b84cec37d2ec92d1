//! Store tests against a real PostgreSQL database.
//!
//! Set `TEST_DATABASE_URL` to run them; without it every test returns early.
//! Migrations are applied on connect. Rows are created with unique names so
//! the tests can share one database.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{NaiveDate, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use choir_service_lib::infra::Database;
use choir_service_lib::repository::entities::{performance_song, performance_voice_part};
use choir_service_lib::repository::{
    LeadershipShiftRepository, LeadershipShiftStore, LeaveRepository, LeaveStore,
    PerformanceRepository, PerformanceStore, SongRepository, SongStore, UserRepository,
    UserStore,
};
use common::AppError;
use domain::{
    Category, ChoirScope, Gender, LeaveStatus, MemberStatus, MusicianDraft, NewLeadershipShift,
    NewLeave, NewSong, NewUser, PerformanceDraft, PerformanceSongDraft, Role, ShiftStatus,
    StatusReason, VoicePartDraft, VoiceType,
};

static SEQ: AtomicU32 = AtomicU32::new(0);

fn unique(prefix: &str) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        Utc::now().timestamp_micros(),
        SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn connect() -> Option<sea_orm::DatabaseConnection> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let db = Database::connect_without_migrations(&url).await.unwrap();
    db.run_migrations().await.unwrap();
    Some(db.get_connection())
}

async fn create_member(users: &UserStore) -> i32 {
    users
        .create(NewUser {
            choir_id: None,
            first_name: "Test".to_string(),
            last_name: "Member".to_string(),
            email: format!("{}@choir.test", unique("member")),
            phone_number: None,
            password_hash: None,
            gender: Gender::Male,
            date_of_birth: None,
            address: None,
            categories: vec![Category::Singer],
            role: Role::ChoirMember,
            joined_at: date(2024, 1, 1),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn concurrent_activation_leaves_one_active_shift() {
    let Some(db) = connect().await else { return };
    let users = UserStore::new(db.clone());
    let shifts = LeadershipShiftStore::new(db.clone());
    let leader_id = create_member(&users).await;

    let mut ids = Vec::new();
    for _ in 0..3 {
        let shift = shifts
            .create(NewLeadershipShift {
                name: unique("shift"),
                leader_id,
                start_date: date(2024, 1, 1),
                end_date: date(2024, 12, 31),
                status: ShiftStatus::Upcoming,
                notes: None,
            })
            .await
            .unwrap();
        ids.push(shift.id);
    }

    let (a, b, c) = tokio::join!(
        shifts.activate(ids[0]),
        shifts.activate(ids[1]),
        shifts.activate(ids[2]),
    );
    for result in [a, b, c] {
        match result {
            Ok(shift) => assert_eq!(shift.status, ShiftStatus::Active),
            Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("unexpected activation error: {other:?}"),
        }
    }

    let active: Vec<_> = shifts
        .list()
        .await
        .unwrap()
        .into_iter()
        .filter(|s| s.status == ShiftStatus::Active)
        .collect();
    assert_eq!(active.len(), 1);
}

#[tokio::test]
async fn deleting_performance_removes_its_song_tree() {
    let Some(db) = connect().await else { return };
    let users = UserStore::new(db.clone());
    let songs = SongStore::new(db.clone());
    let performances = PerformanceStore::new(db.clone());

    let member_id = create_member(&users).await;
    let song = songs
        .create(NewSong {
            title: unique("song"),
            composer: None,
            genre: None,
            language: None,
            musical_key: Some("G".to_string()),
            lyrics: None,
        })
        .await
        .unwrap();

    let detail = performances
        .create(PerformanceDraft {
            title: unique("concert"),
            venue: None,
            performance_date: Utc::now(),
            description: None,
            songs: vec![PerformanceSongDraft {
                song_id: song.id,
                order: 1,
                musical_key: None,
                notes: None,
                musicians: vec![MusicianDraft {
                    user_id: member_id,
                    instrument: Some("Piano".to_string()),
                    is_solo: false,
                    is_accompanist: true,
                }],
                voice_parts: vec![VoicePartDraft {
                    voice_type: VoiceType::Tenor,
                    notes: None,
                    member_ids: vec![member_id],
                }],
            }],
        })
        .await
        .unwrap();
    assert_eq!(detail.songs.len(), 1);

    let performance_id = detail.performance.id;
    let song_ids: Vec<i32> = detail.songs.iter().map(|s| s.id).collect();

    performances.delete(performance_id).await.unwrap();

    assert!(performances.find_detail(performance_id).await.unwrap().is_none());
    let remaining_songs = performance_song::Entity::find()
        .filter(performance_song::Column::PerformanceId.eq(performance_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(remaining_songs, 0);
    let remaining_parts = performance_voice_part::Entity::find()
        .filter(performance_voice_part::Column::PerformanceSongId.is_in(song_ids))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(remaining_parts, 0);

    // the song itself stays in the repertoire
    assert!(songs.find_by_id(song.id).await.unwrap().is_some());
}

#[tokio::test]
async fn approving_leave_puts_member_on_leave() {
    let Some(db) = connect().await else { return };
    let users = UserStore::new(db.clone());
    let leaves = LeaveStore::new(db.clone());
    let member_id = create_member(&users).await;

    let request = leaves
        .create(NewLeave {
            user_id: member_id,
            reason: StatusReason::Education,
            start_date: date(2024, 9, 1),
            end_date: date(2025, 6, 30),
            note: None,
        })
        .await
        .unwrap();

    let approved = leaves.approve(request.id, None).await.unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert!(approved.reviewed_at.is_some());

    let member = users.find_by_id(member_id).await.unwrap().unwrap();
    assert_eq!(member.status, Some(MemberStatus::OnLeave));
    assert_eq!(member.status_reason, Some(StatusReason::Education));

    let again = leaves.approve(request.id, None).await;
    assert!(matches!(again, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn concurrent_status_changes_never_leave_expelled() {
    let Some(db) = connect().await else { return };
    let users = UserStore::new(db.clone());
    let member_id = create_member(&users).await;
    users
        .update_status(member_id, MemberStatus::OnLeave, StatusReason::Travel)
        .await
        .unwrap();

    let (expel, suspend) = tokio::join!(
        users.update_status(member_id, MemberStatus::Expelled, StatusReason::GrossMisconduct),
        users.update_status(member_id, MemberStatus::Suspended, StatusReason::Misconduct),
    );

    // either order ends expelled: a later suspension is refused, an earlier
    // one can still be escalated
    assert!(expel.is_ok());
    if let Err(err) = suspend {
        assert!(matches!(err, AppError::Validation(_)));
    }
    let member = users.find_by_id(member_id).await.unwrap().unwrap();
    assert_eq!(member.status, Some(MemberStatus::Expelled));

    let reopen = users
        .update_status(member_id, MemberStatus::Suspended, StatusReason::Misconduct)
        .await;
    assert!(matches!(reopen, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn leave_listing_follows_member_choir() {
    let Some(db) = connect().await else { return };
    let users = UserStore::new(db.clone());
    let leaves = LeaveStore::new(db.clone());
    let member_id = create_member(&users).await;

    let request = leaves
        .create(NewLeave {
            user_id: member_id,
            reason: StatusReason::Work,
            start_date: date(2024, 3, 1),
            end_date: date(2024, 3, 15),
            note: None,
        })
        .await
        .unwrap();

    let unaffiliated = leaves
        .list(ChoirScope::Unaffiliated, None, Some(member_id))
        .await
        .unwrap();
    assert!(unaffiliated.iter().any(|l| l.id == request.id));

    let other_choir = leaves
        .list(ChoirScope::Choir(i32::MAX), None, Some(member_id))
        .await
        .unwrap();
    assert!(other_choir.is_empty());
}
