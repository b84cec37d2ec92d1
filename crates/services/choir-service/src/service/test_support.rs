//! Fixtures shared by the service unit tests.

use std::sync::OnceLock;

use chrono::{NaiveDate, Utc};

use domain::{
    AdminUser, Category, Gender, MemberStatus, Password, Principal, PrincipalKind, Role, User,
};

pub const PASSWORD: &str = "correct-horse-battery";

pub fn member(id: i32, choir_id: Option<i32>) -> User {
    let now = Utc::now();
    User {
        id,
        choir_id,
        first_name: "Aline".to_string(),
        last_name: "Uwase".to_string(),
        email: format!("member{}@choir.test", id),
        phone_number: None,
        password_hash: Some(password_hash()),
        gender: Gender::Female,
        date_of_birth: None,
        address: None,
        profile_image_url: None,
        categories: vec![Category::Singer],
        role: Role::ChoirMember,
        status: None,
        status_reason: None,
        is_active: true,
        joined_at: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap_or_default(),
        created_at: now,
        updated_at: now,
    }
}

pub fn member_with_status(id: i32, status: MemberStatus) -> User {
    User {
        status: Some(status),
        ..member(id, Some(1))
    }
}

pub fn admin_account(id: i32, role: Role, choir_id: Option<i32>) -> AdminUser {
    let now = Utc::now();
    AdminUser {
        id,
        email: format!("admin{}@choir.test", id),
        password_hash: password_hash(),
        full_name: "Back Office".to_string(),
        role,
        choir_id,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn as_member(id: i32, role: Role, categories: Vec<Category>) -> Principal {
    Principal {
        id,
        kind: PrincipalKind::Member,
        email: format!("member{}@choir.test", id),
        role,
        categories,
        choir_id: Some(1),
    }
}

pub fn as_admin(role: Role, choir_id: Option<i32>) -> Principal {
    Principal {
        id: 900,
        kind: PrincipalKind::Admin,
        email: "admin@choir.test".to_string(),
        role,
        categories: Vec::new(),
        choir_id,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Hashed once per test binary.
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| Password::new(PASSWORD).unwrap().into_string())
        .clone()
}
