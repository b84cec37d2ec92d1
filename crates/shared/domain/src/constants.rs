//! Fixed limits and defaults of the choir domain.

/// Shortest accepted password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Longest accepted password; bounds Argon2 work per login
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Currency of a transaction that names none (Rwandan franc)
pub const DEFAULT_CURRENCY: &str = "RWF";

// Tokens

pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// HS256 secrets shorter than this are refused at startup
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Prefix of the `Authorization` header value
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// `tokenType` of every login response
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// Uploads

/// 5 MiB
pub const MAX_IMAGE_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];
