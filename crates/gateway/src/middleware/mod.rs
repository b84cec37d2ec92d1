//! Middleware for authentication, access guards and choir scoping.

mod auth;
mod choir_context;
mod guard;

pub use auth::{auth_middleware, is_public};
pub use choir_context::{choir_context_middleware, resolve_scope, ChoirContext, CHOIR_ID_HEADER};
pub use guard::{AccessPolicy, Guarded};
