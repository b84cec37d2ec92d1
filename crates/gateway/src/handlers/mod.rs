//! HTTP handlers, one module per resource.

pub mod admin_user_handler;
pub mod auth_handler;
pub mod choir_handler;
pub mod communique_handler;
pub mod event_handler;
pub mod health_handler;
pub mod leave_handler;
mod patterns;
pub mod performance_handler;
pub mod rehearsal_handler;
pub mod report_handler;
pub mod shift_handler;
pub mod song_handler;
pub mod transaction_handler;
pub mod upload_handler;
pub mod user_handler;

pub use admin_user_handler::admin_user_routes;
pub use auth_handler::auth_routes;
pub use choir_handler::choir_routes;
pub use communique_handler::communique_routes;
pub use event_handler::event_routes;
pub use health_handler::health_routes;
pub use leave_handler::leave_routes;
pub use performance_handler::performance_routes;
pub use rehearsal_handler::rehearsal_routes;
pub use report_handler::report_routes;
pub use shift_handler::{leadership_shift_routes, louado_shift_routes};
pub use song_handler::song_routes;
pub use transaction_handler::transaction_routes;
pub use upload_handler::upload_routes;
pub use user_handler::user_routes;
