//! SeaORM entities, one module per table.

pub mod admin_user;
pub mod attendance;
pub mod choir;
pub mod communique;
pub mod event;
pub mod leadership_shift;
pub mod leave;
pub mod louado_shift;
pub mod performance;
pub mod performance_song;
pub mod performance_song_musician;
pub mod performance_voice_part;
pub mod performance_voice_part_member;
pub mod rehearsal;
pub mod rehearsal_song;
pub mod report;
pub mod song;
pub mod transaction;
pub mod user;
