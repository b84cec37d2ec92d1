//! Song repertoire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Song {
    pub id: i32,
    pub title: String,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub musical_key: Option<String>,
    pub lyrics: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSong {
    pub title: String,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub musical_key: Option<String>,
    pub lyrics: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SongChanges {
    pub title: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub language: Option<String>,
    pub musical_key: Option<String>,
    pub lyrics: Option<String>,
}
