//! Performances and their song tree.
//!
//! A performance owns an ordered list of songs. Each song owns its musicians
//! and its voice parts, and each voice part owns a list of members. The whole
//! tree is written and replaced as one unit.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::validation::ensure_not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(
    feature = "persistence",
    derive(sea_orm::EnumIter, sea_orm::DeriveActiveEnum)
)]
#[cfg_attr(
    feature = "persistence",
    sea_orm(rs_type = "String", db_type = "Enum", enum_name = "voice_type")
)]
pub enum VoiceType {
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "SOPRANO"))]
    Soprano,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "ALTO"))]
    Alto,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "TENOR"))]
    Tenor,
    #[cfg_attr(feature = "persistence", sea_orm(string_value = "BASS"))]
    Bass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Performance {
    pub id: i32,
    pub title: String,
    pub venue: Option<String>,
    pub performance_date: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PerformanceMusician {
    pub id: i32,
    pub user_id: i32,
    pub instrument: Option<String>,
    pub is_solo: bool,
    pub is_accompanist: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VoicePart {
    pub id: i32,
    pub voice_type: VoiceType,
    pub notes: Option<String>,
    pub member_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PerformanceSong {
    pub id: i32,
    pub song_id: i32,
    pub order: i32,
    pub musical_key: Option<String>,
    pub notes: Option<String>,
    pub musicians: Vec<PerformanceMusician>,
    pub voice_parts: Vec<VoicePart>,
}

/// A performance with its full song tree, songs sorted by order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PerformanceDetail {
    #[serde(flatten)]
    pub performance: Performance,
    pub songs: Vec<PerformanceSong>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MusicianDraft {
    pub user_id: i32,
    pub instrument: Option<String>,
    #[serde(default)]
    pub is_solo: bool,
    #[serde(default)]
    pub is_accompanist: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VoicePartDraft {
    pub voice_type: VoiceType,
    pub notes: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PerformanceSongDraft {
    pub song_id: i32,
    pub order: i32,
    pub musical_key: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub musicians: Vec<MusicianDraft>,
    #[serde(default)]
    pub voice_parts: Vec<VoicePartDraft>,
}

/// Everything needed to create or replace a performance.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceDraft {
    pub title: String,
    pub venue: Option<String>,
    pub performance_date: DateTime<Utc>,
    pub description: Option<String>,
    pub songs: Vec<PerformanceSongDraft>,
}

impl PerformanceDraft {
    /// Check the tree before anything is written.
    ///
    /// Song orders are positive and unique; voice types are unique per song;
    /// a musician appears at most once per song; a member sits in a voice
    /// part at most once.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_not_blank(&self.title, "title")?;

        let mut orders = HashSet::new();
        for song in &self.songs {
            if song.order < 1 {
                return Err(DomainError::validation(format!(
                    "Song order must be positive, got {}",
                    song.order
                )));
            }
            if !orders.insert(song.order) {
                return Err(DomainError::validation(format!(
                    "Song order {} is used more than once",
                    song.order
                )));
            }

            let mut musicians = HashSet::new();
            for musician in &song.musicians {
                if !musicians.insert(musician.user_id) {
                    return Err(DomainError::validation(format!(
                        "Musician {} is assigned twice to song at order {}",
                        musician.user_id, song.order
                    )));
                }
            }

            let mut voices = HashSet::new();
            for part in &song.voice_parts {
                if !voices.insert(part.voice_type) {
                    return Err(DomainError::validation(format!(
                        "Voice type {:?} is repeated in song at order {}",
                        part.voice_type, song.order
                    )));
                }
                let mut members = HashSet::new();
                if let Some(dup) = part.member_ids.iter().find(|id| !members.insert(**id)) {
                    return Err(DomainError::validation(format!(
                        "Member {} is listed twice in a voice part",
                        dup
                    )));
                }
            }
        }

        Ok(())
    }
}
