//! Rehearsals and the songs practised in them.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::validation::ensure_not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Rehearsal {
    pub id: i32,
    pub title: String,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub performance_id: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RehearsalSong {
    pub id: i32,
    pub song_id: i32,
    pub order: i32,
    pub musical_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RehearsalDetail {
    #[serde(flatten)]
    pub rehearsal: Rehearsal,
    pub rehearsal_songs: Vec<RehearsalSong>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RehearsalSongDraft {
    pub song_id: i32,
    pub musical_key: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RehearsalDraft {
    pub title: String,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub performance_id: Option<i32>,
    pub notes: Option<String>,
    pub rehearsal_songs: Vec<RehearsalSongDraft>,
}

impl RehearsalDraft {
    pub fn validate(&self) -> DomainResult<()> {
        ensure_not_blank(&self.title, "title")?;
        crate::attendance::ensure_event_window(self.starts_at, self.ends_at)?;

        let mut orders = HashSet::new();
        for song in &self.rehearsal_songs {
            if song.order < 1 || !orders.insert(song.order) {
                return Err(DomainError::validation(format!(
                    "Rehearsal song order {} must be positive and unique",
                    song.order
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(orders: &[i32]) -> RehearsalDraft {
        RehearsalDraft {
            title: "Sunday prep".to_string(),
            venue: None,
            starts_at: Utc::now(),
            ends_at: None,
            performance_id: None,
            notes: None,
            rehearsal_songs: orders
                .iter()
                .map(|order| RehearsalSongDraft {
                    song_id: 1,
                    musical_key: Some("C Major".to_string()),
                    order: *order,
                })
                .collect(),
        }
    }

    #[test]
    fn single_song_draft_is_valid() {
        assert!(draft(&[1]).validate().is_ok());
    }

    #[test]
    fn duplicate_orders_are_rejected() {
        assert!(draft(&[1, 2, 1]).validate().is_err());
        assert!(draft(&[-1]).validate().is_err());
    }

    #[test]
    fn song_draft_reads_camel_case() {
        let parsed: RehearsalSongDraft =
            serde_json::from_str(r#"{"songId":1,"musicalKey":"C Major","order":1}"#).unwrap();
        assert_eq!(parsed.song_id, 1);
        assert_eq!(parsed.musical_key.as_deref(), Some("C Major"));
    }
}
