//! Choir (tenant) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Choir {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewChoir {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChoirChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Which choir's rows an operation may see or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoirScope {
    /// Every choir. Only super admins work unscoped.
    All,
    /// A single choir.
    Choir(i32),
    /// Rows attached to no choir, for accounts that belong to none.
    Unaffiliated,
}

impl ChoirScope {
    pub fn choir_id(&self) -> Option<i32> {
        match self {
            ChoirScope::Choir(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether a row owned by `choir_id` is inside this scope.
    pub fn contains(&self, choir_id: Option<i32>) -> bool {
        match self {
            ChoirScope::All => true,
            ChoirScope::Choir(id) => choir_id == Some(*id),
            ChoirScope::Unaffiliated => choir_id.is_none(),
        }
    }

    /// Choir a new row is attached to. `requested` is honoured only when unscoped.
    pub fn assign(&self, requested: Option<i32>) -> Option<i32> {
        match self {
            ChoirScope::All => requested,
            ChoirScope::Choir(id) => Some(*id),
            ChoirScope::Unaffiliated => None,
        }
    }
}
