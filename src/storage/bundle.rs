//! Export / import document bundling every persisted key.
//!
//! Older backups stored each value as the raw localStorage string, so a
//! collection may arrive either as JSON or as a string holding JSON. Both
//! are accepted.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::achievements::UnlockRecord;
use crate::run::GameMode;
use crate::scoring::{HistoryEntry, RunRecord};
use crate::traversal::NavDirection;

pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("backup is not a valid data document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("backup version {0} is newer than supported version {EXPORT_VERSION}")]
    UnsupportedVersion(u32),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBundle {
    /// Absent in legacy backups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, deserialize_with = "embedded", skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<UnlockRecord>>,
    #[serde(default, deserialize_with = "embedded", skip_serializing_if = "Option::is_none")]
    pub leaderboard: Option<Vec<RunRecord>>,
    #[serde(default, deserialize_with = "embedded", skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,
    #[serde(default, deserialize_with = "embedded", skip_serializing_if = "Option::is_none")]
    pub total_challenges: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_direction: Option<NavDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<GameMode>,
}

impl DataBundle {
    pub fn from_json(raw: &str) -> Result<Self, ImportError> {
        let bundle: DataBundle = serde_json::from_str(raw)?;
        match bundle.version {
            Some(v) if v > EXPORT_VERSION => Err(ImportError::UnsupportedVersion(v)),
            _ => Ok(bundle),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Embedded<T> {
    Direct(T),
    Encoded(String),
}

fn embedded<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Embedded<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Embedded::Direct(value)) => Ok(Some(value)),
        Some(Embedded::Encoded(raw)) => serde_json::from_str(&raw).map(Some).map_err(D::Error::custom),
    }
}
