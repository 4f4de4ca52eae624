use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A reference to a single track in a remote collection
///
/// Identity is the `id` alone: two values with the same id are the same track
/// even if their name or timestamp differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Opaque identifier, unique within a collection
    pub id: String,

    /// Display name (diagnostics only)
    pub name: String,

    /// When the track was added to its collection (ISO 8601 / RFC 3339)
    pub added_at: String,
}

impl Track {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        added_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            added_at: added_at.into(),
        }
    }

    /// Parsed `added_at`, or None if the service handed us something unparsable
    pub fn added_at_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.added_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
