//! Mirror definition parsing and validation
//!
//! A definitions file is a JSON array. Entries are validated one by one so a
//! broken entry only takes itself out of the run.

use crate::error::{MirrorError, Result};
use crate::selection::{Selection, SelectionOrder};
use chrono::NaiveDate;
use serde::Deserialize;

/// Where the mirror's tracks come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Playlist { id: String },
    LikedSongs,
}

/// A validated mirror definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorDefinition {
    pub source: Source,
    pub selection: Selection,

    /// Explicit mirror playlist name; derived from the source name when absent
    pub name: Option<String>,
}

/// Definition as written in the file, before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDefinition {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(alias = "id")]
    source_id: Option<String>,
    selection: Option<RawSelection>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSelection {
    mode: Option<String>,
    date: Option<String>,
    count: Option<i64>,
    order: Option<SelectionOrder>,
}

impl MirrorDefinition {
    /// Validate a single JSON entry
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: RawDefinition = serde_json::from_value(value)
            .map_err(|e| MirrorError::Configuration(format!("Malformed mirror definition: {}", e)))?;
        raw.try_into()
    }
}

impl TryFrom<RawDefinition> for MirrorDefinition {
    type Error = MirrorError;

    fn try_from(raw: RawDefinition) -> Result<Self> {
        let source = match raw.kind.as_deref() {
            Some("playlist") => {
                let id = raw.source_id.filter(|id| !id.is_empty()).ok_or_else(|| {
                    MirrorError::Configuration("Missing `sourceId` for playlist mirror".to_string())
                })?;
                Source::Playlist { id }
            }
            Some("liked-songs") | Some("liked_songs") => Source::LikedSongs,
            Some(other) => {
                return Err(MirrorError::Configuration(format!(
                    "Unrecognized mirror type: {:?}",
                    other
                )))
            }
            None => return Err(MirrorError::Configuration("Missing mirror `type`".to_string())),
        };

        let raw_selection = raw
            .selection
            .ok_or_else(|| MirrorError::Configuration("Missing `selection`".to_string()))?;

        Ok(Self {
            source,
            selection: raw_selection.try_into()?,
            name: raw.name,
        })
    }
}

impl TryFrom<RawSelection> for Selection {
    type Error = MirrorError;

    fn try_from(raw: RawSelection) -> Result<Self> {
        match raw.mode.as_deref() {
            Some("fromDate") => {
                let date = raw.date.ok_or_else(|| {
                    MirrorError::Configuration("Missing `date` for fromDate selection".to_string())
                })?;
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                    MirrorError::Configuration(format!("Invalid date {:?}: {}", date, e))
                })?;
                Ok(Selection::FromDate(date))
            }
            Some("mostRecentCount") => {
                let count = raw.count.ok_or_else(|| {
                    MirrorError::Configuration(
                        "Missing `count` for mostRecentCount selection".to_string(),
                    )
                })?;
                let count = usize::try_from(count).map_err(|_| {
                    MirrorError::Configuration(format!("Invalid count: {}", count))
                })?;
                Ok(Selection::MostRecentCount {
                    count,
                    order: raw.order.unwrap_or_default(),
                })
            }
            Some(other) => Err(MirrorError::Configuration(format!(
                "No selection mode named {:?}",
                other
            ))),
            None => Err(MirrorError::Configuration("Missing selection `mode`".to_string())),
        }
    }
}

/// Parse a definitions file
///
/// Fails only if the document is not a JSON array; each entry carries its own
/// validation result.
pub fn parse_definitions(
    data: &str,
) -> std::result::Result<Vec<Result<MirrorDefinition>>, serde_json::Error> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(data)?;
    Ok(entries.into_iter().map(MirrorDefinition::from_value).collect())
}
