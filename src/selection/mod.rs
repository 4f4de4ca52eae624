//! Selection transforms: which source tracks belong in the mirror
//!
//! Both transforms first put the source in chronological order (oldest added
//! first). The sort is stable, so tracks sharing a timestamp keep their
//! source order. Tracks whose timestamp cannot be parsed sort as oldest.

use crate::model::{Track, TrackList};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a most-recent selection is presented in the mirror
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionOrder {
    /// Oldest first, newest last
    #[default]
    Ascending,

    /// Newest first
    MostRecentFirst,
}

/// A validated selection transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Tracks added on or after the start of this day (UTC)
    FromDate(NaiveDate),

    /// The `count` most recently added tracks
    MostRecentCount { count: usize, order: SelectionOrder },
}

impl Selection {
    /// Short label used in derived mirror names
    pub fn label(&self) -> String {
        match self {
            Selection::FromDate(date) => format!("from {}", date.format("%Y-%m-%d")),
            Selection::MostRecentCount { count, .. } => format!("last {}", count),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Name of the mirror playlist derived from a source name
pub fn mirror_name(source_name: &str, selection: &Selection) -> String {
    format!("{} [{}]", source_name, selection.label())
}

/// Apply a selection to a source list, producing the target list
pub fn select(source: &TrackList, selection: &Selection) -> TrackList {
    let chronological = sort_by_added_at(source);

    match selection {
        Selection::FromDate(date) => {
            let cutoff = start_of_day(*date);
            chronological
                .into_iter()
                .filter(|t| t.added_at_time().is_some_and(|added| added >= cutoff))
                .collect()
        }
        Selection::MostRecentCount { count, order } => {
            let skip = chronological.len().saturating_sub(*count);
            let recent = chronological.into_iter().skip(skip);
            match order {
                SelectionOrder::Ascending => recent.collect(),
                SelectionOrder::MostRecentFirst => recent.rev().collect(),
            }
        }
    }
}

fn sort_by_added_at(source: &TrackList) -> Vec<Track> {
    let mut tracks = source.tracks().to_vec();
    tracks.sort_by_cached_key(|t| t.added_at_time());
    tracks
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
