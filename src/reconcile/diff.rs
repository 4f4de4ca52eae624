use crate::model::{Track, TrackList};

/// A track missing from the mirror and the index it must end up at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInsert {
    /// Zero-based index within the target list
    pub index: usize,
    pub track: Track,
}

/// Set difference between an existing list and its target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Tracks in the existing list that the target does not contain, in existing order
    pub to_remove: Vec<Track>,

    /// Tracks in the target that the existing list lacks, ascending by target index
    pub to_add: Vec<PendingInsert>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

/// Compare `existing` against `target` by track identifier
///
/// Duplicated identifiers are not collapsed: every occurrence in `existing`
/// missing from `target` is removed, and every occurrence in `target` missing
/// from `existing` is added at its own index.
pub fn diff(existing: &TrackList, target: &TrackList) -> Diff {
    let existing_ids = existing.id_set();
    let target_ids = target.id_set();

    let to_remove = existing
        .iter()
        .filter(|t| !target_ids.contains(t.id.as_str()))
        .cloned()
        .collect();

    let to_add = target
        .iter()
        .enumerate()
        .filter(|(_, t)| !existing_ids.contains(t.id.as_str()))
        .map(|(index, track)| PendingInsert {
            index,
            track: track.clone(),
        })
        .collect();

    Diff { to_remove, to_add }
}
