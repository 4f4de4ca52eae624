use super::PendingInsert;
use crate::model::Track;
use serde::Serialize;

/// One positioned-insert call: `tracks` go in order starting at `position`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertBatch {
    pub position: usize,
    pub tracks: Vec<Track>,
}

impl InsertBatch {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }
}

/// Group pending inserts into runs of consecutive target indices
///
/// A run is cut when the next index is not exactly one past the previous, or
/// when the run already holds `max_batch_size` tracks. Entries are expected in
/// ascending index order, as [`diff`](super::diff) produces them. A
/// `max_batch_size` of zero is treated as one.
pub fn plan_batches(to_add: &[PendingInsert], max_batch_size: usize) -> Vec<InsertBatch> {
    let max_batch_size = max_batch_size.max(1);
    let mut batches = Vec::new();
    let mut entries = to_add.iter();

    let Some(first) = entries.next() else {
        return batches;
    };

    let mut current = InsertBatch {
        position: first.index,
        tracks: vec![first.track.clone()],
    };
    let mut last_index = first.index;

    for entry in entries {
        let contiguous = entry.index == last_index + 1;
        if !contiguous || current.len() >= max_batch_size {
            batches.push(std::mem::replace(
                &mut current,
                InsertBatch {
                    position: entry.index,
                    tracks: Vec::new(),
                },
            ));
        }
        current.tracks.push(entry.track.clone());
        last_index = entry.index;
    }

    batches.push(current);
    batches
}
