use super::TrackList;
use serde::{Deserialize, Serialize};

/// A named, ordered collection of tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Remote identifier; None until the playlist exists remotely
    /// (liked songs and freshly selected targets never have one)
    pub id: Option<String>,

    /// Display name
    pub name: String,

    /// Tracks in playback order
    pub tracks: TrackList,
}

impl Playlist {
    /// A playlist fetched from the service
    pub fn remote(id: impl Into<String>, name: impl Into<String>, tracks: TrackList) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            tracks,
        }
    }

    /// A playlist computed locally, not yet bound to a remote one
    pub fn synthesized(name: impl Into<String>, tracks: TrackList) -> Self {
        Self {
            id: None,
            name: name.into(),
            tracks,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
