//! Error types for mirror runs

use thiserror::Error;

/// Failure reported by a [`MusicService`](crate::service::MusicService) implementation
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unknown playlist id: {0}")]
    UnknownPlaylist(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Service call failed: {0}")]
    Failed(String),
}

/// Errors that abort a single mirror definition's run
#[derive(Error, Debug)]
pub enum MirrorError {
    /// Malformed or incomplete mirror definition
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// More than one remote playlist carries the mirror's name
    #[error("{count} playlists are named {name:?}, refusing to pick one")]
    AmbiguousPlaylist { name: String, count: usize },

    /// No playlist with the mirror's name exists even after creating it
    #[error("Playlist {0:?} not found after creation")]
    PlaylistNotFound(String),

    /// Any failure from the collaborator during fetch or mutation
    #[error("Remote call failed: {0}")]
    RemoteCall(#[from] ServiceError),
}

pub type Result<T> = std::result::Result<T, MirrorError>;
