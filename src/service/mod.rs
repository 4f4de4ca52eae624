//! Collaborator interface to the music service holding the playlists
//!
//! The core never talks to a service implicitly: one instance is built per run
//! and passed to everything that needs it. Pagination, authentication and
//! retries are the implementation's business.

mod local;

pub use local::{LibrarySnapshot, LocalLibrary, StoredPlaylist};

use crate::error::ServiceError;
use crate::model::Playlist;

/// Remote operations a mirror run depends on
pub trait MusicService {
    /// Fetch a playlist with its complete track list
    fn fetch_playlist_by_id(&self, id: &str) -> Result<Playlist, ServiceError>;

    /// Every playlist of the current user carrying exactly this name
    fn fetch_playlists_by_name(&self, name: &str) -> Result<Vec<Playlist>, ServiceError>;

    /// The user's saved tracks; the returned playlist never has an id
    fn fetch_liked_songs(&self) -> Result<Playlist, ServiceError>;

    /// Create an empty playlist and return it with its new id
    fn create_playlist(&mut self, name: &str) -> Result<Playlist, ServiceError>;

    /// Remove every occurrence of the given tracks
    fn remove_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Result<(), ServiceError>;

    /// Insert tracks, in order, starting at `position` in the playlist as it is now
    fn insert_tracks_at_position(
        &mut self,
        playlist_id: &str,
        track_ids: &[String],
        position: usize,
    ) -> Result<(), ServiceError>;
}
