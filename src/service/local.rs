//! File-backed music service
//!
//! Serves the [`MusicService`] interface from a JSON snapshot held in memory,
//! and writes the snapshot back on [`LocalLibrary::save`].

use super::MusicService;
use crate::error::ServiceError;
use crate::model::{Playlist, Track, TrackList};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Name the liked-songs collection is presented under
pub const LIKED_SONGS_NAME: &str = "Liked Songs";

/// On-disk form of a library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub liked_songs: Vec<Track>,

    #[serde(default)]
    pub playlists: Vec<StoredPlaylist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl StoredPlaylist {
    fn to_playlist(&self) -> Playlist {
        Playlist::remote(&self.id, &self.name, TrackList::new(self.tracks.clone()))
    }
}

/// In-memory library loaded from (and saved to) a snapshot file
#[derive(Debug, Default)]
pub struct LocalLibrary {
    snapshot: LibrarySnapshot,
    path: Option<PathBuf>,
    mutation_calls: usize,
}

impl LocalLibrary {
    pub fn new(snapshot: LibrarySnapshot) -> Self {
        Self {
            snapshot,
            path: None,
            mutation_calls: 0,
        }
    }

    /// Load a snapshot file; it is saved back to the same path
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        log::info!("Loading library snapshot from {:?}", path);
        let data = fs::read_to_string(path)?;
        let snapshot: LibrarySnapshot = serde_json::from_str(&data)?;

        log::info!(
            "Library loaded: {} liked songs, {} playlists",
            snapshot.liked_songs.len(),
            snapshot.playlists.len()
        );

        Ok(Self {
            snapshot,
            path: Some(path.to_path_buf()),
            mutation_calls: 0,
        })
    }

    /// Write the snapshot back to the file it was loaded from
    pub fn save(&self) -> Result<(), ServiceError> {
        match &self.path {
            Some(path) => self.save_to(path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ServiceError> {
        let data = serde_json::to_string_pretty(&self.snapshot)?;
        fs::write(path, data)?;
        log::info!("Library snapshot written to {:?}", path);
        Ok(())
    }

    pub fn snapshot(&self) -> &LibrarySnapshot {
        &self.snapshot
    }

    /// Number of create/remove/insert calls served so far
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls
    }

    fn stored_mut(&mut self, id: &str) -> Result<&mut StoredPlaylist, ServiceError> {
        self.snapshot
            .playlists
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::UnknownPlaylist(id.to_string()))
    }

    /// Every known track by id, from liked songs and all playlists (first copy wins)
    fn catalog(&self) -> HashMap<&str, &Track> {
        let mut catalog = HashMap::new();
        let all = self
            .snapshot
            .liked_songs
            .iter()
            .chain(self.snapshot.playlists.iter().flat_map(|p| p.tracks.iter()));
        for track in all {
            catalog.entry(track.id.as_str()).or_insert(track);
        }
        catalog
    }

    fn next_playlist_id(&self) -> String {
        let mut n = self.snapshot.playlists.len() + 1;
        loop {
            let id = format!("local-{}", n);
            if self.snapshot.playlists.iter().all(|p| p.id != id) {
                return id;
            }
            n += 1;
        }
    }
}

impl MusicService for LocalLibrary {
    fn fetch_playlist_by_id(&self, id: &str) -> Result<Playlist, ServiceError> {
        self.snapshot
            .playlists
            .iter()
            .find(|p| p.id == id)
            .map(StoredPlaylist::to_playlist)
            .ok_or_else(|| ServiceError::UnknownPlaylist(id.to_string()))
    }

    fn fetch_playlists_by_name(&self, name: &str) -> Result<Vec<Playlist>, ServiceError> {
        Ok(self
            .snapshot
            .playlists
            .iter()
            .filter(|p| p.name == name)
            .map(StoredPlaylist::to_playlist)
            .collect())
    }

    fn fetch_liked_songs(&self) -> Result<Playlist, ServiceError> {
        Ok(Playlist::synthesized(
            LIKED_SONGS_NAME,
            TrackList::new(self.snapshot.liked_songs.clone()),
        ))
    }

    fn create_playlist(&mut self, name: &str) -> Result<Playlist, ServiceError> {
        self.mutation_calls += 1;
        let stored = StoredPlaylist {
            id: self.next_playlist_id(),
            name: name.to_string(),
            tracks: Vec::new(),
        };
        log::debug!("Created playlist {:?} with id {}", stored.name, stored.id);

        let playlist = stored.to_playlist();
        self.snapshot.playlists.push(stored);
        Ok(playlist)
    }

    fn remove_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Result<(), ServiceError> {
        self.mutation_calls += 1;
        let removed: HashSet<&str> = track_ids.iter().map(String::as_str).collect();
        let playlist = self.stored_mut(playlist_id)?;
        let before = playlist.tracks.len();
        playlist.tracks.retain(|t| !removed.contains(t.id.as_str()));
        log::debug!(
            "Removed {} entries from playlist {}",
            before - playlist.tracks.len(),
            playlist_id
        );
        Ok(())
    }

    fn insert_tracks_at_position(
        &mut self,
        playlist_id: &str,
        track_ids: &[String],
        position: usize,
    ) -> Result<(), ServiceError> {
        self.mutation_calls += 1;

        let added_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let tracks = {
            let catalog = self.catalog();
            track_ids
                .iter()
                .map(|id| {
                    catalog
                        .get(id.as_str())
                        .map(|t| Track::new(&t.id, &t.name, &added_at))
                        .ok_or_else(|| ServiceError::Failed(format!("Unknown track id: {}", id)))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let playlist = self.stored_mut(playlist_id)?;
        if position > playlist.tracks.len() {
            return Err(ServiceError::Failed(format!(
                "Position {} out of range for playlist {} ({} tracks)",
                position,
                playlist_id,
                playlist.tracks.len()
            )));
        }

        playlist.tracks.splice(position..position, tracks);
        log::debug!(
            "Inserted {} tracks at {} in playlist {}",
            track_ids.len(),
            position,
            playlist_id
        );
        Ok(())
    }
}
