//! Track and playlist value types
//!
//! These are snapshots: a run fetches them once and never mutates them while
//! it is computing what to change remotely.

mod playlist;
mod track;
mod track_list;

pub use playlist::Playlist;
pub use track::Track;
pub use track_list::TrackList;
