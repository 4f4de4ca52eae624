//! Playlist Mirror - keep derived playlists in sync with a source collection
//!
//! A mirror definition names a source (a playlist or the liked songs) and a
//! selection (tracks added from a date, or the most recent N). Each run
//! recomputes the selection and reconciles the mirror playlist with as few
//! remote calls as possible: one removal call plus one positioned insert per
//! contiguous run of new tracks.

pub mod error;
pub mod mirror;
pub mod model;
pub mod reconcile;
pub mod selection;
pub mod service;

pub use error::{MirrorError, Result, ServiceError};
pub use mirror::{MirrorDefinition, MirrorRunner};
pub use reconcile::{reconcile, ReconciliationReport, DEFAULT_MAX_BATCH_SIZE};
pub use service::{LocalLibrary, MusicService};
