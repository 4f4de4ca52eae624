//! Runs mirror definitions against a music service

use super::config::{MirrorDefinition, Source};
use crate::error::{MirrorError, Result};
use crate::model::{Playlist, TrackList};
use crate::reconcile::{reconcile, ReconcilePlan, ReconciliationReport};
use crate::selection::{mirror_name, select};
use crate::service::MusicService;

/// Drives fetch, selection, resolution and reconciliation for each definition
pub struct MirrorRunner<S: MusicService> {
    service: S,
    max_batch_size: usize,
    dry_run: bool,
}

impl<S: MusicService> MirrorRunner<S> {
    pub fn new(service: S, max_batch_size: usize) -> Self {
        Self {
            service,
            max_batch_size,
            dry_run: false,
        }
    }

    /// Plan and log only; never create or mutate a playlist
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn into_service(self) -> S {
        self.service
    }

    /// Run every definition independently
    ///
    /// A failure is logged and recorded for its own entry; the remaining
    /// definitions still run.
    pub fn run_all(
        &mut self,
        definitions: Vec<Result<MirrorDefinition>>,
    ) -> Vec<Result<ReconciliationReport>> {
        let total = definitions.len();
        definitions
            .into_iter()
            .enumerate()
            .map(|(i, definition)| {
                log::info!("[{}/{}] Processing mirror definition", i + 1, total);
                let outcome = definition.and_then(|d| self.run(&d));
                match &outcome {
                    Ok(report) => log::info!(
                        "[{}/{}] {:?}: {} removed, {} added",
                        i + 1,
                        total,
                        report.playlist_name,
                        report.removed.len(),
                        report.added.len()
                    ),
                    Err(e) => log::error!("[{}/{}] Mirror failed: {}", i + 1, total, e),
                }
                outcome
            })
            .collect()
    }

    /// Run a single definition
    pub fn run(&mut self, definition: &MirrorDefinition) -> Result<ReconciliationReport> {
        let source = self.fetch_source(&definition.source)?;
        log::info!("Source {:?}: {} tracks", source.name, source.len());

        let target_name = definition
            .name
            .clone()
            .unwrap_or_else(|| mirror_name(&source.name, &definition.selection));
        let target = Playlist::synthesized(
            target_name,
            select(&source.tracks, &definition.selection),
        );
        log::info!(
            "Selected {} tracks ({}) for {:?}",
            target.len(),
            definition.selection,
            target.name
        );

        if self.dry_run {
            return self.plan_only(&target);
        }

        let existing = self.resolve_or_create(&target.name)?;
        reconcile(&mut self.service, &existing, &target, self.max_batch_size)
    }

    fn fetch_source(&self, source: &Source) -> Result<Playlist> {
        let playlist = match source {
            Source::Playlist { id } => self.service.fetch_playlist_by_id(id)?,
            Source::LikedSongs => self.service.fetch_liked_songs()?,
        };
        Ok(playlist)
    }

    /// The single playlist named `name`, if any
    fn resolve(&self, name: &str) -> Result<Option<Playlist>> {
        let mut matches = self.service.fetch_playlists_by_name(name)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(MirrorError::AmbiguousPlaylist {
                name: name.to_string(),
                count,
            }),
        }
    }

    fn resolve_or_create(&mut self, name: &str) -> Result<Playlist> {
        if let Some(existing) = self.resolve(name)? {
            log::info!(
                "Playlist {:?} exists with {} tracks",
                name,
                existing.len()
            );
            return Ok(existing);
        }

        log::info!("Playlist {:?} doesn't exist, creating it", name);
        self.service.create_playlist(name)?;
        self.resolve(name)?
            .ok_or_else(|| MirrorError::PlaylistNotFound(name.to_string()))
    }

    fn plan_only(&self, target: &Playlist) -> Result<ReconciliationReport> {
        let existing = match self.resolve(&target.name)? {
            Some(existing) => existing,
            None => {
                log::info!("Playlist {:?} doesn't exist, would create it", target.name);
                Playlist::synthesized(target.name.clone(), TrackList::default())
            }
        };

        let plan = ReconcilePlan::new(&existing.tracks, &target.tracks, self.max_batch_size);
        for track in &plan.to_remove {
            log::info!("Would remove: ({}, {})", track.name, track.id);
        }
        for batch in &plan.batches {
            log::info!(
                "Would insert {} track(s) at position {}: {:?}",
                batch.len(),
                batch.position,
                batch.track_ids()
            );
        }

        let result = plan.preview(&existing.tracks);
        log::info!(
            "Dry run: {} call(s) would leave {:?} with {} tracks",
            plan.mutation_calls(),
            target.name,
            result.len()
        );

        Ok(plan.report(&existing, true))
    }
}
