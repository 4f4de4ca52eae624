use super::{diff, plan_batches, InsertBatch};
use crate::error::{MirrorError, Result};
use crate::model::{Playlist, Track, TrackList};
use crate::service::MusicService;
use serde::Serialize;
use std::collections::HashSet;

/// Every remote mutation needed to turn one list into another
///
/// Positions in `batches` are absolute indices in the live playlist at the
/// moment each call is made, assuming the removal call and all earlier
/// batches have already been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_remove: Vec<Track>,
    pub batches: Vec<InsertBatch>,
}

/// What a reconciliation did (or would do, on a dry run)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub playlist_id: Option<String>,
    pub playlist_name: String,
    pub removed: Vec<String>,
    pub added: Vec<String>,
    pub insert_calls: usize,
    pub dry_run: bool,
}

impl ReconciliationReport {
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

impl ReconcilePlan {
    /// Diff `existing` against `target` and batch the additions
    ///
    /// Batch positions are capped at the length the live list will have when
    /// each batch is issued. Target indices only overshoot that length when
    /// the target repeats an identifier the existing list holds fewer times.
    pub fn new(existing: &TrackList, target: &TrackList, max_batch_size: usize) -> Self {
        let diff = diff(existing, target);
        let mut batches = plan_batches(&diff.to_add, max_batch_size);

        let mut live_len = existing.len() - diff.to_remove.len();
        for batch in &mut batches {
            batch.position = batch.position.min(live_len);
            live_len += batch.len();
        }

        Self {
            to_remove: diff.to_remove,
            batches,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.to_remove.is_empty() && self.batches.is_empty()
    }

    pub fn removed_ids(&self) -> Vec<String> {
        self.to_remove.iter().map(|t| t.id.clone()).collect()
    }

    pub fn added_ids(&self) -> Vec<String> {
        self.batches.iter().flat_map(InsertBatch::track_ids).collect()
    }

    /// Number of remote calls `apply` will make
    pub fn mutation_calls(&self) -> usize {
        let removal = usize::from(!self.to_remove.is_empty());
        removal + self.batches.len()
    }

    /// Replay the plan locally onto `existing`, issuing the same positions `apply` would
    pub fn preview(&self, existing: &TrackList) -> TrackList {
        let removed: HashSet<&str> = self.to_remove.iter().map(|t| t.id.as_str()).collect();
        let mut tracks: Vec<Track> = existing
            .iter()
            .filter(|t| !removed.contains(t.id.as_str()))
            .cloned()
            .collect();

        for batch in &self.batches {
            let at = batch.position;
            tracks.splice(at..at, batch.tracks.iter().cloned());
        }

        TrackList::new(tracks)
    }

    /// Issue the removal call (skipped when empty), then each insert batch in order
    ///
    /// Fails fast: the first failing call aborts the rest, leaving the remote
    /// playlist partially reconciled.
    pub fn apply<S: MusicService + ?Sized>(
        &self,
        service: &mut S,
        playlist_id: &str,
    ) -> Result<()> {
        if !self.to_remove.is_empty() {
            for track in &self.to_remove {
                log::debug!(
                    "Removing track: ({}, {}), added at: {}",
                    track.name,
                    track.id,
                    track.added_at
                );
            }
            service.remove_tracks(playlist_id, &self.removed_ids())?;
            log::info!("Removed {} track(s)", self.to_remove.len());
        }

        for (i, batch) in self.batches.iter().enumerate() {
            for track in &batch.tracks {
                log::debug!(
                    "Adding track: ({}, {}), added at: {}",
                    track.name,
                    track.id,
                    track.added_at
                );
            }
            service.insert_tracks_at_position(playlist_id, &batch.track_ids(), batch.position)?;
            log::info!(
                "[{}/{}] Inserted {} track(s) at position {}",
                i + 1,
                self.batches.len(),
                batch.len(),
                batch.position
            );
        }

        Ok(())
    }

    pub fn report(&self, playlist: &Playlist, dry_run: bool) -> ReconciliationReport {
        ReconciliationReport {
            playlist_id: playlist.id.clone(),
            playlist_name: playlist.name.clone(),
            removed: self.removed_ids(),
            added: self.added_ids(),
            insert_calls: self.batches.len(),
            dry_run,
        }
    }
}

/// Bring the remote `existing` playlist in line with `target`
///
/// The whole plan is computed before the first remote call so every position
/// refers to the same snapshot of `existing`.
pub fn reconcile<S: MusicService + ?Sized>(
    service: &mut S,
    existing: &Playlist,
    target: &Playlist,
    max_batch_size: usize,
) -> Result<ReconciliationReport> {
    let playlist_id = existing
        .id
        .as_deref()
        .ok_or_else(|| MirrorError::PlaylistNotFound(existing.name.clone()))?;

    let plan = ReconcilePlan::new(&existing.tracks, &target.tracks, max_batch_size);

    if plan.is_noop() {
        log::info!("Playlist {:?} is already up to date", existing.name);
    } else {
        log::info!(
            "Reconciling {:?}: {} to remove, {} to add in {} batch(es)",
            existing.name,
            plan.to_remove.len(),
            plan.added_ids().len(),
            plan.batches.len()
        );
        plan.apply(service, playlist_id)?;
    }

    Ok(plan.report(existing, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    type ServiceResult<T> = std::result::Result<T, ServiceError>;

    /// Records every mutation call; optionally fails on the nth insert
    #[derive(Default)]
    struct RecordingService {
        calls: Vec<String>,
        fail_on_insert: Option<usize>,
        inserts: usize,
    }

    impl MusicService for RecordingService {
        fn fetch_playlist_by_id(&self, id: &str) -> ServiceResult<Playlist> {
            Err(ServiceError::UnknownPlaylist(id.to_string()))
        }

        fn fetch_playlists_by_name(&self, _name: &str) -> ServiceResult<Vec<Playlist>> {
            Ok(Vec::new())
        }

        fn fetch_liked_songs(&self) -> ServiceResult<Playlist> {
            Ok(Playlist::synthesized("Liked Songs", TrackList::default()))
        }

        fn create_playlist(&mut self, name: &str) -> ServiceResult<Playlist> {
            Ok(Playlist::remote("new", name, TrackList::default()))
        }

        fn remove_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> ServiceResult<()> {
            self.calls
                .push(format!("remove {} {}", playlist_id, track_ids.join(",")));
            Ok(())
        }

        fn insert_tracks_at_position(
            &mut self,
            playlist_id: &str,
            track_ids: &[String],
            position: usize,
        ) -> ServiceResult<()> {
            self.inserts += 1;
            if self.fail_on_insert == Some(self.inserts) {
                return Err(ServiceError::Failed("rate limited".to_string()));
            }
            self.calls.push(format!(
                "insert {} {}@{}",
                playlist_id,
                track_ids.join(","),
                position
            ));
            Ok(())
        }
    }

    fn list(ids: &[&str]) -> TrackList {
        ids.iter()
            .map(|id| Track::new(*id, *id, "2020-01-01T00:00:00Z"))
            .collect()
    }

    fn alphabet() -> Vec<String> {
        ('A'..='Z').map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_removal_then_insert() {
        let mut service = RecordingService::default();
        let existing = Playlist::remote("p1", "Mirror", list(&["A", "B", "C"]));
        let target = Playlist::synthesized("Mirror", list(&["B", "C", "D"]));

        let report = reconcile(&mut service, &existing, &target, 100).unwrap();

        assert_eq!(service.calls, vec!["remove p1 A", "insert p1 D@2"]);
        assert_eq!(report.removed, vec!["A"]);
        assert_eq!(report.added, vec!["D"]);
        assert_eq!(report.insert_calls, 1);
        assert!(!report.dry_run);
    }

    #[test]
    fn test_no_calls_when_up_to_date() {
        let mut service = RecordingService::default();
        let existing = Playlist::remote("p1", "Mirror", list(&["A", "B"]));
        let target = Playlist::synthesized("Mirror", list(&["A", "B"]));

        let report = reconcile(&mut service, &existing, &target, 100).unwrap();

        assert!(service.calls.is_empty());
        assert!(report.is_noop());
    }

    #[test]
    fn test_fills_empty_playlist_in_batches() {
        let mut service = RecordingService::default();
        let ids = alphabet();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let existing = Playlist::remote("p1", "Mirror", TrackList::default());
        let target = Playlist::synthesized("Mirror", list(&refs));

        reconcile(&mut service, &existing, &target, 10).unwrap();

        assert_eq!(service.calls.len(), 3);
        assert!(service.calls[0].ends_with("@0"));
        assert!(service.calls[1].ends_with("@10"));
        assert!(service.calls[2].starts_with("insert p1 U,V,W,X,Y,Z@20"));
    }

    #[test]
    fn test_unbound_playlist_is_rejected_before_any_call() {
        let mut service = RecordingService::default();
        let existing = Playlist::synthesized("Mirror", list(&["A"]));
        let target = Playlist::synthesized("Mirror", list(&["B"]));

        let err = reconcile(&mut service, &existing, &target, 100).unwrap_err();

        assert!(matches!(err, MirrorError::PlaylistNotFound(_)));
        assert!(service.calls.is_empty());
    }

    #[test]
    fn test_failed_insert_aborts_remaining_batches() {
        let mut service = RecordingService {
            fail_on_insert: Some(2),
            ..Default::default()
        };
        let existing = Playlist::remote("p1", "Mirror", list(&["A", "C", "E"]));
        let target = Playlist::synthesized("Mirror", list(&["A", "B", "C", "D", "E", "F"]));

        let err = reconcile(&mut service, &existing, &target, 100).unwrap_err();

        assert!(matches!(err, MirrorError::RemoteCall(ServiceError::Failed(_))));
        assert_eq!(service.calls, vec!["insert p1 B@1"]);
        assert_eq!(service.inserts, 2);
    }

    #[test]
    fn test_preview_matches_target() {
        let existing = list(&["X", "A", "C", "Y", "E"]);
        let target = list(&["A", "B", "C", "D", "E", "F"]);
        let plan = ReconcilePlan::new(&existing, &target, 2);

        assert_eq!(plan.preview(&existing).ids(), target.ids());
        assert_eq!(plan.mutation_calls(), 4);
    }

    #[test]
    fn test_positions_capped_when_target_repeats_a_track() {
        let mut service = RecordingService::default();
        let existing = Playlist::remote("p1", "Mirror", list(&["A"]));
        let target = Playlist::synthesized("Mirror", list(&["A", "A", "B"]));

        let plan = ReconcilePlan::new(&existing.tracks, &target.tracks, 100);
        assert_eq!(plan.batches[0].position, 1);
        assert_eq!(plan.preview(&existing.tracks).ids(), vec!["A", "B"]);

        reconcile(&mut service, &existing, &target, 100).unwrap();
        assert_eq!(service.calls, vec!["insert p1 B@1"]);
    }
}
