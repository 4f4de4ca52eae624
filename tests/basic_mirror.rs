use playlist_mirror::mirror::parse_definitions;
use playlist_mirror::model::Track;
use playlist_mirror::service::{LibrarySnapshot, StoredPlaylist};
use playlist_mirror::{LocalLibrary, MirrorError, MirrorRunner, MusicService};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Source playlist with tracks added one per month through 2019 and 2020
fn create_test_snapshot() -> LibrarySnapshot {
    let tracks: Vec<Track> = (0..24)
        .map(|i| {
            let year = 2019 + i / 12;
            let month = i % 12 + 1;
            Track::new(
                format!("track{:03}", i),
                format!("Test Song {}", i),
                format!("{}-{:02}-15T10:00:00Z", year, month),
            )
        })
        .collect();

    LibrarySnapshot {
        liked_songs: tracks.iter().rev().cloned().collect(),
        playlists: vec![StoredPlaylist {
            id: "src1".to_string(),
            name: "Road Trip".to_string(),
            tracks,
        }],
    }
}

fn write_fixture(dir: &TempDir, definitions: &str) -> (PathBuf, PathBuf) {
    let library_path = dir.path().join("library.json");
    let config_path = dir.path().join("mirrors.json");

    let snapshot = serde_json::to_string_pretty(&create_test_snapshot()).unwrap();
    fs::write(&library_path, snapshot).unwrap();
    fs::write(&config_path, definitions).unwrap();

    (library_path, config_path)
}

fn playlist_ids(library: &LocalLibrary, name: &str) -> Vec<String> {
    let matches = library.fetch_playlists_by_name(name).unwrap();
    assert_eq!(matches.len(), 1, "expected exactly one {:?}", name);
    matches[0]
        .tracks
        .ids()
        .into_iter()
        .map(String::from)
        .collect()
}

const DEFINITIONS: &str = r#"[
    {
        "type": "playlist",
        "sourceId": "src1",
        "selection": { "mode": "fromDate", "date": "2020-01-01" }
    },
    {
        "type": "liked-songs",
        "selection": { "mode": "mostRecentCount", "count": 5, "order": "mostRecentFirst" }
    },
    {
        "type": "vinyl",
        "selection": { "mode": "mostRecentCount", "count": 5 }
    }
]"#;

#[test]
fn test_mirrors_are_created_and_filled() {
    let dir = TempDir::new().unwrap();
    let (library_path, config_path) = write_fixture(&dir, DEFINITIONS);

    let definitions = parse_definitions(&fs::read_to_string(&config_path).unwrap()).unwrap();
    let library = LocalLibrary::load(&library_path).unwrap();
    let mut runner = MirrorRunner::new(library, 5);

    let outcomes = runner.run_all(definitions);
    assert_eq!(outcomes.len(), 3);

    let from_date = outcomes[0].as_ref().unwrap();
    assert_eq!(from_date.playlist_name, "Road Trip [from 2020-01-01]");
    assert_eq!(from_date.added.len(), 12);
    // 12 tracks at batch size 5
    assert_eq!(from_date.insert_calls, 3);

    let recent = outcomes[1].as_ref().unwrap();
    assert_eq!(recent.playlist_name, "Liked Songs [last 5]");
    assert_eq!(
        recent.added,
        vec!["track023", "track022", "track021", "track020", "track019"]
    );

    assert!(matches!(outcomes[2], Err(MirrorError::Configuration(_))));

    let library = runner.into_service();
    let expected: Vec<String> = (12..24).map(|i| format!("track{:03}", i)).collect();
    assert_eq!(playlist_ids(&library, "Road Trip [from 2020-01-01]"), expected);
}

#[test]
fn test_second_run_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let (library_path, config_path) = write_fixture(&dir, DEFINITIONS);
    let data = fs::read_to_string(&config_path).unwrap();

    let mut runner = MirrorRunner::new(LocalLibrary::load(&library_path).unwrap(), 100);
    runner.run_all(parse_definitions(&data).unwrap());
    runner.into_service().save().unwrap();

    let library = LocalLibrary::load(&library_path).unwrap();
    let mut runner = MirrorRunner::new(library, 100);
    let outcomes = runner.run_all(parse_definitions(&data).unwrap());

    for report in outcomes.iter().filter_map(|o| o.as_ref().ok()) {
        assert!(report.is_noop(), "{:?} changed on rerun", report.playlist_name);
    }
    assert_eq!(runner.service().mutation_calls(), 0);
}

#[test]
fn test_stale_mirror_is_reconciled_in_place() {
    let dir = TempDir::new().unwrap();
    let (library_path, _) = write_fixture(&dir, "[]");

    // Mirror holds indices 0,1,4,5,6 of the target plus a stale entry
    let mut snapshot = create_test_snapshot();
    let source = snapshot.playlists[0].tracks.clone();
    let target: Vec<Track> = source[16..24].to_vec();
    let mut stale: Vec<Track> = [0, 1, 4, 5, 6].iter().map(|&i| target[i].clone()).collect();
    stale.insert(2, source[0].clone());
    snapshot.playlists.push(StoredPlaylist {
        id: "m1".to_string(),
        name: "Road Trip [last 8]".to_string(),
        tracks: stale,
    });
    fs::write(&library_path, serde_json::to_string(&snapshot).unwrap()).unwrap();

    let definitions = parse_definitions(
        r#"[{ "type": "playlist", "sourceId": "src1",
              "selection": { "mode": "mostRecentCount", "count": 8 } }]"#,
    )
    .unwrap();
    let mut runner = MirrorRunner::new(LocalLibrary::load(&library_path).unwrap(), 100);
    let outcomes = runner.run_all(definitions);

    let report = outcomes[0].as_ref().unwrap();
    assert_eq!(report.playlist_id.as_deref(), Some("m1"));
    assert_eq!(report.removed, vec!["track000"]);
    assert_eq!(report.added, vec!["track018", "track019", "track023"]);
    assert_eq!(report.insert_calls, 2);
    // one removal + two inserts
    assert_eq!(runner.service().mutation_calls(), 3);

    let expected: Vec<String> = target.iter().map(|t| t.id.clone()).collect();
    assert_eq!(playlist_ids(runner.service(), "Road Trip [last 8]"), expected);
}

#[test]
fn test_dry_run_leaves_library_untouched() {
    let dir = TempDir::new().unwrap();
    let (library_path, config_path) = write_fixture(&dir, DEFINITIONS);
    let definitions = parse_definitions(&fs::read_to_string(&config_path).unwrap()).unwrap();

    let mut runner =
        MirrorRunner::new(LocalLibrary::load(&library_path).unwrap(), 100).with_dry_run(true);
    let outcomes = runner.run_all(definitions);

    assert!(outcomes[0].as_ref().unwrap().dry_run);
    assert_eq!(outcomes[0].as_ref().unwrap().added.len(), 12);
    assert_eq!(runner.service().mutation_calls(), 0);
    assert_eq!(runner.service().snapshot().playlists.len(), 1);
}
