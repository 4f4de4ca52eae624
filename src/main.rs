use anyhow::{bail, Context, Result};
use clap::Parser;
use playlist_mirror::mirror::parse_definitions;
use playlist_mirror::{LocalLibrary, MirrorRunner, DEFAULT_MAX_BATCH_SIZE};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "playlist-mirror")]
#[command(about = "Keep mirror playlists in sync with a playlist or your liked songs", long_about = None)]
struct Args {
    /// Path to the mirror definitions (JSON array)
    #[arg(
        short = 'c',
        long,
        default_value = "~/.config/playlist-mirror/mirrors.json"
    )]
    config: String,

    /// Path to the library snapshot served as the music service
    #[arg(short = 'l', long)]
    library: String,

    /// Maximum number of tracks per positioned-insert call
    #[arg(long, default_value_t = DEFAULT_MAX_BATCH_SIZE)]
    max_batch_size: usize,

    /// Log the planned changes without touching any playlist
    #[arg(long)]
    dry_run: bool,

    /// Print the reconciliation reports as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if args.max_batch_size == 0 {
        bail!("--max-batch-size must be at least 1");
    }

    // Expand ~ in paths
    let config_path = PathBuf::from(shellexpand::tilde(&args.config).as_ref());
    let library_path = PathBuf::from(shellexpand::tilde(&args.library).as_ref());

    let data = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read mirror definitions: {:?}", config_path))?;
    let definitions = parse_definitions(&data)
        .with_context(|| format!("Mirror definitions must be a JSON array: {:?}", config_path))?;
    log::info!(
        "Loaded {} mirror definition(s) from {:?}",
        definitions.len(),
        config_path
    );

    let library = LocalLibrary::load(&library_path)
        .with_context(|| format!("Failed to load library snapshot: {:?}", library_path))?;

    if args.dry_run {
        log::info!("Dry run - no playlist will be created or modified");
    }

    let mut runner = MirrorRunner::new(library, args.max_batch_size).with_dry_run(args.dry_run);
    let outcomes = runner.run_all(definitions);

    if !args.dry_run {
        runner
            .into_service()
            .save()
            .with_context(|| format!("Failed to save library snapshot: {:?}", library_path))?;
    }

    let failed = outcomes.iter().filter(|o| o.is_err()).count();
    let reports: Vec<_> = outcomes.into_iter().filter_map(|o| o.ok()).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    log::info!(
        "Done: {} mirror(s) reconciled, {} failed",
        reports.len(),
        failed
    );

    if failed > 0 {
        bail!("{} mirror definition(s) failed", failed);
    }

    Ok(())
}
