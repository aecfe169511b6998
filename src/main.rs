//! stickylane - Entry Point

use clap::Parser;
use std::io;
use std::path::PathBuf;
use stickylane::config::Preset;
use tracing::{info, warn};

/// Sticky header layout engine: replay recorded traces or run the terminal demo
#[derive(Parser, Debug)]
#[command(name = "stickylane")]
#[command(version)]
#[command(
    about = "Scroll-synchronized sticky header engine. Replays a JSONL trace (or `-` for stdin) to JSONL on stdout; with no trace, runs the terminal demo."
)]
pub struct Args {
    /// JSONL input trace to replay (`-` for stdin). Runs the demo if omitted
    pub trace: Option<PathBuf>,

    /// Half-width of the hysteresis band, in layout units
    #[arg(long)]
    pub hysteresis: Option<f64>,

    /// Never issue idle-snap scroll commands
    #[arg(long)]
    pub no_snap: bool,

    /// Category selected on startup
    #[arg(short, long)]
    pub category: Option<String>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set NO_COLOR env var if --no-color flag is passed
    // This ensures consistent color handling throughout the application
    if args.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        // 1. Load config file (or None if missing)
        let config_file = stickylane::config::load_config_with_precedence(args.config.clone())?;

        // 2. Merge with defaults
        let merged = stickylane::config::merge_config(config_file);

        // 3. Apply environment variable overrides
        let with_env = stickylane::config::apply_env_overrides(merged);

        // 4. Apply CLI argument overrides
        stickylane::config::apply_cli_overrides(
            with_env,
            args.hysteresis,
            args.no_snap,
            args.category.clone(),
        )
    };

    // Logging goes to a file so it never mixes with replay output or the TUI
    if let Err(e) = stickylane::logging::init(&config.log_file_path) {
        warn!(error = %e, "Logging disabled");
    }

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    match args.trace {
        Some(path) => {
            // Recorded traces come from mobile hosts: pixel units
            let constants = config.constants(Preset::Pixels)?;
            let mut source = stickylane::source::detect_input_source(&path)?;
            let lines = source.read_lines()?;
            info!(path = %path.display(), lines = lines.len(), "Replaying trace");

            let outcome = stickylane::integration::replay_lines(lines, constants);
            stickylane::integration::write_jsonl(&outcome, io::stdout().lock())?;
        }
        None => {
            // The demo draws in cells: row units
            let constants = config.constants(Preset::Rows)?;
            stickylane::view::run(constants, config.category.as_deref())?;
        }
    }

    Ok(())
}
