use clap::{CommandFactory, Parser};
use log::{error, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::OpenOptions;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::process;

use sf::core::PickerError;
use sf::core::config::{self, ResolvedConfig, SfConfig};
use sf::core::launcher::{Launcher, ProgramLauncher};
use sf::tui::{self, signals};

#[derive(Parser)]
#[command(name = "sf", about = "Select a file interactively and open it")]
struct Args {
    /// Open this file directly instead of starting the picker
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Terminal emulator for programs that need one (overrides SF_TERMINAL)
    #[arg(long)]
    terminal: Option<String>,

    /// Log file (overrides SF_LOG_FILE; default <tmp>/<user>-sf.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (overrides SF_LOG_LEVEL)
    #[arg(long, value_parser = parse_level)]
    log_level: Option<LevelFilter>,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level '{s}'"))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if args.files.len() > 1 {
        eprintln!("{}", Args::command().render_usage());
        process::exit(1);
    }

    let log_path = args
        .log_file
        .clone()
        .or_else(|| std::env::var_os("SF_LOG_FILE").map(PathBuf::from))
        .unwrap_or_else(config::default_log_path);
    let level = args
        .log_level
        .or_else(|| std::env::var("SF_LOG_LEVEL").ok()?.parse().ok())
        .unwrap_or(LevelFilter::Info);
    if let Err(e) = init_logging(&log_path, level) {
        eprintln!("sf: warning: cannot open log file {}: {}", log_path.display(), e);
    }

    info!("sf starting up (pid {})", process::id());

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("{}, using defaults", e);
        SfConfig::default()
    });
    let config = config::resolve(&file_config, args.terminal.as_deref());

    let code = match args.files.first() {
        Some(path) => open_single(path, config),
        None => run_interactive(config).await,
    };
    info!("sf exiting with status {}", code);
    process::exit(code);
}

/// Append timestamped lines to `path`, creating it owner-only on first use.
fn init_logging(path: &Path, level: LevelFilter) -> std::io::Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)?;

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    let _ = WriteLogger::init(level, log_config, log_file);
    Ok(())
}

/// `sf <file>`: open one file and exit.
fn open_single(path: &Path, config: ResolvedConfig) -> i32 {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    let path = cwd.join(path);
    match ProgramLauncher::new(config).open(&path, &cwd) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            eprintln!("sf: error: {e}");
            1
        }
    }
}

/// Interactive picker, racing the navigation loop against the signal watcher.
async fn run_interactive(config: ResolvedConfig) -> i32 {
    let start = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Cannot determine working directory: {}", e);
            eprintln!("sf: error: {e}");
            return 1;
        }
    };

    let exit_rx = signals::spawn_signal_watcher();
    let session = tokio::task::spawn_blocking(move || tui::run(config, start));

    tokio::select! {
        code = exit_rx => code.unwrap_or(1),
        result = session => match result {
            Ok(Ok(())) => 0,
            Ok(Err(PickerError::Interrupted)) => {
                info!("Interrupted from the keyboard");
                0
            }
            Ok(Err(e)) => {
                error!("{}", e);
                eprintln!("sf: error: {e}");
                1
            }
            Err(e) => {
                error!("Navigation task failed: {}", e);
                1
            }
        },
    }
}
