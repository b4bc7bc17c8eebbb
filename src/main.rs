use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use tempo::core::config::{self, ConfigStore, TempoConfig};
use tempo::core::zones;
use tempo::tui;

#[derive(Parser)]
#[command(name = "tempo", about = "World clock, Pomodoro timer, stopwatch and alarm in one terminal dashboard")]
struct Args {
    /// Config file (default: ~/.tempo/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long, default_value = "tempo.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // The terminal belongs to the dashboard, so logs go to a file
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    let path = args.config.or_else(config::config_path);
    let base = match &path {
        Some(path) => config::load_config(path).unwrap_or_else(|e| {
            log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
            TempoConfig::default()
        }),
        None => {
            log::warn!("No home directory; settings will not be saved");
            TempoConfig::default()
        }
    };
    let resolved = config::resolve(&base, zones::system_zone());

    log::info!(
        "Tempo starting up (main zone: {}, config: {})",
        resolved.main_zone.name(),
        path.as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    tui::run(resolved, ConfigStore::new(path, base))
}
