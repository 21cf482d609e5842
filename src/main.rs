use clap::Parser;
use parley::core::config::{self, CliOverrides, ConfigNote, LoadedConfig};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parley", about = "Terminal chat client for a retrieval-augmented assistant")]
struct Args {
    /// Base URL of the assistant service (overrides config and PARLEY_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Knowledge domain forwarded with every request
    #[arg(short, long)]
    domain: Option<String>,

    /// Read configuration from this file instead of ~/.parley/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // The logger isn't up yet, so config problems go to stderr.
    let loaded = match config::load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("parley: {e}; continuing with defaults");
            LoadedConfig::default()
        }
    };
    let resolved = config::resolve(
        &loaded.config,
        &CliOverrides {
            base_url: args.base_url,
            domain: args.domain,
        },
    );

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    let logging = match File::create(&resolved.log_file) {
        Ok(log_file) => WriteLogger::init(resolved.log_level, log_config, log_file).is_ok(),
        Err(e) => {
            eprintln!("parley: cannot open log file {}: {e}", resolved.log_file.display());
            false
        }
    };
    // Config notes were collected before the logger existed
    for note in loaded.notes.iter().chain(&resolved.notes) {
        replay(note, logging);
    }

    log::info!(
        "Parley starting up against {} (domain: {:?})",
        resolved.base_url,
        resolved.domain
    );

    parley::tui::run(resolved)
}

/// Log a config note, or print warnings to stderr when there is no log.
fn replay(note: &ConfigNote, logging: bool) {
    if logging {
        log::log!(note.level, "{}", note.message);
    } else if note.level <= log::Level::Warn {
        eprintln!("parley: {}", note.message);
    }
}
