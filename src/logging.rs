use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;
use crate::errors::StartupError;

pub const SERVICE_NAME: &str = "susuwhisper";

/// Map a config level string to a filter; unknown values mean INFO.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    }
}

/// Install the global subscriber.
///
/// Without `log_file` events go to stdout in the default text format.
/// With it, events are appended to that file as JSON lines.
pub fn init(cfg: &AppConfig) -> Result<(), StartupError> {
    let level = parse_level(&cfg.log_level);

    match &cfg.log_file {
        Some(path) => {
            let log_err = |source| StartupError::LogFile {
                path: path.clone(),
                source,
            };

            if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(dir).map_err(log_err)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(log_err)?;

            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .json()
                .with_current_span(true)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    tracing::info!(
        service = SERVICE_NAME,
        version = %cfg.server_version,
        "logger initialized"
    );
    Ok(())
}
