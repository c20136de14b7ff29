//! Tracing setup for the WIIM server
//!
//! Events go to the console and to rolling files in the log directory:
//! `wiim.log` holds everything at or above the file level, while
//! `persistence.log` and `http.log` keep the full trace of the store and of
//! the API handlers (including actix request lines).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub const ROOT_LOG_FILE: &str = "wiim.log";

/// A dedicated file receiving every event of its targets
struct Channel {
    file: &'static str,
    targets: &'static [&'static str],
}

impl Channel {
    fn filter(&self) -> Targets {
        Targets::new().with_targets(
            self.targets
                .iter()
                .map(|target| (*target, LevelFilter::TRACE)),
        )
    }
}

const CHANNELS: [Channel; 2] = [
    Channel {
        file: "persistence.log",
        targets: &["wiim_persistence"],
    },
    Channel {
        file: "http.log",
        targets: &["wiim_server::api", "actix_web::middleware::logger"],
    },
];

/// How often the log files roll over, from `wiim.logs.rotation`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(LogRotation::Daily),
            "hourly" => Ok(LogRotation::Hourly),
            "never" => Ok(LogRotation::Never),
            _ => Err(format!("Invalid log rotation: {}", s)),
        }
    }
}

impl LogRotation {
    fn appender(self, dir: &Path, file: &str) -> RollingFileAppender {
        let rotation = match self {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        };
        RollingFileAppender::new(rotation, dir, file)
    }
}

/// `~/wiim/logs`
pub fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join("wiim").join("logs")
}

/// Where and how much to log. `None` switches an output off.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub console: Option<Level>,
    pub file: Option<Level>,
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console: Some(Level::INFO),
            file: Some(Level::INFO),
            rotation: LogRotation::Daily,
        }
    }
}

/// Holds the background writers of the log files; dropping it flushes them
pub struct LoggingGuard(Vec<WorkerGuard>);

/// Install the global subscriber described by `config`
///
/// `RUST_LOG`, when set, replaces the console level. The root file always
/// uses the configured file level.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, Box<dyn std::error::Error>> {
    let mut guards = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if let Some(level) = config.console {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_str()));
        layers.push(fmt::layer().with_target(true).with_filter(filter).boxed());
    }

    if let Some(level) = config.file {
        std::fs::create_dir_all(&config.log_dir)?;

        let (writer, guard) =
            tracing_appender::non_blocking(config.rotation.appender(&config.log_dir, ROOT_LOG_FILE));
        guards.push(guard);
        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(LevelFilter::from_level(level))
                .boxed(),
        );

        for channel in &CHANNELS {
            let (writer, guard) =
                tracing_appender::non_blocking(config.rotation.appender(&config.log_dir, channel.file));
            guards.push(guard);
            layers.push(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_filter(channel.filter())
                    .boxed(),
            );
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    tracing::info!(
        log_dir = %config.log_dir.display(),
        console = ?config.console,
        file = ?config.file,
        rotation = ?config.rotation,
        "Logging initialized"
    );

    Ok(LoggingGuard(guards))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.console, Some(Level::INFO));
        assert_eq!(config.file, Some(Level::INFO));
        assert_eq!(config.rotation, LogRotation::Daily);
        assert!(config.log_dir.ends_with("wiim/logs"));
    }

    #[test]
    fn test_rotation_from_str() {
        assert_eq!("hourly".parse::<LogRotation>(), Ok(LogRotation::Hourly));
        assert_eq!(" Never ".parse::<LogRotation>(), Ok(LogRotation::Never));
        assert_eq!("DAILY".parse::<LogRotation>(), Ok(LogRotation::Daily));
        assert!("weekly".parse::<LogRotation>().is_err());
    }

    #[test]
    fn test_channels_route_their_targets() {
        let [persistence, http] = &CHANNELS;

        let filter = persistence.filter();
        assert!(filter.would_enable("wiim_persistence::service::tag", &Level::TRACE));
        assert!(!filter.would_enable("wiim_server::api::v1::site", &Level::ERROR));

        let filter = http.filter();
        assert!(filter.would_enable("wiim_server::api::v1::tag", &Level::DEBUG));
        assert!(filter.would_enable("actix_web::middleware::logger", &Level::INFO));
        assert!(!filter.would_enable("wiim_persistence", &Level::INFO));
    }
}
