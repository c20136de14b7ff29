//! Configuration management for the WIIM server
//!
//! Settings are read from `conf/application.yml` (optional), overridden by
//! `WIIM`-prefixed environment variables and finally by command line flags.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::Level;
use wiim_common::DEFAULT_COUNT_LIMIT;

use crate::startup::{LogRotation, LoggingConfig, default_log_dir};

pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_CONTEXT_PATH: &str = "api/v1";
pub const DEFAULT_CACHE_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://wiim.db?mode=rwc";

/// Command line arguments for the server
#[derive(Debug, Default, Parser)]
#[command(name = "wiim-server", version, about)]
pub struct Cli {
    /// Configuration file, read when present
    #[arg(short = 'c', long = "config", default_value = "conf/application.yml")]
    pub config_file: String,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

/// Connection pool settings under `db.pool.config`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds
    pub connect_timeout: u64,
    /// Seconds
    pub idle_timeout: u64,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(args: Cli) -> anyhow::Result<Self> {
        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&args.config_file).required(false))
            .add_source(
                Environment::with_prefix("wiim")
                    .separator(".")
                    .try_parsing(true),
            );

        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override("db.url", v)?;
        }
        if let Some(v) = args.port {
            config_builder = config_builder.set_override("server.port", i64::from(v))?;
        }

        Ok(Configuration {
            config: config_builder.build()?,
        })
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    pub fn server_context_path(&self) -> String {
        self.config
            .get_string("wiim.server.contextPath")
            .unwrap_or(DEFAULT_CONTEXT_PATH.to_string())
    }

    // ========================================================================
    // Query Configuration
    // ========================================================================

    /// Ceiling on the number of rows any list returns
    pub fn count_limit(&self) -> u64 {
        self.config
            .get_int("wiim.count.limit")
            .ok()
            .filter(|v| *v > 0)
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_COUNT_LIMIT)
    }

    /// Response cache TTL in seconds; zero disables the cache
    pub fn cache_timeout(&self) -> u64 {
        self.config
            .get_int("wiim.cache.timeout")
            .ok()
            .filter(|v| *v >= 0)
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_CACHE_TIMEOUT_SECONDS)
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    /// Console and files share `wiim.logs.level` unless
    /// `wiim.logs.fileLevel` sets the files apart
    pub fn logging_config(&self) -> LoggingConfig {
        let level = self.log_level("wiim.logs.level").unwrap_or(Level::INFO);
        let file_level = self.log_level("wiim.logs.fileLevel").unwrap_or(level);

        LoggingConfig {
            log_dir: self
                .config
                .get_string("wiim.logs.path")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_log_dir()),
            console: self
                .config
                .get_bool("wiim.logs.console")
                .unwrap_or(true)
                .then_some(level),
            file: self
                .config
                .get_bool("wiim.logs.file")
                .unwrap_or(true)
                .then_some(file_level),
            rotation: self
                .config
                .get_string("wiim.logs.rotation")
                .ok()
                .and_then(|v| v.parse::<LogRotation>().ok())
                .unwrap_or_default(),
        }
    }

    fn log_level(&self, key: &str) -> Option<Level> {
        self.config
            .get_string(key)
            .ok()
            .and_then(|v| v.parse().ok())
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn database_url(&self) -> String {
        self.config
            .get_string("db.url")
            .unwrap_or(DEFAULT_DATABASE_URL.to_string())
    }

    /// Whether pending migrations are applied at startup
    pub fn db_migrate(&self) -> bool {
        self.config.get_bool("db.migrate").unwrap_or(true)
    }

    /// Pool size and timeouts; values that do not fit the target type fall
    /// back to their defaults
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.pool_value("maximumPoolSize", 10),
            min_connections: self.pool_value("minimumPoolSize", 1),
            connect_timeout: self.pool_value("connectionTimeout", 30),
            idle_timeout: self.pool_value("idleTimeout", 600),
        }
    }

    fn pool_value<T: TryFrom<i64>>(&self, key: &str, default: T) -> T {
        self.config
            .get_int(&format!("db.pool.config.{}", key))
            .ok()
            .and_then(|v| T::try_from(v).ok())
            .unwrap_or(default)
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let PoolSettings {
            max_connections,
            min_connections,
            connect_timeout,
            idle_timeout,
        } = self.pool_settings();
        let sqlx_logging = self.config.get_bool("db.sqlx.logging").unwrap_or(false);

        let mut opt = ConnectOptions::new(self.database_url());

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .sqlx_logging(sqlx_logging);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        let database_connection = Database::connect(opt).await?;

        Ok(database_connection)
    }
}
