//! Application startup utilities module.

mod http;
mod logging;

pub use http::main_server;
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, default_log_dir, init_logging};
