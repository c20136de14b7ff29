//! WIIM Common - Shared error taxonomy
//!
//! This crate provides the error kinds raised by the asset store and the
//! structured error codes carried in API responses.

pub mod error;

pub use error::{ErrorCode, WiimError};

/// Default ceiling on the number of rows a single list query may return
pub const DEFAULT_COUNT_LIMIT: u64 = 100;
