//! HTTP API handlers and models

pub mod v1;
