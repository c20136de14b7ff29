// Main library module for WIIM - an industrial asset registry with process timelines

pub mod api; // API handlers and models
pub mod cache; // Response caching
pub mod error; // Error handling and types
pub mod label; // QR label rendering
pub mod model; // Data models and types
pub mod startup; // Application startup utilities

pub use model::{AppState, Configuration};
