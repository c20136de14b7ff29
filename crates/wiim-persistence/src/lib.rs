//! WIIM persistence layer
//!
//! SeaORM entities for the asset hierarchy (site, zone, process, server, tag,
//! record) and the query services built over them.

pub mod entity;
pub mod model;
pub mod resource;
pub mod service;
pub mod store;

pub use sea_orm;

pub use entity::prelude::*;
pub use model::*;
pub use resource::{Creatable, Resource};
pub use service::{QueryService, TimelineService};
pub use store::AssetStore;
