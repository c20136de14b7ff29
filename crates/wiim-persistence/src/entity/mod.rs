//! `SeaORM` entities for the asset model
//!
//! Ownership hierarchy: Site → Zone → Process and Server → Tag → Record,
//! plus the `process_tags` many-to-many join between Process and Tag.

pub mod prelude;

pub mod process;
pub mod process_tag;
pub mod record;
pub mod server;
pub mod site;
pub mod tag;
pub mod zone;
