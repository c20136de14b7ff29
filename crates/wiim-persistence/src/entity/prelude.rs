pub use super::process::Entity as Process;
pub use super::process_tag::Entity as ProcessTag;
pub use super::record::Entity as Record;
pub use super::server::Entity as Server;
pub use super::site::Entity as Site;
pub use super::tag::Entity as Tag;
pub use super::zone::Entity as Zone;
