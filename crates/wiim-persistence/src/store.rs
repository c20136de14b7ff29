//! Facade over the per-entity query services

use sea_orm::{DatabaseConnection, DbErr};

use crate::entity::{process, record, server, site, tag, zone};
use crate::service::{QueryService, TimelineService};

/// One query service per entity kind, sharing a connection pool and the
/// list size ceiling
#[derive(Clone)]
pub struct AssetStore {
    db: DatabaseConnection,
    pub sites: QueryService<site::Entity>,
    pub zones: QueryService<zone::Entity>,
    pub processes: QueryService<process::Entity>,
    pub servers: QueryService<server::Entity>,
    pub tags: QueryService<tag::Entity>,
    pub records: QueryService<record::Entity>,
    pub timeline: TimelineService,
}

impl AssetStore {
    pub fn new(db: DatabaseConnection, count_limit: u64) -> Self {
        Self {
            sites: QueryService::new(db.clone(), count_limit),
            zones: QueryService::new(db.clone(), count_limit),
            processes: QueryService::new(db.clone(), count_limit),
            servers: QueryService::new(db.clone(), count_limit),
            tags: QueryService::new(db.clone(), count_limit),
            records: QueryService::new(db.clone(), count_limit),
            timeline: TimelineService::new(db.clone(), count_limit),
            db,
        }
    }

    pub async fn health_check(&self) -> Result<(), DbErr> {
        self.db.ping().await
    }
}
