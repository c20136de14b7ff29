//! Entity-shape capabilities consumed by the generic query service
//!
//! `Resource` describes how an entity is addressed and ordered; `Creatable`
//! binds an entity to its typed create request and insert procedure.

use std::str::FromStr;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use validator::Validate;

use crate::entity::{process, record, server, site, tag, zone};
use crate::model::{NewProcess, NewServer, NewSite, NewZone};
use crate::service::db_error;

/// Capability set of an entity kind served by [`crate::service::QueryService`]
pub trait Resource: EntityTrait {
    /// Human readable name used in errors and logs
    const SINGULAR: &'static str;
    const PLURAL: &'static str;

    /// Monotonic identifier column, basis of the `since_id` cursor
    fn id_column() -> Self::Column;

    /// Column sorted on when a list asks for `asc` or `desc`
    fn order_column() -> Self::Column {
        Self::id_column()
    }

    /// Resolve a filter column by its name
    fn column(name: &str) -> Option<Self::Column>;
}

/// Entities that can be created from a validated request
#[async_trait]
pub trait Creatable: Resource {
    type Request: Validate + Send + 'static;

    /// Insert the request and return the materialized row, including
    /// generated and server-stamped fields.
    async fn persist(db: &DatabaseConnection, request: Self::Request)
    -> anyhow::Result<Self::Model>;
}

macro_rules! impl_resource {
    ($module:ident, $singular:literal, $plural:literal) => {
        impl_resource!($module, $singular, $plural, Id);
    };
    ($module:ident, $singular:literal, $plural:literal, $order:ident) => {
        impl Resource for $module::Entity {
            const SINGULAR: &'static str = $singular;
            const PLURAL: &'static str = $plural;

            fn id_column() -> Self::Column {
                $module::Column::Id
            }

            fn order_column() -> Self::Column {
                $module::Column::$order
            }

            fn column(name: &str) -> Option<Self::Column> {
                $module::Column::from_str(name).ok()
            }
        }
    };
}

macro_rules! impl_creatable {
    ($module:ident, $request:ty) => {
        #[async_trait]
        impl Creatable for $module::Entity {
            type Request = $request;

            async fn persist(
                db: &DatabaseConnection,
                request: $request,
            ) -> anyhow::Result<$module::Model> {
                let model = $module::ActiveModel::from(request)
                    .insert(db)
                    .await
                    .map_err(db_error)?;
                Ok(model)
            }
        }
    };
}

impl_resource!(site, "Site", "Sites");
impl_resource!(zone, "Zone", "Zones");
impl_resource!(process, "Process", "Processes");
impl_resource!(server, "Server", "Servers");
impl_resource!(tag, "Tag", "Tags");
impl_resource!(record, "Record", "Records", TimeOpc);

impl_creatable!(site, NewSite);
impl_creatable!(zone, NewZone);
impl_creatable!(process, NewProcess);
impl_creatable!(server, NewServer);
