//! `SeaORM` Entity for tag table
//!
//! Tags are the control variables read from a server.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub alias: String,
    pub comment: Option<String>,
    pub unit: Option<String>,
    /// Icon name, resolved to an image url by the HTTP layer
    pub icon: Option<String>,
    pub server_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::server::Entity",
        from = "Column::ServerId",
        to = "super::server::Column::Id",
        on_delete = "Cascade"
    )]
    Server,
    #[sea_orm(has_many = "super::record::Entity")]
    Record,
    #[sea_orm(has_many = "super::process_tag::Entity")]
    ProcessTag,
}

impl Related<super::server::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Server.def()
    }
}

impl Related<super::record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Record.def()
    }
}

impl Related<super::process_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
