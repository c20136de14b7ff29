//! Record ingestion and the per-tag and per-process record queries

use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike, Utc};
use sea_orm::*;
use wiim_common::WiimError;

use super::{QueryService, db_error, tags_of_process};
use crate::entity::{record, tag};
use crate::model::{ListOptions, NewRecord};
use crate::resource::Creatable;

/// Current UTC time truncated to millisecond precision
fn ingestion_time() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    let millis = now.nanosecond() / 1_000_000 * 1_000_000;
    now.with_nanosecond(millis).unwrap_or(now)
}

#[async_trait]
impl Creatable for record::Entity {
    type Request = NewRecord;

    async fn persist(db: &DatabaseConnection, request: NewRecord) -> anyhow::Result<record::Model> {
        let tag = tag::Entity::find_by_id(request.tag_id)
            .one(db)
            .await
            .map_err(db_error)?;
        if tag.is_none() {
            return Err(WiimError::ReferentialIntegrity(format!(
                "tag {} does not exist",
                request.tag_id
            ))
            .into());
        }

        let model = request
            .into_active_model(ingestion_time())
            .insert(db)
            .await
            .map_err(db_error)?;
        Ok(model)
    }
}

impl QueryService<record::Entity> {
    /// Records whose tag is one of `tag_ids`
    pub async fn get_by_tags(
        &self,
        tag_ids: &[i32],
        options: &ListOptions,
    ) -> anyhow::Result<Vec<record::Model>> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query =
            record::Entity::find().filter(record::Column::TagId.is_in(tag_ids.iter().copied()));

        self.fetch(query, options).await
    }

    /// Records of every tag that is a member of the given process
    pub async fn get_by_process(
        &self,
        process_id: i32,
        options: &ListOptions,
    ) -> anyhow::Result<Vec<record::Model>> {
        let query = record::Entity::find()
            .filter(record::Column::TagId.in_subquery(tags_of_process(process_id)));

        self.fetch(query, options).await
    }
}
