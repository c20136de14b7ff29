//! Tag creation and the process membership query

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{sea_query::SelectStatement, *};
use tracing::warn;

use super::{QueryService, db_error};
use crate::entity::{process, process_tag, tag};
use crate::model::{ListOptions, NewTag};
use crate::resource::Creatable;

/// `SELECT tag_id FROM process_tags WHERE process_id = ?`
pub(crate) fn tags_of_process(process_id: i32) -> SelectStatement {
    process_tag::Entity::find()
        .select_only()
        .column(process_tag::Column::TagId)
        .filter(process_tag::Column::ProcessId.eq(process_id))
        .into_query()
}

#[async_trait]
impl Creatable for tag::Entity {
    type Request = NewTag;

    /// Insert the tag and its process memberships in one transaction.
    /// Process ids that do not resolve are skipped.
    async fn persist(db: &DatabaseConnection, request: NewTag) -> anyhow::Result<tag::Model> {
        let (active, process_ids) = request.into_parts();
        let process_ids: BTreeSet<i32> = process_ids.into_iter().collect();

        let txn = db.begin().await.map_err(db_error)?;

        let tag = active.insert(&txn).await.map_err(db_error)?;

        let resolved: Vec<i32> = process::Entity::find()
            .select_only()
            .column(process::Column::Id)
            .filter(process::Column::Id.is_in(process_ids.iter().copied()))
            .into_tuple::<i32>()
            .all(&txn)
            .await
            .map_err(db_error)?;

        for skipped in process_ids.iter().filter(|id| !resolved.contains(id)) {
            warn!(
                tag_id = tag.id,
                process_id = *skipped,
                "Skipping unknown process for new tag"
            );
        }

        if !resolved.is_empty() {
            let memberships = resolved.iter().map(|process_id| process_tag::ActiveModel {
                process_id: Set(*process_id),
                tag_id: Set(tag.id),
            });
            process_tag::Entity::insert_many(memberships)
                .exec_without_returning(&txn)
                .await
                .map_err(db_error)?;
        }

        txn.commit().await.map_err(db_error)?;

        Ok(tag)
    }
}

impl QueryService<tag::Entity> {
    /// Tags that are members of the given process
    pub async fn get_by_process(
        &self,
        process_id: i32,
        options: &ListOptions,
    ) -> anyhow::Result<Vec<tag::Model>> {
        let query =
            tag::Entity::find().filter(tag::Column::Id.in_subquery(tags_of_process(process_id)));

        self.fetch(query, options).await
    }
}
