//! Latest-record-per-tag view over a process

use sea_orm::*;

use super::{apply_list_options, db_error, tags_of_process};
use crate::entity::{record, tag};
use crate::model::{ListOptions, SortOrder, TimelineEntry};

#[derive(Clone)]
pub struct TimelineService {
    db: DatabaseConnection,
    count_limit: u64,
}

impl TimelineService {
    pub fn new(db: DatabaseConnection, count_limit: u64) -> Self {
        Self { db, count_limit }
    }

    /// For each tag of the process that has at least one record, pair the
    /// tag with its record of greatest id.
    ///
    /// The list options address tag columns. Without an explicit order the
    /// entries are sorted by tag id ascending.
    pub async fn timeline(
        &self,
        process_id: i32,
        options: &ListOptions,
    ) -> anyhow::Result<Vec<TimelineEntry>> {
        let latest = record::Entity::find()
            .select_only()
            .column_as(record::Column::Id.max(), "latest_id")
            .group_by(record::Column::TagId)
            .into_query();

        let query = tag::Entity::find()
            .find_also_related(record::Entity)
            .filter(tag::Column::Id.in_subquery(tags_of_process(process_id)))
            .filter(record::Column::Id.in_subquery(latest));

        let mut options = options.clone();
        if options.order.is_none() {
            options.order = Some(SortOrder::Asc);
        }

        let rows = apply_list_options::<tag::Entity, _>(query, &options, self.count_limit)?
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|(tag, record)| record.map(|record| TimelineEntry { tag, record }))
            .collect())
    }
}
