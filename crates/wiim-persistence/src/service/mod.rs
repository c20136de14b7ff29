//! Generic query service shared by every entity kind
//!
//! `QueryService<E>` implements create, list, lookup and delete once for all
//! entities through the [`Resource`] capability trait. Relation-specific
//! queries live in the per-entity submodules as inherent impls.

mod record;
mod tag;
mod timeline;

use std::marker::PhantomData;

use sea_orm::*;
use tracing::info;
use validator::{Validate, ValidationErrors};
use wiim_common::WiimError;

use crate::model::{ListOptions, SortOrder, effective_limit};
use crate::resource::{Creatable, Resource};

pub use timeline::TimelineService;

pub(crate) use tag::tags_of_process;

/// Translate a database error, surfacing foreign key violations as
/// referential integrity failures
pub(crate) fn db_error(err: DbErr) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            WiimError::ReferentialIntegrity(msg).into()
        }
        _ => WiimError::DatabaseError(err.to_string()).into(),
    }
}

pub(crate) fn validation_error(errors: ValidationErrors) -> anyhow::Error {
    WiimError::validation(errors.field_errors().into_keys().map(|k| k.to_string())).into()
}

/// Apply the list contract of `options` to `query`
///
/// The cursor and filters resolve against `E`'s columns, so the query may
/// join other tables as long as `E` is its primary entity.
pub(crate) fn apply_list_options<E, Q>(
    mut query: Q,
    options: &ListOptions,
    count_limit: u64,
) -> anyhow::Result<Q>
where
    E: Resource,
    Q: QueryFilter + QueryOrder + QuerySelect,
{
    for (name, value) in options.filters.iter() {
        let column = E::column(name).ok_or_else(|| WiimError::validation([name.clone()]))?;
        query = query.filter(column.eq(value.clone()));
    }

    if options.since_id > 0 {
        query = query.filter(E::id_column().gt(options.since_id));
    }

    query = match options.order {
        Some(SortOrder::Asc) => query.order_by_asc(E::order_column()),
        Some(SortOrder::Desc) => query.order_by_desc(E::order_column()),
        None => query,
    };

    Ok(query.limit(effective_limit(options.limit, count_limit)))
}

pub struct QueryService<E> {
    db: DatabaseConnection,
    count_limit: u64,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for QueryService<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            count_limit: self.count_limit,
            _entity: PhantomData,
        }
    }
}

impl<E: Resource> QueryService<E> {
    pub fn new(db: DatabaseConnection, count_limit: u64) -> Self {
        Self {
            db,
            count_limit,
            _entity: PhantomData,
        }
    }

    /// Validate and insert a new entity, returning the row as stored
    pub async fn create(&self, request: E::Request) -> anyhow::Result<E::Model>
    where
        E: Creatable,
    {
        request.validate().map_err(validation_error)?;

        let model = E::persist(&self.db, request).await?;
        info!(entity = E::SINGULAR, "{} was created successfully", E::SINGULAR);

        Ok(model)
    }

    pub async fn list(&self, options: &ListOptions) -> anyhow::Result<Vec<E::Model>> {
        self.fetch(E::find(), options).await
    }

    pub async fn get_by_id(&self, id: i32) -> anyhow::Result<E::Model> {
        let model = E::find()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        model.ok_or_else(|| WiimError::not_found(E::SINGULAR, id).into())
    }

    pub async fn exists(&self, id: i32) -> anyhow::Result<bool> {
        let model = E::find()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await
            .map_err(db_error)?;

        Ok(model.is_some())
    }

    /// Delete an entity by id; dependents are removed by the cascading
    /// foreign keys
    pub async fn delete_by_id(&self, id: i32) -> anyhow::Result<()> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(WiimError::not_found(E::SINGULAR, id).into());
        }

        info!(entity = E::SINGULAR, id, "{} was deleted successfully", E::SINGULAR);
        Ok(())
    }

    pub(crate) async fn fetch(
        &self,
        query: Select<E>,
        options: &ListOptions,
    ) -> anyhow::Result<Vec<E::Model>> {
        apply_list_options::<E, _>(query, options, self.count_limit)?
            .all(&self.db)
            .await
            .map_err(db_error)
    }
}
