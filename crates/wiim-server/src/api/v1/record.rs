//! Record API handlers
//!
//! - GET /records, optionally restricted with `tags`
//! - GET/DELETE /records/{id}

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, web};
use tracing::info;

use crate::{error::HandlerResult, model::AppState, model::response::Result};

use super::{
    cached,
    model::{ListParams, parse_tag_ids},
};

#[get("")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options();

    let records = match parse_tag_ids(req.query_string())? {
        Some(tag_ids) => data.store.records.get_by_tags(&tag_ids, &options).await?,
        None => data.store.records.list(&options).await?,
    };

    Ok(Result::http_success(records))
}

#[get("/{id}")]
async fn get_record(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> HandlerResult {
    let id = path.into_inner();
    cached(&req, &data, data.store.records.get_by_id(id)).await
}

#[delete("/{id}")]
async fn delete_record(data: web::Data<AppState>, path: web::Path<i32>) -> HandlerResult {
    let id = path.into_inner();
    data.store.records.delete_by_id(id).await?;
    data.cache.invalidate();

    info!(record_id = id, "Record deleted");
    Ok(HttpResponse::NoContent().finish())
}

pub fn routes() -> Scope {
    web::scope("/records")
        .service(list)
        .service(get_record)
        .service(delete_record)
}
