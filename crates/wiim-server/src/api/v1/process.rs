//! Process API handlers
//!
//! - GET /processes
//! - GET/DELETE /processes/{id}
//! - GET /processes/{id}/tags
//! - GET /processes/{id}/records
//! - GET /processes/{id}/timeline
//! - GET /processes/{id}/qrcode

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, web};
use tracing::info;
use wiim_common::WiimError;

use crate::{error::HandlerResult, label, model::AppState, model::response::Result};

use super::{
    base_url, cached, label_response,
    model::{ListParams, TagView, TimelineView},
};

#[get("")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options();
    cached(&req, &data, data.store.processes.list(&options)).await
}

#[get("/{id}")]
async fn get_process(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> HandlerResult {
    let id = path.into_inner();
    cached(&req, &data, data.store.processes.get_by_id(id)).await
}

#[delete("/{id}")]
async fn delete_process(data: web::Data<AppState>, path: web::Path<i32>) -> HandlerResult {
    let id = path.into_inner();
    data.store.processes.delete_by_id(id).await?;
    data.cache.invalidate();

    info!(process_id = id, "Process deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[get("/{id}/tags")]
async fn list_tags(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let id = path.into_inner();
    let options = params.options();
    let base = base_url(&req);

    cached(&req, &data, async {
        let tags = data.store.tags.get_by_process(id, &options).await?;
        Ok::<_, anyhow::Error>(TagView::from_models(tags, &base))
    })
    .await
}

#[get("/{id}/records")]
async fn list_records(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let records = data
        .store
        .records
        .get_by_process(path.into_inner(), &params.options())
        .await?;

    Ok(Result::http_success(records))
}

#[get("/{id}/timeline")]
async fn timeline(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let entries = data
        .store
        .timeline
        .timeline(path.into_inner(), &params.options())
        .await?;

    Ok(Result::http_success(TimelineView::from_entries(
        entries,
        &base_url(&req),
    )))
}

#[get("/{id}/qrcode")]
async fn qrcode(data: web::Data<AppState>, path: web::Path<i32>) -> HandlerResult {
    let id = path.into_inner();
    if !data.store.processes.exists(id).await? {
        return Err(WiimError::not_found("Process", id).into());
    }

    label_response(&data, label::process_payload(id))
}

pub fn routes() -> Scope {
    web::scope("/processes")
        .service(list)
        .service(get_process)
        .service(delete_process)
        .service(list_tags)
        .service(list_records)
        .service(timeline)
        .service(qrcode)
}
