//! Zone API handlers
//!
//! - GET /zones
//! - GET/DELETE /zones/{id}
//! - GET/POST /zones/{id}/processes

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, web};
use tracing::info;
use wiim_persistence::NewProcess;

use crate::{error::HandlerResult, model::AppState, model::response::Result};

use super::{cached, model::ListParams};

#[get("")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options();
    cached(&req, &data, data.store.zones.list(&options)).await
}

#[get("/{id}")]
async fn get_zone(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> HandlerResult {
    let id = path.into_inner();
    cached(&req, &data, data.store.zones.get_by_id(id)).await
}

#[delete("/{id}")]
async fn delete_zone(data: web::Data<AppState>, path: web::Path<i32>) -> HandlerResult {
    let id = path.into_inner();
    data.store.zones.delete_by_id(id).await?;
    data.cache.invalidate();

    info!(zone_id = id, "Zone deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[get("/{id}/processes")]
async fn list_processes(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options().filter("zone_id", path.into_inner());
    cached(&req, &data, data.store.processes.list(&options)).await
}

#[post("/{id}/processes")]
async fn create_process(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<NewProcess>,
) -> HandlerResult {
    let request = NewProcess {
        zone_id: path.into_inner(),
        ..body.into_inner()
    };
    let process = data.store.processes.create(request).await?;
    data.cache.invalidate();

    info!(process_id = process.id, zone_id = process.zone_id, "Process created");
    Ok(Result::http_created(process))
}

pub fn routes() -> Scope {
    web::scope("/zones")
        .service(list)
        .service(get_zone)
        .service(delete_zone)
        .service(list_processes)
        .service(create_process)
}
