//! Site API handlers
//!
//! - GET/POST /sites
//! - GET/DELETE /sites/{id}
//! - GET/POST /sites/{id}/zones

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, web};
use tracing::info;
use wiim_persistence::{NewSite, NewZone};

use crate::{error::HandlerResult, model::AppState, model::response::Result};

use super::{cached, model::ListParams};

#[get("")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options();
    cached(&req, &data, data.store.sites.list(&options)).await
}

#[post("")]
async fn create(data: web::Data<AppState>, body: web::Json<NewSite>) -> HandlerResult {
    let site = data.store.sites.create(body.into_inner()).await?;
    data.cache.invalidate();

    info!(site_id = site.id, "Site created");
    Ok(Result::http_created(site))
}

#[get("/{id}")]
async fn get_site(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> HandlerResult {
    let id = path.into_inner();
    cached(&req, &data, data.store.sites.get_by_id(id)).await
}

#[delete("/{id}")]
async fn delete_site(data: web::Data<AppState>, path: web::Path<i32>) -> HandlerResult {
    let id = path.into_inner();
    data.store.sites.delete_by_id(id).await?;
    data.cache.invalidate();

    info!(site_id = id, "Site deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[get("/{id}/zones")]
async fn list_zones(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options().filter("site_id", path.into_inner());
    cached(&req, &data, data.store.zones.list(&options)).await
}

#[post("/{id}/zones")]
async fn create_zone(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<NewZone>,
) -> HandlerResult {
    let request = NewZone {
        site_id: path.into_inner(),
        ..body.into_inner()
    };
    let zone = data.store.zones.create(request).await?;
    data.cache.invalidate();

    info!(zone_id = zone.id, site_id = zone.site_id, "Zone created");
    Ok(Result::http_created(zone))
}

pub fn routes() -> Scope {
    web::scope("/sites")
        .service(list)
        .service(create)
        .service(get_site)
        .service(delete_site)
        .service(list_zones)
        .service(create_zone)
}
