//! Tag API handlers
//!
//! - GET /tags
//! - GET/DELETE /tags/{id}
//! - GET/POST /tags/{id}/records
//! - GET /tags/{id}/qrcode

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, web};
use tracing::info;
use wiim_common::WiimError;
use wiim_persistence::NewRecord;

use crate::{error::HandlerResult, label, model::AppState, model::response::Result};

use super::{
    base_url, cached, label_response,
    model::{ListParams, TagView},
};

#[get("")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options();
    let base = base_url(&req);

    cached(&req, &data, async {
        let tags = data.store.tags.list(&options).await?;
        Ok::<_, anyhow::Error>(TagView::from_models(tags, &base))
    })
    .await
}

#[get("/{id}")]
async fn get_tag(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> HandlerResult {
    let id = path.into_inner();
    let base = base_url(&req);

    cached(&req, &data, async {
        let tag = data.store.tags.get_by_id(id).await?;
        Ok::<_, anyhow::Error>(TagView::new(tag, &base))
    })
    .await
}

#[delete("/{id}")]
async fn delete_tag(data: web::Data<AppState>, path: web::Path<i32>) -> HandlerResult {
    let id = path.into_inner();
    data.store.tags.delete_by_id(id).await?;
    data.cache.invalidate();

    info!(tag_id = id, "Tag deleted");
    Ok(HttpResponse::NoContent().finish())
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
        .get_by_tags(&[path.into_inner()], &params.options())
        .await?;

    Ok(Result::http_success(records))
}

#[post("/{id}/records")]
async fn create_record(
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<NewRecord>,
) -> HandlerResult {
    let request = NewRecord {
        tag_id: path.into_inner(),
        ..body.into_inner()
    };
    let record = data.store.records.create(request).await?;
    data.cache.invalidate();

    info!(record_id = record.id, tag_id = record.tag_id, "Record created");
    Ok(Result::http_created(record))
}

#[get("/{id}/qrcode")]
async fn qrcode(data: web::Data<AppState>, path: web::Path<i32>) -> HandlerResult {
    let id = path.into_inner();
    if !data.store.tags.exists(id).await? {
        return Err(WiimError::not_found("Tag", id).into());
    }

    label_response(&data, label::tag_payload(id))
}

pub fn routes() -> Scope {
    web::scope("/tags")
        .service(list)
        .service(get_tag)
        .service(delete_tag)
        .service(list_records)
        .service(create_record)
        .service(qrcode)
}
