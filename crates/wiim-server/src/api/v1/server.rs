//! Server API handlers
//!
//! - GET/POST /servers
//! - GET/DELETE /servers/{id}
//! - GET/POST /servers/{id}/tags

use actix_web::{HttpRequest, HttpResponse, Scope, delete, get, post, web};
use tracing::info;
use wiim_persistence::{NewServer, NewTag};

use crate::{error::HandlerResult, model::AppState, model::response::Result};

use super::{
    base_url, cached,
    model::{ListParams, TagView},
};

#[get("")]
async fn list(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options();
    cached(&req, &data, data.store.servers.list(&options)).await
}

#[post("")]
async fn create(data: web::Data<AppState>, body: web::Json<NewServer>) -> HandlerResult {
    let server = data.store.servers.create(body.into_inner()).await?;
    data.cache.invalidate();

    info!(server_id = server.id, uid = %server.uid, "Server created");
    Ok(Result::http_created(server))
}

#[get("/{id}")]
async fn get_server(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> HandlerResult {
    let id = path.into_inner();
    cached(&req, &data, data.store.servers.get_by_id(id)).await
}

#[delete("/{id}")]
async fn delete_server(data: web::Data<AppState>, path: web::Path<i32>) -> HandlerResult {
    let id = path.into_inner();
    data.store.servers.delete_by_id(id).await?;
    data.cache.invalidate();

    info!(server_id = id, "Server deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[get("/{id}/tags")]
async fn list_tags(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    params: web::Query<ListParams>,
) -> HandlerResult {
    let options = params.options().filter("server_id", path.into_inner());
    let base = base_url(&req);

    cached(&req, &data, async {
        let tags = data.store.tags.list(&options).await?;
        Ok::<_, anyhow::Error>(TagView::from_models(tags, &base))
    })
    .await
}

#[post("/{id}/tags")]
async fn create_tag(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<NewTag>,
) -> HandlerResult {
    let request = NewTag {
        server_id: path.into_inner(),
        ..body.into_inner()
    };
    let tag = data.store.tags.create(request).await?;
    data.cache.invalidate();

    info!(tag_id = tag.id, server_id = tag.server_id, "Tag created");
    Ok(Result::http_created(TagView::new(tag, &base_url(&req))))
}

pub fn routes() -> Scope {
    web::scope("/servers")
        .service(list)
        .service(create)
        .service(get_server)
        .service(delete_server)
        .service(list_tags)
        .service(create_tag)
}
