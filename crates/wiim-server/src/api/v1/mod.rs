//! WIIM v1 HTTP API
//!
//! Every JSON response is wrapped in the `{code, message, data}` envelope.

use std::future::Future;

use actix_web::{HttpRequest, HttpResponse, http::header::ContentType, web::Bytes};
use serde::Serialize;
use tracing::debug;

use crate::{error::HandlerResult, label, model::AppState, model::response::Result};

pub mod health;
pub mod model;
pub mod process;
pub mod record;
pub mod route;
pub mod server;
pub mod site;
pub mod tag;
pub mod zone;

/// `{scheme}://{host}` of the incoming request
pub(crate) fn base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}

fn cache_key(req: &HttpRequest) -> String {
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    format!("{}{}", base_url(req), path)
}

/// Serve a JSON envelope from the response cache, running `load` on a miss
pub(crate) async fn cached<T, F>(req: &HttpRequest, data: &AppState, load: F) -> HandlerResult
where
    T: Serialize,
    F: Future<Output = anyhow::Result<T>>,
{
    let key = cache_key(req);

    if let Some(body) = data.cache.json(&key) {
        debug!(key = %key, "Serving cached response");
        return Ok(json_body(body));
    }

    let value = load.await?;
    let body = Bytes::from(serde_json::to_vec(&Result::success(value)).map_err(anyhow::Error::from)?);
    data.cache.insert_json(key, body.clone());

    Ok(json_body(body))
}

fn json_body(body: Bytes) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body)
}

/// Serve the PNG label for `payload`, rendering it on first use
pub(crate) fn label_response(data: &AppState, payload: String) -> HandlerResult {
    let png = match data.cache.label(&payload) {
        Some(png) => png,
        None => {
            let png = Bytes::from(label::render_png(&payload)?);
            data.cache.insert_label(payload, png.clone());
            png
        }
    };

    Ok(HttpResponse::Ok().content_type(ContentType::png()).body(png))
}
