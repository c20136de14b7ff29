//! Storage health check
//!
//! - GET /health

use actix_web::{Responder, get, web};
use serde::Serialize;
use tracing::warn;
use wiim_common::error::DATA_ACCESS_ERROR;

use crate::model::{AppState, response::Result};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> impl Responder {
    match data.store.health_check().await {
        Ok(()) => Result::http_success(HealthStatus { status: "UP" }),
        Err(err) => {
            warn!(error = %err, "Storage health check failed");
            Result::http_response(
                503,
                DATA_ACCESS_ERROR.code,
                err.to_string(),
                HealthStatus { status: "DOWN" },
            )
        }
    }
}
