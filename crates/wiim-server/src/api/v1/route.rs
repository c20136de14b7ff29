//! V1 API routing configuration

use actix_web::web;

use crate::error::{json_error_handler, path_error_handler, query_error_handler};

use super::{health, process, record, server, site, tag, zone};

/// Register the v1 API on `cfg`
///
/// Routes (relative to the context path):
/// - /sites, /zones, /processes, /servers, /tags, /records
/// - GET /health
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(site::routes())
        .service(zone::routes())
        .service(process::routes())
        .service(server::routes())
        .service(tag::routes())
        .service(record::routes())
        .service(health::health);
}
