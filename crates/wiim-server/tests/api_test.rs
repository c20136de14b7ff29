//! HTTP API tests against an in-memory SQLite store

use actix_web::{App, http::StatusCode, test, web};
use config::Config;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use wiim_migration::{Migrator, MigratorTrait};
use wiim_persistence::AssetStore;
use wiim_server::{AppState, Configuration, api::v1::route::configure};

async fn setup_state(count_limit: i64) -> AppState {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let config = Config::builder()
        .set_override("wiim.count.limit", count_limit)
        .unwrap()
        .build()
        .unwrap();
    let configuration = Configuration::from_config(config);
    let store = AssetStore::new(db, configuration.count_limit());

    AppState::new(configuration, store)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await
    };
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::get().uri($uri).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// Envelope and status mapping
// ============================================================================

#[actix_web::test]
async fn test_create_and_get_site() {
    let app = init_app!(setup_state(100).await);

    let (status, body) = post_json!(app, "/api/v1/sites", json!({"name": "Porto"}));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"]["name"], "Porto");
    assert_eq!(body["data"]["comment"], "");

    let (status, fetched) = get_json!(app, "/api/v1/sites/1");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], body["data"]);
}

#[actix_web::test]
async fn test_create_with_missing_fields_is_bad_request() {
    let app = init_app!(setup_state(100).await);

    let (status, body) = post_json!(app, "/api/v1/sites", json!({"comment": "no name"}));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 20002);
    assert_eq!(body["data"], json!(["name"]));
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let app = init_app!(setup_state(100).await);

    let req = test::TestRequest::post()
        .uri("/api/v1/sites")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 20002);
}

#[actix_web::test]
async fn test_invalid_query_and_path_are_bad_request() {
    let app = init_app!(setup_state(100).await);

    let (status, _) = get_json!(app, "/api/v1/sites?count=-1");
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json!(app, "/api/v1/sites/abc");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 20002);
}

#[actix_web::test]
async fn test_missing_entity_is_not_found() {
    let app = init_app!(setup_state(100).await);

    let (status, body) = get_json!(app, "/api/v1/sites/99");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 20004);
    assert_eq!(body["message"], "Site 99 not found");
}

#[actix_web::test]
async fn test_delete_returns_no_content_then_not_found() {
    let app = init_app!(setup_state(100).await);
    post_json!(app, "/api/v1/sites", json!({"name": "Porto"}));

    let req = test::TestRequest::delete()
        .uri("/api/v1/sites/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri("/api/v1/sites/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let (status, _) = get_json!(app, "/api/v1/sites/1");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// List contract
// ============================================================================

#[actix_web::test]
async fn test_count_is_clamped_to_ceiling() {
    let app = init_app!(setup_state(3).await);
    for name in ["a", "b", "c", "d", "e"] {
        post_json!(app, "/api/v1/sites", json!({"name": name}));
    }

    let (_, body) = get_json!(app, "/api/v1/sites?count=50");
    assert_eq!(ids(&body).len(), 3);

    let (_, body) = get_json!(app, "/api/v1/sites?count=2");
    assert_eq!(ids(&body).len(), 2);
}

#[actix_web::test]
async fn test_since_and_order() {
    let app = init_app!(setup_state(100).await);
    for name in ["a", "b", "c", "d"] {
        post_json!(app, "/api/v1/sites", json!({"name": name}));
    }

    let (_, body) = get_json!(app, "/api/v1/sites?since=2&order=asc");
    assert_eq!(ids(&body), vec![3, 4]);

    let (_, body) = get_json!(app, "/api/v1/sites?order=desc");
    assert_eq!(ids(&body), vec![4, 3, 2, 1]);

    let (_, body) = get_json!(app, "/api/v1/sites?since=4");
    assert!(ids(&body).is_empty());
}

#[actix_web::test]
async fn test_processes_of_zone() {
    let app = init_app!(setup_state(100).await);
    post_json!(app, "/api/v1/sites", json!({"name": "Porto"}));
    for zone in 1..=5 {
        post_json!(
            app,
            "/api/v1/sites/1/zones",
            json!({"name": format!("Zone {}", zone)})
        );
    }
    for (zone, name) in [(4, "Boiler"), (5, "Chiller"), (4, "Condenser")] {
        let (status, _) = post_json!(
            app,
            &format!("/api/v1/zones/{}/processes", zone),
            json!({"name": name})
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = get_json!(app, "/api/v1/zones/4/processes?order=asc");
    assert_eq!(ids(&body), vec![1, 3]);
    for process in body["data"].as_array().unwrap() {
        assert_eq!(process["zone_id"], 4);
    }
}

#[actix_web::test]
async fn test_create_zone_for_missing_site() {
    let app = init_app!(setup_state(100).await);

    let (status, body) = post_json!(app, "/api/v1/sites/7/zones", json!({"name": "Orphan"}));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 20011);
}

#[actix_web::test]
async fn test_cache_is_invalidated_by_writes() {
    let app = init_app!(setup_state(100).await);

    let (_, body) = get_json!(app, "/api/v1/sites");
    assert!(ids(&body).is_empty());

    post_json!(app, "/api/v1/sites", json!({"name": "Porto"}));

    let (_, body) = get_json!(app, "/api/v1/sites");
    assert_eq!(ids(&body), vec![1]);
}

// ============================================================================
// Tags, records and timeline
// ============================================================================

/// Site 1, zone 1, processes 1 and 2, server 1
macro_rules! seed_plant {
    ($app:expr) => {{
        post_json!($app, "/api/v1/sites", json!({"name": "Porto"}));
        post_json!($app, "/api/v1/sites/1/zones", json!({"name": "Boiler room"}));
        post_json!($app, "/api/v1/zones/1/processes", json!({"name": "Steam"}));
        post_json!($app, "/api/v1/zones/1/processes", json!({"name": "Condensate"}));
        post_json!($app, "/api/v1/servers", json!({"uid": "opc.tcp://plc-01:4840"}));
    }};
}

#[actix_web::test]
async fn test_tag_membership_and_icon_url() {
    let app = init_app!(setup_state(100).await);
    seed_plant!(app);

    let (status, body) = post_json!(
        app,
        "/api/v1/servers/1/tags",
        json!({"name": "TT-101", "alias": "Steam temperature", "icon": "Thermometer", "processes": [1, 2]})
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["server_id"], 1);
    let icon_url = body["data"]["icon_url"].as_str().unwrap();
    assert!(icon_url.starts_with("http://"));
    assert!(icon_url.ends_with("/static/icons/96/thermometer.png"));

    post_json!(
        app,
        "/api/v1/servers/1/tags",
        json!({"name": "PT-102", "alias": "Steam pressure", "processes": [1]})
    );

    let (_, body) = get_json!(app, "/api/v1/processes/1/tags?order=asc");
    assert_eq!(ids(&body), vec![1, 2]);
    assert!(body["data"][1].get("icon_url").is_none());

    let (_, body) = get_json!(app, "/api/v1/processes/2/tags");
    assert_eq!(ids(&body), vec![1]);

    let (_, body) = get_json!(app, "/api/v1/servers/1/tags");
    assert_eq!(ids(&body).len(), 2);
}

#[actix_web::test]
async fn test_tag_without_processes_is_bad_request() {
    let app = init_app!(setup_state(100).await);
    seed_plant!(app);

    let (status, body) = post_json!(
        app,
        "/api/v1/servers/1/tags",
        json!({"name": "TT-101", "alias": "Steam temperature"})
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"], json!(["processes"]));
}

#[actix_web::test]
async fn test_record_for_missing_tag() {
    let app = init_app!(setup_state(100).await);

    let (status, body) = post_json!(
        app,
        "/api/v1/tags/42/records",
        json!({"time_opc": "2018-10-01T08:00:00", "value": "1.0"})
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 20011);
    assert_eq!(body["message"], "referential integrity violated: tag 42 does not exist");

    let (_, body) = get_json!(app, "/api/v1/records");
    assert!(ids(&body).is_empty());
}

#[actix_web::test]
async fn test_records_and_timeline() {
    let app = init_app!(setup_state(100).await);
    seed_plant!(app);
    for name in ["TT-101", "PT-102"] {
        post_json!(
            app,
            "/api/v1/servers/1/tags",
            json!({"name": name, "alias": name, "processes": [1]})
        );
    }

    // Record ids 1..=5 land on tags 1, 2, 1, 2, 1
    for (tag, value) in [(1, "10"), (2, "11"), (1, "15"), (2, "30"), (1, "22")] {
        let (status, body) = post_json!(
            app,
            &format!("/api/v1/tags/{}/records", tag),
            json!({"time_opc": "2018-10-01T08:00:00", "value": value})
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["quality"], "Unknown");
    }

    let (status, body) = get_json!(app, "/api/v1/processes/1/timeline");
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["tag"]["id"], 1);
    assert_eq!(entries[0]["record"]["id"], 5);
    assert_eq!(entries[0]["record"]["value"], "22");
    assert_eq!(entries[1]["tag"]["id"], 2);
    assert_eq!(entries[1]["record"]["id"], 4);
    assert_eq!(entries[1]["record"]["value"], "30");

    let (_, body) = get_json!(app, "/api/v1/processes/2/timeline");
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = get_json!(app, "/api/v1/tags/2/records?order=asc");
    assert_eq!(ids(&body), vec![2, 4]);

    let (_, body) = get_json!(app, "/api/v1/records?tags=2&order=asc");
    assert_eq!(ids(&body), vec![2, 4]);

    let (_, body) = get_json!(app, "/api/v1/records?tags=1,2&count=3");
    assert_eq!(ids(&body).len(), 3);

    let (_, body) = get_json!(app, "/api/v1/records?tags=1&tags=2");
    assert_eq!(ids(&body).len(), 5);

    let (_, body) = get_json!(app, "/api/v1/processes/1/records");
    assert_eq!(ids(&body).len(), 5);

    let (status, _) = get_json!(app, "/api/v1/records?tags=abc");
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_cached_record_is_dropped_on_delete() {
    let app = init_app!(setup_state(100).await);
    seed_plant!(app);
    post_json!(
        app,
        "/api/v1/servers/1/tags",
        json!({"name": "TT-101", "alias": "Steam temperature", "processes": [1]})
    );
    post_json!(
        app,
        "/api/v1/tags/1/records",
        json!({"time_opc": "2018-10-01T08:00:00", "value": "81.5"})
    );

    let (status, first) = get_json!(app, "/api/v1/records/1");
    assert_eq!(status, StatusCode::OK);
    let (_, second) = get_json!(app, "/api/v1/records/1");
    assert_eq!(first, second);
    assert_eq!(second["data"]["value"], "81.5");

    let req = test::TestRequest::delete()
        .uri("/api/v1/records/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let (status, body) = get_json!(app, "/api/v1/records/1");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 20004);
}

#[actix_web::test]
async fn test_delete_server_cascades_to_tags() {
    let app = init_app!(setup_state(100).await);
    seed_plant!(app);
    post_json!(
        app,
        "/api/v1/servers/1/tags",
        json!({"name": "TT-101", "alias": "Steam temperature", "processes": [1]})
    );

    let req = test::TestRequest::delete()
        .uri("/api/v1/servers/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let (status, _) = get_json!(app, "/api/v1/tags/1");
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get_json!(app, "/api/v1/processes/1/tags");
    assert!(ids(&body).is_empty());
}

// ============================================================================
// Labels and health
// ============================================================================

#[actix_web::test]
async fn test_qrcode_labels() {
    let app = init_app!(setup_state(100).await);
    seed_plant!(app);

    let req = test::TestRequest::get()
        .uri("/api/v1/processes/1/qrcode")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "image/png"
    );
    let png = test::read_body(resp).await;
    assert!(png.starts_with(b"\x89PNG"));

    let (status, body) = get_json!(app, "/api/v1/processes/9/qrcode");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 20004);

    let (status, _) = get_json!(app, "/api/v1/tags/1/qrcode");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!(setup_state(100).await);

    let (status, body) = get_json!(app, "/api/v1/health");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "UP");
}
