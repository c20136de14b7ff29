//! Shared fixtures for the persistence integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ConnectOptions, Database};
use wiim_common::WiimError;
use wiim_migration::{Migrator, MigratorTrait};
use wiim_persistence::{AssetStore, NewProcess, NewRecord, NewServer, NewSite, NewTag, NewZone};

/// A migrated in-memory SQLite store
///
/// The pool holds a single connection so every query sees the same memory
/// database.
pub async fn setup_store(count_limit: u64) -> AssetStore {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    AssetStore::new(db, count_limit)
}

pub fn kind(err: anyhow::Error) -> WiimError {
    err.downcast::<WiimError>().unwrap()
}

pub fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 10, 1)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

pub async fn site(store: &AssetStore, name: &str) -> i32 {
    let req = NewSite {
        name: name.to_string(),
        comment: String::new(),
    };
    store.sites.create(req).await.unwrap().id
}

pub async fn zone(store: &AssetStore, name: &str, site_id: i32) -> i32 {
    let req = NewZone {
        name: name.to_string(),
        comment: String::new(),
        site_id,
    };
    store.zones.create(req).await.unwrap().id
}

pub async fn process(store: &AssetStore, name: &str, zone_id: i32) -> i32 {
    let req = NewProcess {
        name: name.to_string(),
        comment: None,
        zone_id,
    };
    store.processes.create(req).await.unwrap().id
}

pub async fn server(store: &AssetStore, uid: &str) -> i32 {
    let req = NewServer {
        uid: uid.to_string(),
    };
    store.servers.create(req).await.unwrap().id
}

pub fn new_tag(name: &str, server_id: i32, processes: Vec<i32>) -> NewTag {
    NewTag {
        name: name.to_string(),
        alias: format!("{} alias", name),
        comment: None,
        unit: Some("degC".to_string()),
        icon: Some("Thermometer".to_string()),
        server_id,
        processes,
    }
}

pub async fn tag(store: &AssetStore, name: &str, server_id: i32, processes: Vec<i32>) -> i32 {
    store
        .tags
        .create(new_tag(name, server_id, processes))
        .await
        .unwrap()
        .id
}

pub async fn record(store: &AssetStore, tag_id: i32, value: &str, time_opc: NaiveDateTime) -> i32 {
    let req = NewRecord {
        time_opc: Some(time_opc),
        value: Some(value.to_string()),
        quality: Some("Good".to_string()),
        tag_id,
    };
    store.records.create(req).await.unwrap().id
}

/// One site, zone and process plus a server, ready for tags
pub struct Plant {
    pub site_id: i32,
    pub zone_id: i32,
    pub process_id: i32,
    pub server_id: i32,
}

pub async fn plant(store: &AssetStore) -> Plant {
    let site_id = site(store, "Porto").await;
    let zone_id = zone(store, "Boiler room", site_id).await;
    let process_id = process(store, "Steam generation", zone_id).await;
    let server_id = server(store, "opc.tcp://plc-01:4840").await;

    Plant {
        site_id,
        zone_id,
        process_id,
        server_id,
    }
}
