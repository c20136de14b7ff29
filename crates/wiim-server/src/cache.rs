//! In-memory response caching
//!
//! Serialized JSON bodies of entity GETs are cached per request URL for a
//! short TTL and dropped wholesale on any write. Rendered QR labels are
//! immutable per payload and live much longer.

use std::time::Duration;

use actix_web::web::Bytes;
use moka::sync::Cache;

const JSON_CAPACITY: u64 = 10_000;
const LABEL_CAPACITY: u64 = 1_000;
pub const LABEL_TTL_SECONDS: u64 = 3600;

#[derive(Clone)]
pub struct ResponseCache {
    json: Option<Cache<String, Bytes>>,
    labels: Cache<String, Bytes>,
}

impl ResponseCache {
    /// `timeout_seconds` of zero disables JSON caching
    pub fn new(timeout_seconds: u64) -> Self {
        let json = (timeout_seconds > 0).then(|| {
            Cache::builder()
                .max_capacity(JSON_CAPACITY)
                .time_to_live(Duration::from_secs(timeout_seconds))
                .build()
        });
        let labels = Cache::builder()
            .max_capacity(LABEL_CAPACITY)
            .time_to_live(Duration::from_secs(LABEL_TTL_SECONDS))
            .build();

        Self { json, labels }
    }

    pub fn json(&self, key: &str) -> Option<Bytes> {
        self.json.as_ref().and_then(|cache| cache.get(key))
    }

    pub fn insert_json(&self, key: String, body: Bytes) {
        if let Some(cache) = &self.json {
            cache.insert(key, body);
        }
    }

    /// Drop every cached JSON body
    pub fn invalidate(&self) {
        if let Some(cache) = &self.json {
            cache.invalidate_all();
        }
    }

    pub fn label(&self, payload: &str) -> Option<Bytes> {
        self.labels.get(payload)
    }

    pub fn insert_label(&self, payload: String, png: Bytes) {
        self.labels.insert(payload, png);
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("json_enabled", &self.json.is_some())
            .field("labels", &self.labels.entry_count())
            .finish()
    }
}
