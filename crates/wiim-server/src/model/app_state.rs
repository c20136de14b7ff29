//! Application state shared across all handlers

use wiim_persistence::AssetStore;

use crate::cache::ResponseCache;

use super::config::Configuration;

#[derive(Clone)]
pub struct AppState {
    pub configuration: Configuration,
    pub store: AssetStore,
    pub cache: ResponseCache,
}

impl AppState {
    pub fn new(configuration: Configuration, store: AssetStore) -> Self {
        let cache = ResponseCache::new(configuration.cache_timeout());
        Self {
            configuration,
            store,
            cache,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &self.configuration)
            .field("store", &"<AssetStore>")
            .field("cache", &self.cache)
            .finish()
    }
}
