//! Context of the server. Contains the configuration and the settings store.
use std::sync::Arc;

use color_eyre::Result;
use sc_core::store::{memory::MemoryStore, MongoStore, SettingsStore};

use crate::server::config::Config;

/// Context being shared between handlers. This will be cloned every time a handler is called,
/// so everything inside is behind an [`Arc`].
#[must_use]
#[derive(Clone)]
pub struct Context {
    /// Config.
    pub(crate) config: Arc<Config>,
    /// Settings store.
    store: Arc<dyn SettingsStore>,
}

impl Context {
    /// # Errors
    /// Fail on invalid database url.
    pub async fn new(config: Arc<Config>) -> Result<Self> {
        let store: Arc<dyn SettingsStore> = if config.in_memory {
            tracing::warn!("Using in-memory settings store, changes are lost on restart");
            Arc::new(MemoryStore::default())
        } else {
            Arc::new(
                MongoStore::connect(&config.mongo_uri, &config.mongo_db, &config.mongo_collection)
                    .await?,
            )
        };

        Ok(Self::new_with_store(store, config))
    }

    /// Construct self with a ready store.
    pub fn new_with_store(store: Arc<dyn SettingsStore>, config: Arc<Config>) -> Self {
        Self { config, store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
