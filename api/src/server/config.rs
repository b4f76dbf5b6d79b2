//! API config.

use std::net::SocketAddr;

use color_eyre::Result;
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// API config.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Config {
    /// Bind address for API server.
    pub bind: SocketAddr,
    /// MongoDB connection string.
    pub mongo_uri: String,
    /// MongoDB database name.
    pub mongo_db: String,
    /// MongoDB collection holding the settings record.
    pub mongo_collection: String,
    /// Keep settings in memory instead of MongoDB. Nothing survives a restart.
    pub in_memory: bool,
}

impl Config {
    /// Load config from environment variables.
    ///
    /// # Errors
    /// Returns error if part of the config is invalid.
    pub fn from_env() -> Result<Self> {
        Ok(Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("SETTINGS_"))
            .extract()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            mongo_uri: String::from("mongodb://localhost:27017"),
            mongo_db: String::from("buildcore"),
            mongo_collection: String::from("settings"),
            in_memory: false,
        }
    }
}
