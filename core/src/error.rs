//! Errors for the core library.
use thiserror::Error;

/// Errors that may occur while reading or writing the settings record.
///
/// Callers are not expected to tell these apart: every variant is a storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB driver failed, e.g. on connection loss or a rejected write.
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    /// The record can't be converted into a BSON document.
    #[error("BSON serialize error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),
    /// An upsert reported success but returned no document.
    #[error("Settings record missing after upsert")]
    Vanished,
    /// The in-memory store is switched into failing mode.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
