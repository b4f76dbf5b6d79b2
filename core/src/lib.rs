//! Core definitions and storage for the settings service.
#![allow(clippy::module_name_repetitions)]
#![deny(missing_docs)]

pub mod error;
pub mod models;
pub mod store;
