//! HTTP client for the settings resource.
mod_use::mod_use![error, non_blocking];
