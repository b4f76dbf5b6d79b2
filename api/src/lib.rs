mod_use::mod_use![error, model];

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod server;
