//! Scriptwright: HTTP client for the remote document store.
//!
//! `HttpDocumentStore` implements `DocumentStore` over the store's REST API.
//! `RemoteConfig` reads where that API lives from the environment.

pub mod config;
pub mod http;

pub use config::{ConfigError, RemoteConfig};
pub use http::HttpDocumentStore;
