//! Shared test doubles and utilities for Scriptwright.

mod fake_server;
mod store;

pub use fake_server::{router, spawn};
pub use store::{Endpoint, FailingDocumentStore, InMemoryDocumentStore, StoreCall};
