//! Scriptwright Core: shared abstractions for the script editor.
//!
//! This crate defines the records exchanged with the remote document store,
//! the error taxonomy shared by every layer, and the `DocumentStore` boundary
//! trait. It contains no infrastructure code.

pub mod error;
pub mod model;
pub mod store;
