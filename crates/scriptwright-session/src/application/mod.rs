//! Operations against the remote document store.

pub mod orchestrator;
pub mod reports;
