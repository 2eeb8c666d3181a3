//! Scriptwright: editing session orchestration.
//!
//! Owns the state of one editing session (known scripts, the active script,
//! its chapter index, asset manifest and characters, and the open chapter)
//! and keeps it in step with the remote document store.

pub mod application;
pub mod domain;

pub use application::orchestrator::ScriptStore;
pub use application::reports::{LoadOutcome, OpenScriptReport};
pub use domain::session::{EditingSession, LoadStatus, OpenChapter};
