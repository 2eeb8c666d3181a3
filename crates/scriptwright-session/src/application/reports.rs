//! Outcomes reported by orchestrator operations.

use scriptwright_core::error::EditorError;

/// What happened to a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was applied to the session.
    Applied,
    /// The session moved on while the request was in flight; the response
    /// was discarded.
    Superseded,
}

/// Per-branch result of `ScriptStore::open_script`. Each branch succeeds or
/// fails on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenScriptReport {
    /// The authoritative script summary fetch.
    pub summary: Result<LoadOutcome, EditorError>,
    /// The chapter index fetch.
    pub chapter_index: Result<LoadOutcome, EditorError>,
    /// The asset manifest fetch.
    pub asset_manifest: Result<LoadOutcome, EditorError>,
}

impl OpenScriptReport {
    /// Failed branches, in summary / chapter index / asset manifest order.
    #[must_use]
    pub fn failures(&self) -> Vec<&EditorError> {
        [&self.summary, &self.chapter_index, &self.asset_manifest]
            .into_iter()
            .filter_map(|branch| branch.as_ref().err())
            .collect()
    }

    /// Returns `true` if every branch was fetched and applied.
    #[must_use]
    pub fn is_fully_applied(&self) -> bool {
        [&self.summary, &self.chapter_index, &self.asset_manifest]
            .into_iter()
            .all(|branch| matches!(branch, Ok(LoadOutcome::Applied)))
    }
}
