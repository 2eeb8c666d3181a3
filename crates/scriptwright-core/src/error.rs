//! Error types shared by the schema registry, the orchestrator and the
//! document store boundary.

use std::fmt;

use thiserror::Error;

/// A remote resource addressed by the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// `GET /scripts`
    ScriptList,
    /// `GET /scripts/{id}`
    Script(String),
    /// `GET /scripts/{id}/chapters`
    ChapterIndex(String),
    /// `GET /scripts/{id}/assets`
    AssetManifest(String),
    /// `GET|POST|DELETE /scripts/{id}/chapters/{path}`
    Chapter {
        /// Owning script.
        script_id: String,
        /// Chapter path relative to the script's chapter root.
        path: String,
    },
    /// `GET /scripts/{id}/characters`
    Characters(String),
    /// `POST /scripts/create`
    NewScript(String),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScriptList => write!(f, "script list"),
            Self::Script(id) => write!(f, "script {id}"),
            Self::ChapterIndex(id) => write!(f, "chapter index of script {id}"),
            Self::AssetManifest(id) => write!(f, "asset manifest of script {id}"),
            Self::Chapter { script_id, path } => write!(f, "chapter {path} of script {script_id}"),
            Self::Characters(id) => write!(f, "characters of script {id}"),
            Self::NewScript(name) => write!(f, "new script {name}"),
        }
    }
}

/// Failure reported by a `DocumentStore` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store answered 404.
    #[error("not found")]
    NotFound,

    /// The store answered with a non-success status.
    #[error("status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body did not decode into the expected record.
    #[error("decode error: {0}")]
    Decode(String),
}

/// A piece of session state a save needs but the session does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSlot {
    /// No active script, or the active script has no id yet.
    ActiveScriptId,
    /// No chapter is open.
    OpenChapter,
}

impl fmt::Display for SessionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActiveScriptId => write!(f, "active script id"),
            Self::OpenChapter => write!(f, "open chapter"),
        }
    }
}

/// Top-level editor error type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// The event kind is not registered.
    #[error("unknown event kind: {0}")]
    UnknownEventKind(String),

    /// A field failed validation against its event kind's schema.
    #[error("missing or invalid field {key}: {reason}")]
    MissingOrInvalidField {
        /// The offending field key.
        key: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A read endpoint failed.
    #[error("failed to fetch {resource}: {source}")]
    RemoteFetchFailed {
        /// The resource that could not be fetched.
        resource: Resource,
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },

    /// A write endpoint failed.
    #[error("failed to save {resource}: {source}")]
    RemoteSaveFailed {
        /// The resource that could not be written.
        resource: Resource,
        /// The underlying store failure.
        #[source]
        source: StoreError,
    },

    /// A save was attempted without an open script and chapter.
    #[error("cannot save: no {missing}")]
    SavePreconditionUnmet {
        /// The missing piece of session state.
        missing: SessionSlot,
    },

    /// The operation needs an active script and there is none.
    #[error("no active script")]
    NoActiveScript,

    /// A chapter was requested for a script the session is not bound to.
    #[error("script {0} is not open")]
    ScriptNotOpen(String),
}

impl EditorError {
    /// Wraps a read failure for `resource`.
    #[must_use]
    pub fn fetch(resource: Resource, source: StoreError) -> Self {
        Self::RemoteFetchFailed { resource, source }
    }

    /// Wraps a write failure for `resource`.
    #[must_use]
    pub fn save(resource: Resource, source: StoreError) -> Self {
        Self::RemoteSaveFailed { resource, source }
    }
}
