//! The document store orchestrator.
//!
//! `ScriptStore` is the only writer of the `EditingSession`. Each operation
//! is an async unit of work that suspends only while awaiting the remote
//! store; every state change it makes is a single `watch` update. Responses
//! that arrive after the session has moved on (another script opened, a newer
//! chapter requested) are discarded and reported as `LoadOutcome::Superseded`.

use std::sync::Arc;

use scriptwright_core::error::{EditorError, Resource};
use scriptwright_core::model::{ChapterContent, CreateScriptRequest, WriteAck};
use scriptwright_core::store::DocumentStore;
use tokio::sync::watch;

use crate::application::reports::{LoadOutcome, OpenScriptReport};
use crate::domain::session::{EditingSession, Ticket};

/// Owns one editing session and synchronises it with a document store.
///
/// Created when an editing session starts and dropped when it ends.
pub struct ScriptStore {
    remote: Arc<dyn DocumentStore>,
    session: watch::Sender<EditingSession>,
}

impl ScriptStore {
    /// Starts an empty session against `remote`.
    #[must_use]
    pub fn new(remote: Arc<dyn DocumentStore>) -> Self {
        let (session, _) = watch::channel(EditingSession::default());
        Self { remote, session }
    }

    /// Subscribes to session changes. Receivers only ever observe fully
    /// applied transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EditingSession> {
        self.session.subscribe()
    }

    /// A copy of the current session state.
    #[must_use]
    pub fn snapshot(&self) -> EditingSession {
        self.session.borrow().clone()
    }

    /// Reads the current session state without copying it. `read` must not
    /// block.
    pub fn read<R>(&self, read: impl FnOnce(&EditingSession) -> R) -> R {
        read(&*self.session.borrow())
    }

    /// Replaces the known script list with the store's listing.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::RemoteFetchFailed` if the listing cannot be
    /// fetched; the known scripts are left unchanged.
    pub async fn refresh_script_list(&self) -> Result<usize, EditorError> {
        match self.remote.list_scripts().await {
            Ok(scripts) => {
                let count = scripts.len();
                self.session
                    .send_modify(|session| session.replace_known_scripts(scripts));
                tracing::info!(count, "script list refreshed");
                Ok(count)
            }
            Err(source) => {
                tracing::warn!(%source, "failed to fetch script list");
                Err(EditorError::fetch(Resource::ScriptList, source))
            }
        }
    }

    /// Opens `script_id`: shows its cached summary straight away, fetches the
    /// authoritative summary, then fetches the chapter index and the asset
    /// manifest concurrently. Each of the three fetches fails on its own and
    /// a failed branch leaves its part of the session as it was.
    pub async fn open_script(&self, script_id: &str) -> OpenScriptReport {
        tracing::info!(script_id, "opening script");
        let mut ticket = Ticket::default();
        self.session
            .send_modify(|session| ticket = session.begin_open(script_id));

        let summary = match self.remote.get_script(script_id).await {
            Ok(summary) => Ok(self.apply_for_script(ticket, |session| {
                session.set_active_script(summary);
            })),
            Err(source) => {
                tracing::warn!(script_id, %source, "failed to fetch script summary");
                Err(EditorError::fetch(Resource::Script(script_id.to_owned()), source))
            }
        };

        let chapter_index = async {
            match self.remote.list_chapters(script_id).await {
                Ok(paths) => Ok(self.apply_for_script(ticket, |session| {
                    session.set_chapter_paths(paths);
                })),
                Err(source) => {
                    tracing::warn!(script_id, %source, "failed to fetch chapter index");
                    let reason = source.to_string();
                    self.apply_for_script(ticket, |session| session.chapter_index_failed(reason));
                    Err(EditorError::fetch(
                        Resource::ChapterIndex(script_id.to_owned()),
                        source,
                    ))
                }
            }
        };
        let asset_manifest = async {
            match self.remote.get_assets(script_id).await {
                Ok(manifest) => Ok(self.apply_for_script(ticket, |session| {
                    session.set_asset_manifest(manifest);
                })),
                Err(source) => {
                    tracing::warn!(script_id, %source, "failed to fetch asset manifest");
                    let reason = source.to_string();
                    self.apply_for_script(ticket, |session| session.asset_manifest_failed(reason));
                    Err(EditorError::fetch(
                        Resource::AssetManifest(script_id.to_owned()),
                        source,
                    ))
                }
            }
        };
        let (chapter_index, asset_manifest) = tokio::join!(chapter_index, asset_manifest);

        let report = OpenScriptReport {
            summary,
            chapter_index,
            asset_manifest,
        };
        tracing::info!(
            script_id,
            failures = report.failures().len(),
            "script opened"
        );
        report
    }

    /// Fetches chapter `path` of `script_id` and, on success, makes it the
    /// open chapter. Path and content are replaced together.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::ScriptNotOpen`, without contacting the store, if
    /// the session is not bound to `script_id`. Returns
    /// `EditorError::RemoteFetchFailed` if the chapter cannot be fetched; the
    /// open chapter is left unchanged.
    pub async fn open_chapter(
        &self,
        script_id: &str,
        path: &str,
    ) -> Result<LoadOutcome, EditorError> {
        tracing::info!(script_id, path, "opening chapter");
        let mut ticket = None;
        self.session.send_if_modified(|session| {
            ticket = session.begin_chapter_load(script_id);
            ticket.is_some()
        });
        let Some(ticket) = ticket else {
            tracing::warn!(script_id, path, "refused chapter of a script that is not open");
            return Err(EditorError::ScriptNotOpen(script_id.to_owned()));
        };

        match self.remote.get_chapter(script_id, path).await {
            Ok(content) => {
                let outcome = self.apply_for_chapter(ticket, |session| {
                    session.set_open_chapter(path.to_owned(), content);
                });
                if outcome == LoadOutcome::Superseded {
                    tracing::warn!(script_id, path, "discarded superseded chapter response");
                }
                Ok(outcome)
            }
            Err(source) => {
                tracing::warn!(script_id, path, %source, "failed to fetch chapter");
                let reason = source.to_string();
                self.apply_for_chapter(ticket, |session| session.chapter_failed(reason));
                Err(EditorError::fetch(
                    Resource::Chapter {
                        script_id: script_id.to_owned(),
                        path: path.to_owned(),
                    },
                    source,
                ))
            }
        }
    }

    /// Submits the open chapter to the store under the active script. The
    /// session is not modified, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::SavePreconditionUnmet`, without contacting the
    /// store, if there is no active script id or no open chapter. Returns
    /// `EditorError::RemoteSaveFailed` if the store rejects the save.
    pub async fn save_open_chapter(&self) -> Result<WriteAck, EditorError> {
        let (script_id, path, content) = self.read(EditingSession::save_target)?;

        match self.remote.save_chapter(&script_id, &path, &content).await {
            Ok(ack) => {
                tracing::info!(%script_id, %path, "chapter saved");
                Ok(ack)
            }
            Err(source) => {
                tracing::error!(%script_id, %path, %source, "failed to save chapter");
                Err(EditorError::save(Resource::Chapter { script_id, path }, source))
            }
        }
    }

    /// Creates a script in the store and refreshes the script list. Returns
    /// the new script's id.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::RemoteSaveFailed` if the store rejects the
    /// creation. A failed list refresh afterwards is only logged.
    pub async fn create_script(&self, request: &CreateScriptRequest) -> Result<String, EditorError> {
        let response = self
            .remote
            .create_script(request)
            .await
            .map_err(|source| {
                tracing::error!(name = %request.name, %source, "failed to create script");
                EditorError::save(Resource::NewScript(request.name.clone()), source)
            })?;
        tracing::info!(script_id = %response.script_id, "script created");

        if let Err(err) = self.refresh_script_list().await {
            tracing::warn!(%err, "script list is stale after creating a script");
        }
        Ok(response.script_id)
    }

    /// Deletes chapter `path` of the active script. On success the path
    /// leaves the chapter index, and the open chapter is closed if it was
    /// that path.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::NoActiveScript` if no script with an id is
    /// active, or `EditorError::RemoteSaveFailed` if the store rejects the
    /// deletion; the session is then left unchanged.
    pub async fn delete_chapter(&self, path: &str) -> Result<(), EditorError> {
        let script_id = self
            .read(|session| session.active_script_id().map(str::to_owned))
            .ok_or(EditorError::NoActiveScript)?;

        self.remote
            .delete_chapter(&script_id, path)
            .await
            .map_err(|source| {
                tracing::error!(%script_id, path, %source, "failed to delete chapter");
                EditorError::save(
                    Resource::Chapter {
                        script_id: script_id.clone(),
                        path: path.to_owned(),
                    },
                    source,
                )
            })?;

        self.session.send_if_modified(|session| {
            if session.active_script_id() == Some(script_id.as_str()) {
                session.remove_chapter(path);
                true
            } else {
                false
            }
        });
        tracing::info!(%script_id, path, "chapter deleted");
        Ok(())
    }

    /// Loads the character profiles of the active script.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::NoActiveScript` if no script is bound, or
    /// `EditorError::RemoteFetchFailed` if the profiles cannot be fetched;
    /// the previous profiles are then kept.
    pub async fn refresh_characters(&self) -> Result<LoadOutcome, EditorError> {
        let (script_id, ticket) = self
            .read(|session| {
                session
                    .bound_script_id()
                    .map(|id| (id.to_owned(), session.ticket()))
            })
            .ok_or(EditorError::NoActiveScript)?;

        match self.remote.list_characters(&script_id).await {
            Ok(characters) => Ok(self.apply_for_script(ticket, |session| {
                session.set_characters(characters);
            })),
            Err(source) => {
                tracing::warn!(%script_id, %source, "failed to fetch characters");
                Err(EditorError::fetch(Resource::Characters(script_id), source))
            }
        }
    }

    /// Makes `content` the open chapter under `path` without fetching it,
    /// ready for `save_open_chapter`. Used to start a chapter the store does
    /// not have yet.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::NoActiveScript` if no script is bound.
    pub fn stage_chapter(&self, path: &str, content: ChapterContent) -> Result<(), EditorError> {
        if self.read(|session| session.bound_script_id().is_none()) {
            return Err(EditorError::NoActiveScript);
        }
        self.session
            .send_modify(|session| session.stage_chapter(path.to_owned(), content));
        tracing::info!(path, "chapter staged");
        Ok(())
    }

    /// Applies a local edit to the open chapter's content. Returns `false`
    /// if no chapter is open.
    pub fn edit_open_chapter(&self, edit: impl FnOnce(&mut ChapterContent)) -> bool {
        self.session
            .send_if_modified(|session| session.edit_open_chapter(edit))
    }

    /// Leaves the active script; only the known script list survives.
    /// Responses still in flight for the old script are discarded.
    pub fn close_script(&self) {
        self.session.send_modify(EditingSession::close_script);
        tracing::info!("script closed");
    }

    fn apply_for_script(
        &self,
        ticket: Ticket,
        apply: impl FnOnce(&mut EditingSession),
    ) -> LoadOutcome {
        self.apply_if(ticket, EditingSession::is_script_current, apply)
    }

    fn apply_for_chapter(
        &self,
        ticket: Ticket,
        apply: impl FnOnce(&mut EditingSession),
    ) -> LoadOutcome {
        self.apply_if(ticket, EditingSession::is_chapter_current, apply)
    }

    fn apply_if(
        &self,
        ticket: Ticket,
        is_current: fn(&EditingSession, Ticket) -> bool,
        apply: impl FnOnce(&mut EditingSession),
    ) -> LoadOutcome {
        let mut outcome = LoadOutcome::Superseded;
        self.session.send_if_modified(|session| {
            if is_current(session, ticket) {
                apply(session);
                outcome = LoadOutcome::Applied;
                true
            } else {
                false
            }
        });
        outcome
    }
}
