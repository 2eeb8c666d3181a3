//! The editing session: everything the editor currently has loaded.
//!
//! Every mutating method here is one atomic step; the orchestrator applies
//! each inside a single `watch` update so readers never see a half-applied
//! transition.

use scriptwright_core::error::{EditorError, SessionSlot};
use scriptwright_core::model::{AssetManifest, ChapterContent, CharacterProfile, ScriptSummary};

/// Load state of a resource fetched for the active script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Never requested for the current script.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request succeeded.
    Loaded,
    /// The last request failed; the previous value was kept.
    Failed(String),
}

/// The chapter open in the editor. Path and content only ever change
/// together.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenChapter {
    /// Chapter path the content was fetched for.
    pub path: String,
    /// The chapter's content, including local edits.
    pub content: ChapterContent,
}

/// Generation counters captured when a request is issued. A response is
/// applied only if the counters it depends on have not moved since.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticket {
    pub(crate) script: u64,
    pub(crate) chapter: u64,
}

/// State of one editing session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditingSession {
    known_scripts: Vec<ScriptSummary>,
    bound_script_id: Option<String>,
    active_script: Option<ScriptSummary>,
    chapter_paths: Vec<String>,
    chapter_index_status: LoadStatus,
    asset_manifest: AssetManifest,
    asset_manifest_status: LoadStatus,
    characters: Vec<CharacterProfile>,
    open_chapter: Option<OpenChapter>,
    chapter_status: LoadStatus,
    script_generation: u64,
    chapter_generation: u64,
}

impl EditingSession {
    /// Scripts listed by the last successful refresh.
    #[must_use]
    pub fn known_scripts(&self) -> &[ScriptSummary] {
        &self.known_scripts
    }

    /// Id of the script the session is bound to, set as soon as it is
    /// opened even if its summary has not arrived yet.
    #[must_use]
    pub fn bound_script_id(&self) -> Option<&str> {
        self.bound_script_id.as_deref()
    }

    /// The active script's summary.
    #[must_use]
    pub fn active_script(&self) -> Option<&ScriptSummary> {
        self.active_script.as_ref()
    }

    /// Store id of the active script, if it has one.
    #[must_use]
    pub fn active_script_id(&self) -> Option<&str> {
        self.active_script.as_ref().and_then(|script| script.id.as_deref())
    }

    /// Chapter paths of the active script.
    #[must_use]
    pub fn chapter_paths(&self) -> &[String] {
        &self.chapter_paths
    }

    /// Load state of the chapter index.
    #[must_use]
    pub fn chapter_index_status(&self) -> &LoadStatus {
        &self.chapter_index_status
    }

    /// Assets of the active script.
    #[must_use]
    pub fn asset_manifest(&self) -> &AssetManifest {
        &self.asset_manifest
    }

    /// Load state of the asset manifest.
    #[must_use]
    pub fn asset_manifest_status(&self) -> &LoadStatus {
        &self.asset_manifest_status
    }

    /// Character profiles of the active script.
    #[must_use]
    pub fn characters(&self) -> &[CharacterProfile] {
        &self.characters
    }

    /// The open chapter.
    #[must_use]
    pub fn open_chapter(&self) -> Option<&OpenChapter> {
        self.open_chapter.as_ref()
    }

    /// Path of the open chapter.
    #[must_use]
    pub fn open_chapter_path(&self) -> Option<&str> {
        self.open_chapter.as_ref().map(|chapter| chapter.path.as_str())
    }

    /// Content of the open chapter.
    #[must_use]
    pub fn open_chapter_content(&self) -> Option<&ChapterContent> {
        self.open_chapter.as_ref().map(|chapter| &chapter.content)
    }

    /// Load state of the most recent chapter request.
    #[must_use]
    pub fn chapter_status(&self) -> &LoadStatus {
        &self.chapter_status
    }

    pub(crate) fn ticket(&self) -> Ticket {
        Ticket {
            script: self.script_generation,
            chapter: self.chapter_generation,
        }
    }

    pub(crate) fn is_script_current(&self, ticket: Ticket) -> bool {
        self.script_generation == ticket.script
    }

    pub(crate) fn is_chapter_current(&self, ticket: Ticket) -> bool {
        self.chapter_generation == ticket.chapter
    }

    pub(crate) fn replace_known_scripts(&mut self, scripts: Vec<ScriptSummary>) {
        self.known_scripts = scripts;
    }

    /// Binds the session to `script_id`. Switching to a different script
    /// drops everything loaded for the previous one; re-opening the bound
    /// script keeps its data until fresh values arrive. A cached summary from
    /// `known_scripts` becomes the active script straight away.
    pub(crate) fn begin_open(&mut self, script_id: &str) -> Ticket {
        let switching = self.bound_script_id.as_deref() != Some(script_id);
        self.script_generation += 1;

        if switching {
            self.chapter_generation += 1;
            self.active_script = None;
            self.chapter_paths.clear();
            self.asset_manifest = AssetManifest::default();
            self.characters.clear();
            self.open_chapter = None;
            self.chapter_status = LoadStatus::Idle;
            self.bound_script_id = Some(script_id.to_owned());
        }

        if let Some(cached) = self.known_scripts.iter().find(|s| s.has_id(script_id)) {
            self.active_script = Some(cached.clone());
        }
        self.chapter_index_status = LoadStatus::Pending;
        self.asset_manifest_status = LoadStatus::Pending;

        self.ticket()
    }

    pub(crate) fn set_active_script(&mut self, summary: ScriptSummary) {
        self.active_script = Some(summary);
    }

    pub(crate) fn set_chapter_paths(&mut self, paths: Vec<String>) {
        self.chapter_paths = paths;
        self.chapter_index_status = LoadStatus::Loaded;
    }

    pub(crate) fn chapter_index_failed(&mut self, reason: String) {
        self.chapter_index_status = LoadStatus::Failed(reason);
    }

    pub(crate) fn set_asset_manifest(&mut self, manifest: AssetManifest) {
        self.asset_manifest = manifest;
        self.asset_manifest_status = LoadStatus::Loaded;
    }

    pub(crate) fn asset_manifest_failed(&mut self, reason: String) {
        self.asset_manifest_status = LoadStatus::Failed(reason);
    }

    pub(crate) fn set_characters(&mut self, characters: Vec<CharacterProfile>) {
        self.characters = characters;
    }

    /// Starts a chapter request for `script_id`; any older chapter request
    /// becomes stale. Returns `None`, leaving the session untouched, unless
    /// the session is bound to `script_id`.
    pub(crate) fn begin_chapter_load(&mut self, script_id: &str) -> Option<Ticket> {
        if self.bound_script_id.as_deref() != Some(script_id) {
            return None;
        }
        self.chapter_generation += 1;
        self.chapter_status = LoadStatus::Pending;
        Some(self.ticket())
    }

    pub(crate) fn set_open_chapter(&mut self, path: String, content: ChapterContent) {
        self.open_chapter = Some(OpenChapter { path, content });
        self.chapter_status = LoadStatus::Loaded;
    }

    pub(crate) fn chapter_failed(&mut self, reason: String) {
        self.chapter_status = LoadStatus::Failed(reason);
    }

    /// Opens `content` as chapter `path` without fetching it. Any chapter
    /// request still in flight becomes stale.
    pub(crate) fn stage_chapter(&mut self, path: String, content: ChapterContent) {
        self.chapter_generation += 1;
        self.set_open_chapter(path, content);
    }

    /// Removes `path` from the chapter index, closing it if it is open.
    /// Returns `true` if the open chapter was closed.
    pub(crate) fn remove_chapter(&mut self, path: &str) -> bool {
        self.chapter_paths.retain(|known| known != path);
        if self.open_chapter_path() == Some(path) {
            self.chapter_generation += 1;
            self.open_chapter = None;
            self.chapter_status = LoadStatus::Idle;
            true
        } else {
            false
        }
    }

    /// Applies a local edit to the open chapter. Returns `false` if no
    /// chapter is open.
    pub(crate) fn edit_open_chapter(&mut self, edit: impl FnOnce(&mut ChapterContent)) -> bool {
        match self.open_chapter.as_mut() {
            Some(chapter) => {
                edit(&mut chapter.content);
                true
            }
            None => false,
        }
    }

    /// Returns to the unopened state, keeping only the script list.
    pub(crate) fn close_script(&mut self) {
        let known_scripts = std::mem::take(&mut self.known_scripts);
        *self = Self {
            known_scripts,
            script_generation: self.script_generation + 1,
            chapter_generation: self.chapter_generation + 1,
            ..Self::default()
        };
    }

    /// The `(script id, chapter path, content)` a save would submit.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::SavePreconditionUnmet` if there is no active
    /// script id or no open chapter.
    pub fn save_target(&self) -> Result<(String, String, ChapterContent), EditorError> {
        let script_id = self.active_script_id().ok_or(EditorError::SavePreconditionUnmet {
            missing: SessionSlot::ActiveScriptId,
        })?;
        let chapter = self.open_chapter.as_ref().ok_or(EditorError::SavePreconditionUnmet {
            missing: SessionSlot::OpenChapter,
        })?;
        Ok((
            script_id.to_owned(),
            chapter.path.clone(),
            chapter.content.clone(),
        ))
    }
}
