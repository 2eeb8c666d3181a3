//! Test stores: `DocumentStore` implementations for tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scriptwright_core::error::StoreError;
use scriptwright_core::model::{
    AssetManifest, ChapterContent, CharacterProfile, CreateScriptRequest, CreateScriptResponse,
    ScriptSettings, ScriptSummary, WriteAck,
};
use scriptwright_core::store::DocumentStore;
use tokio::sync::Notify;

/// One endpoint of the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /scripts`
    ListScripts,
    /// `GET /scripts/{id}`
    GetScript,
    /// `GET /scripts/{id}/chapters`
    ListChapters,
    /// `GET /scripts/{id}/assets`
    GetAssets,
    /// `GET /scripts/{id}/chapters/{path}`
    GetChapter,
    /// `POST /scripts/{id}/chapters/{path}`
    SaveChapter,
    /// `DELETE /scripts/{id}/chapters/{path}`
    DeleteChapter,
    /// `POST /scripts/create`
    CreateScript,
    /// `GET /scripts/{id}/characters`
    ListCharacters,
}

/// A request received by `InMemoryDocumentStore`.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    /// `GET /scripts`
    ListScripts,
    /// `GET /scripts/{id}`
    GetScript(String),
    /// `GET /scripts/{id}/chapters`
    ListChapters(String),
    /// `GET /scripts/{id}/assets`
    GetAssets(String),
    /// `GET /scripts/{id}/chapters/{path}`
    GetChapter(String, String),
    /// `POST /scripts/{id}/chapters/{path}`
    SaveChapter(String, String, ChapterContent),
    /// `DELETE /scripts/{id}/chapters/{path}`
    DeleteChapter(String, String),
    /// `POST /scripts/create`
    CreateScript(CreateScriptRequest),
    /// `GET /scripts/{id}/characters`
    ListCharacters(String),
}

impl StoreCall {
    /// The endpoint this call targets.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::ListScripts => Endpoint::ListScripts,
            Self::GetScript(_) => Endpoint::GetScript,
            Self::ListChapters(_) => Endpoint::ListChapters,
            Self::GetAssets(_) => Endpoint::GetAssets,
            Self::GetChapter(..) => Endpoint::GetChapter,
            Self::SaveChapter(..) => Endpoint::SaveChapter,
            Self::DeleteChapter(..) => Endpoint::DeleteChapter,
            Self::CreateScript(_) => Endpoint::CreateScript,
            Self::ListCharacters(_) => Endpoint::ListCharacters,
        }
    }
}

#[derive(Debug, Default)]
struct Library {
    scripts: Vec<ScriptSummary>,
    chapters: HashMap<String, BTreeMap<String, ChapterContent>>,
    assets: HashMap<String, AssetManifest>,
    characters: HashMap<String, Vec<CharacterProfile>>,
}

impl Library {
    fn require_script(&self, script_id: &str) -> Result<(), StoreError> {
        if self.scripts.iter().any(|script| script.has_id(script_id)) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

/// A document store held in memory. Records every call, and can be told to
/// fail an endpoint or to hold its next response until released.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    library: Mutex<Library>,
    failing: Mutex<HashSet<Endpoint>>,
    gates: Mutex<HashMap<Endpoint, Arc<Notify>>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a script; its summary is given `script_id` as id.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_script(self, script_id: &str, name: &str) -> Self {
        {
            let mut library = self.library.lock().unwrap();
            library.scripts.push(ScriptSummary {
                id: Some(script_id.to_owned()),
                ..ScriptSummary::draft(name, "intro")
            });
            library.chapters.entry(script_id.to_owned()).or_default();
        }
        self
    }

    /// Adds a chapter to a script.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_chapter(self, script_id: &str, path: &str, content: ChapterContent) -> Self {
        self.library
            .lock()
            .unwrap()
            .chapters
            .entry(script_id.to_owned())
            .or_default()
            .insert(path.to_owned(), content);
        self
    }

    /// Sets a script's asset manifest.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_assets(self, script_id: &str, manifest: AssetManifest) -> Self {
        self.library
            .lock()
            .unwrap()
            .assets
            .insert(script_id.to_owned(), manifest);
        self
    }

    /// Sets a script's character profiles.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_characters(self, script_id: &str, characters: Vec<CharacterProfile>) -> Self {
        self.library
            .lock()
            .unwrap()
            .characters
            .insert(script_id.to_owned(), characters);
        self
    }

    /// Makes every call to `endpoint` fail with a transport error.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail(&self, endpoint: Endpoint) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    /// Lets calls to `endpoint` succeed again.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn recover(&self, endpoint: Endpoint) {
        self.failing.lock().unwrap().remove(&endpoint);
    }

    /// Holds the next call to `endpoint` until the returned `Notify` is
    /// notified.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn hold(&self, endpoint: Endpoint) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(endpoint, Arc::clone(&gate));
        gate
    }

    /// Returns a snapshot of all calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls received by `endpoint`.
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.endpoint() == endpoint)
            .count()
    }

    /// The stored content of a chapter.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn chapter(&self, script_id: &str, path: &str) -> Option<ChapterContent> {
        self.library
            .lock()
            .unwrap()
            .chapters
            .get(script_id)
            .and_then(|chapters| chapters.get(path))
            .cloned()
    }

    async fn enter(&self, call: StoreCall) -> Result<(), StoreError> {
        let endpoint = call.endpoint();
        self.calls.lock().unwrap().push(call);

        let gate = self.gates.lock().unwrap().remove(&endpoint);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.failing.lock().unwrap().contains(&endpoint) {
            return Err(StoreError::Transport("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn list_scripts(&self) -> Result<Vec<ScriptSummary>, StoreError> {
        self.enter(StoreCall::ListScripts).await?;
        Ok(self.library.lock().unwrap().scripts.clone())
    }

    async fn get_script(&self, script_id: &str) -> Result<ScriptSummary, StoreError> {
        self.enter(StoreCall::GetScript(script_id.to_owned())).await?;
        self.library
            .lock()
            .unwrap()
            .scripts
            .iter()
            .find(|script| script.has_id(script_id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_chapters(&self, script_id: &str) -> Result<Vec<String>, StoreError> {
        self.enter(StoreCall::ListChapters(script_id.to_owned())).await?;
        let library = self.library.lock().unwrap();
        library.require_script(script_id)?;
        Ok(library
            .chapters
            .get(script_id)
            .map(|chapters| chapters.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_assets(&self, script_id: &str) -> Result<AssetManifest, StoreError> {
        self.enter(StoreCall::GetAssets(script_id.to_owned())).await?;
        let library = self.library.lock().unwrap();
        library.require_script(script_id)?;
        Ok(library.assets.get(script_id).cloned().unwrap_or_default())
    }

    async fn get_chapter(
        &self,
        script_id: &str,
        path: &str,
    ) -> Result<ChapterContent, StoreError> {
        self.enter(StoreCall::GetChapter(script_id.to_owned(), path.to_owned()))
            .await?;
        self.chapter(script_id, path).ok_or(StoreError::NotFound)
    }

    async fn save_chapter(
        &self,
        script_id: &str,
        path: &str,
        content: &ChapterContent,
    ) -> Result<WriteAck, StoreError> {
        self.enter(StoreCall::SaveChapter(
            script_id.to_owned(),
            path.to_owned(),
            content.clone(),
        ))
        .await?;
        let mut library = self.library.lock().unwrap();
        library.require_script(script_id)?;
        library
            .chapters
            .entry(script_id.to_owned())
            .or_default()
            .insert(path.to_owned(), content.clone());
        Ok(WriteAck::success())
    }

    async fn delete_chapter(&self, script_id: &str, path: &str) -> Result<WriteAck, StoreError> {
        self.enter(StoreCall::DeleteChapter(script_id.to_owned(), path.to_owned()))
            .await?;
        self.library
            .lock()
            .unwrap()
            .chapters
            .get_mut(script_id)
            .and_then(|chapters| chapters.remove(path))
            .map(|_| WriteAck {
                status: "success".to_owned(),
                message: Some(format!("Chapter {path} deleted successfully")),
            })
            .ok_or(StoreError::NotFound)
    }

    async fn create_script(
        &self,
        request: &CreateScriptRequest,
    ) -> Result<CreateScriptResponse, StoreError> {
        self.enter(StoreCall::CreateScript(request.clone())).await?;
        let mut library = self.library.lock().unwrap();
        if library.require_script(&request.name).is_ok() {
            return Err(StoreError::Status {
                status: 400,
                body: "Script with this name already exists".to_owned(),
            });
        }
        library.scripts.push(ScriptSummary {
            id: Some(request.name.clone()),
            name: request.name.clone(),
            intro_chapter_path: request.intro_chapter.clone(),
            description: Some(request.description.clone()),
            settings: Some(ScriptSettings {
                user_name: Some(request.user_name.clone()),
                user_subtitle: Some(request.user_subtitle.clone()),
                ..ScriptSettings::default()
            }),
        });
        library
            .chapters
            .entry(request.name.clone())
            .or_default()
            .insert(request.intro_chapter.clone(), ChapterContent::default());
        Ok(CreateScriptResponse {
            status: "success".to_owned(),
            message: Some(format!("Script '{}' created successfully", request.name)),
            script_id: request.name.clone(),
        })
    }

    async fn list_characters(&self, script_id: &str) -> Result<Vec<CharacterProfile>, StoreError> {
        self.enter(StoreCall::ListCharacters(script_id.to_owned()))
            .await?;
        Ok(self
            .library
            .lock()
            .unwrap()
            .characters
            .get(script_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// A document store whose every endpoint fails with a transport error.
/// Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingDocumentStore;

fn refused() -> StoreError {
    StoreError::Transport("connection refused".into())
}

#[async_trait]
impl DocumentStore for FailingDocumentStore {
    async fn list_scripts(&self) -> Result<Vec<ScriptSummary>, StoreError> {
        Err(refused())
    }

    async fn get_script(&self, _script_id: &str) -> Result<ScriptSummary, StoreError> {
        Err(refused())
    }

    async fn list_chapters(&self, _script_id: &str) -> Result<Vec<String>, StoreError> {
        Err(refused())
    }

    async fn get_assets(&self, _script_id: &str) -> Result<AssetManifest, StoreError> {
        Err(refused())
    }

    async fn get_chapter(
        &self,
        _script_id: &str,
        _path: &str,
    ) -> Result<ChapterContent, StoreError> {
        Err(refused())
    }

    async fn save_chapter(
        &self,
        _script_id: &str,
        _path: &str,
        _content: &ChapterContent,
    ) -> Result<WriteAck, StoreError> {
        Err(refused())
    }

    async fn delete_chapter(&self, _script_id: &str, _path: &str) -> Result<WriteAck, StoreError> {
        Err(refused())
    }

    async fn create_script(
        &self,
        _request: &CreateScriptRequest,
    ) -> Result<CreateScriptResponse, StoreError> {
        Err(refused())
    }

    async fn list_characters(&self, _script_id: &str) -> Result<Vec<CharacterProfile>, StoreError> {
        Err(refused())
    }
}
