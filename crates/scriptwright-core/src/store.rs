//! Remote document store abstraction.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{
    AssetManifest, ChapterContent, CharacterProfile, CreateScriptRequest, CreateScriptResponse,
    ScriptSummary, WriteAck,
};

/// The remote store serving script, chapter and asset records.
///
/// Every method is an independent request; implementations make no promise
/// of atomicity across calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `GET /scripts`
    async fn list_scripts(&self) -> Result<Vec<ScriptSummary>, StoreError>;

    /// `GET /scripts/{id}`
    async fn get_script(&self, script_id: &str) -> Result<ScriptSummary, StoreError>;

    /// `GET /scripts/{id}/chapters`
    async fn list_chapters(&self, script_id: &str) -> Result<Vec<String>, StoreError>;

    /// `GET /scripts/{id}/assets`
    async fn get_assets(&self, script_id: &str) -> Result<AssetManifest, StoreError>;

    /// `GET /scripts/{id}/chapters/{path}`
    async fn get_chapter(&self, script_id: &str, path: &str)
    -> Result<ChapterContent, StoreError>;

    /// `POST /scripts/{id}/chapters/{path}`
    async fn save_chapter(
        &self,
        script_id: &str,
        path: &str,
        content: &ChapterContent,
    ) -> Result<WriteAck, StoreError>;

    /// `DELETE /scripts/{id}/chapters/{path}`
    async fn delete_chapter(&self, script_id: &str, path: &str) -> Result<WriteAck, StoreError>;

    /// `POST /scripts/create`
    async fn create_script(
        &self,
        request: &CreateScriptRequest,
    ) -> Result<CreateScriptResponse, StoreError>;

    /// `GET /scripts/{id}/characters`
    async fn list_characters(&self, script_id: &str) -> Result<Vec<CharacterProfile>, StoreError>;
}
