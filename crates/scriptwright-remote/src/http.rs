//! `DocumentStore` over the store's REST API.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use scriptwright_core::error::StoreError;
use scriptwright_core::model::{
    AssetManifest, ChapterContent, CharacterProfile, CreateScriptRequest, CreateScriptResponse,
    ScriptSummary, WriteAck,
};
use scriptwright_core::store::DocumentStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::RemoteConfig;

/// HTTP client for the remote document store.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: Client,
    base: Url,
}

impl HttpDocumentStore {
    /// Builds a client for the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transport` if the base URL cannot carry a path or
    /// the HTTP client cannot be built.
    pub fn new(config: &RemoteConfig) -> Result<Self, StoreError> {
        let base = Url::parse(&config.base_url)
            .map_err(|err| StoreError::Transport(format!("{}: {err}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Transport(format!(
                "{}: not a base URL",
                config.base_url
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("scriptwright/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(transport)?;

        Ok(Self { client, base })
    }

    /// The API base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// The base URL extended by `segments`, each percent-encoded on its own.
    fn url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of a chapter; `path` may name nested folders.
    fn chapter_url(&self, script_id: &str, path: &str) -> Url {
        self.url(
            ["scripts", script_id, "chapters"]
                .into_iter()
                .chain(path.split('/').filter(|segment| !segment.is_empty())),
        )
    }

    async fn get<T>(&self, url: Url) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await.map_err(transport)?;
        handle_response(response).await
    }

    async fn post<B, T>(&self, url: Url, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        handle_response(response).await
    }

    async fn delete<T>(&self, url: Url) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await.map_err(transport)?;
        handle_response(response).await
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

/// Maps a response to the decoded body or a `StoreError`.
async fn handle_response<T>(response: Response) -> Result<T, StoreError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }

    let text = response.text().await.map_err(transport)?;
    if status.is_success() {
        serde_json::from_str(&text).map_err(|err| StoreError::Decode(err.to_string()))
    } else {
        Err(StoreError::Status {
            status: status.as_u16(),
            body: text,
        })
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn list_scripts(&self) -> Result<Vec<ScriptSummary>, StoreError> {
        self.get(self.url(["scripts"])).await
    }

    async fn get_script(&self, script_id: &str) -> Result<ScriptSummary, StoreError> {
        self.get(self.url(["scripts", script_id])).await
    }

    async fn list_chapters(&self, script_id: &str) -> Result<Vec<String>, StoreError> {
        self.get(self.url(["scripts", script_id, "chapters"])).await
    }

    async fn get_assets(&self, script_id: &str) -> Result<AssetManifest, StoreError> {
        self.get(self.url(["scripts", script_id, "assets"])).await
    }

    async fn get_chapter(
        &self,
        script_id: &str,
        path: &str,
    ) -> Result<ChapterContent, StoreError> {
        self.get(self.chapter_url(script_id, path)).await
    }

    async fn save_chapter(
        &self,
        script_id: &str,
        path: &str,
        content: &ChapterContent,
    ) -> Result<WriteAck, StoreError> {
        self.post(self.chapter_url(script_id, path), content).await
    }

    async fn delete_chapter(&self, script_id: &str, path: &str) -> Result<WriteAck, StoreError> {
        self.delete(self.chapter_url(script_id, path)).await
    }

    async fn create_script(
        &self,
        request: &CreateScriptRequest,
    ) -> Result<CreateScriptResponse, StoreError> {
        self.post(self.url(["scripts", "create"]), request).await
    }

    async fn list_characters(&self, script_id: &str) -> Result<Vec<CharacterProfile>, StoreError> {
        self.get(self.url(["scripts", script_id, "characters"])).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn store(base_url: &str) -> HttpDocumentStore {
        let config = RemoteConfig {
            base_url: base_url.to_owned(),
            timeout: Duration::from_secs(1),
        };
        HttpDocumentStore::new(&config).unwrap()
    }

    #[test]
    fn test_chapter_url_keeps_nested_segments() {
        let store = store("http://localhost:8000/api");

        assert_eq!(
            store.chapter_url("tides", "act1/shore.yaml").as_str(),
            "http://localhost:8000/api/scripts/tides/chapters/act1/shore.yaml"
        );
        assert_eq!(
            store.chapter_url("tides", "/intro.yaml").as_str(),
            "http://localhost:8000/api/scripts/tides/chapters/intro.yaml"
        );
    }

    #[test]
    fn test_reserved_characters_are_encoded_per_segment() {
        let store = store("http://localhost:8000/api");

        assert_eq!(
            store.chapter_url("tides", "scene#2.yaml").as_str(),
            "http://localhost:8000/api/scripts/tides/chapters/scene%232.yaml"
        );
        assert_eq!(
            store.url(["scripts", "a?b", "assets"]).as_str(),
            "http://localhost:8000/api/scripts/a%3Fb/assets"
        );
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let store = store("http://localhost:8000/api/");

        assert_eq!(store.base_url(), "http://localhost:8000/api");
        assert_eq!(store.url(["scripts"]).as_str(), "http://localhost:8000/api/scripts");
    }

    #[test]
    fn test_new_rejects_unparseable_base_url() {
        let config = RemoteConfig {
            base_url: "not a url".to_owned(),
            timeout: Duration::from_secs(1),
        };

        let result = HttpDocumentStore::new(&config);

        assert!(matches!(result, Err(StoreError::Transport(_))));
    }
}
