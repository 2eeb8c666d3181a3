//! Records exchanged with the remote document store.
//!
//! Field names follow the store's wire format. Every record that the editor
//! does not fully understand keeps unknown keys in a pass-through map so that
//! a fetch followed by a save transports it intact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Summary of one script as listed by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSummary {
    /// Store identifier. Absent for a draft that was never saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(rename = "script_name")]
    pub name: String,
    /// Path of the chapter a playthrough starts with.
    #[serde(rename = "intro_charpter")]
    pub intro_chapter_path: String,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Script-wide settings.
    #[serde(rename = "script_settings", default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ScriptSettings>,
}

impl ScriptSummary {
    /// Creates a transient draft that has not been persisted yet.
    #[must_use]
    pub fn draft(name: impl Into<String>, intro_chapter_path: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            intro_chapter_path: intro_chapter_path.into(),
            description: None,
            settings: None,
        }
    }

    /// Returns `true` if this summary carries the given store id.
    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// Script-wide settings. Unknown keys are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptSettings {
    /// Name shown for the player character.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// Subtitle shown under the player name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_subtitle: Option<String>,
    /// Keys this record does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Content of one chapter: its ordered event sequence plus whatever other
/// top-level keys the chapter file carries.
///
/// An empty chapter file decodes as `null`, and a chapter without events may
/// carry `events: null`; both read as a chapter with no events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<StoredChapter>")]
pub struct ChapterContent {
    /// Events in playback order.
    pub events: Vec<EventRecord>,
    /// Keys this record does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Chapter body as the store may return it.
#[derive(Deserialize)]
struct StoredChapter {
    #[serde(default)]
    events: Option<Vec<EventRecord>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<Option<StoredChapter>> for ChapterContent {
    fn from(stored: Option<StoredChapter>) -> Self {
        stored.map_or_else(Self::default, |stored| Self {
            events: stored.events.unwrap_or_default(),
            extra: stored.extra,
        })
    }
}

/// One event of a chapter: its kind identifier and its field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event kind identifier, e.g. `dialogue`. Empty when the stored event
    /// names no kind; validation then reports it as unknown.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Field values keyed by field key.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EventRecord {
    /// Creates an event of `kind` with no field values.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// Sets a field value, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns a field value.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Assets available to a script, grouped by category (`Backgrounds`,
/// `Musics`, ...). Paths are relative to the script's asset root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest(pub BTreeMap<String, Vec<String>>);

impl AssetManifest {
    /// Returns the asset paths of one category, empty if it is unknown.
    #[must_use]
    pub fn assets(&self, category: &str) -> &[String] {
        self.0.get(category).map_or(&[], Vec::as_slice)
    }

    /// Iterates category names in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total number of assets across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Returns `true` if no category lists any asset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A character profile defined by the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Character identifier referenced by events.
    pub id: String,
    /// File the profile was read from, relative to the characters root.
    #[serde(rename = "_path", default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Keys this record does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /scripts/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScriptRequest {
    /// Script name; becomes the script id.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Player character name.
    pub user_name: String,
    /// Player character subtitle.
    pub user_subtitle: String,
    /// Path of the (initially empty) intro chapter.
    pub intro_chapter: String,
}

/// Response of `POST /scripts/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateScriptResponse {
    /// `success` on success.
    pub status: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Id of the newly created script.
    pub script_id: String,
}

/// Acknowledgement of a chapter save or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteAck {
    /// `success` on success.
    pub status: String,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WriteAck {
    /// A plain success acknowledgement.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: "success".to_owned(),
            message: None,
        }
    }
}
