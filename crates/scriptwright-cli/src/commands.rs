//! Command handlers. Each returns the text to print; nothing here writes to
//! stdout directly.

use std::path::Path;
use std::sync::Arc;

use scriptwright_core::model::{ChapterContent, CreateScriptRequest, ScriptSummary};
use scriptwright_core::store::DocumentStore;
use scriptwright_schema::{EventCategory, EventKindSchema, EventReport, SchemaRegistry};
use scriptwright_session::{EditingSession, ScriptStore};
use serde::Serialize;

use crate::cli::Command;
use crate::error::CliError;

/// What a command printed, and whether it achieved what was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    pub success: bool,
}

impl Output {
    fn ok(text: String) -> Self {
        Self { text, success: true }
    }

    fn failed(text: String) -> Self {
        Self {
            text,
            success: false,
        }
    }
}

/// Runs `command`. `connect` is only called by commands that talk to the
/// document store.
///
/// # Errors
///
/// Returns `CliError` if a file cannot be read, the store cannot be reached,
/// or an editor operation fails.
pub async fn run(
    command: Command,
    registry: &SchemaRegistry,
    connect: impl FnOnce() -> Result<Arc<dyn DocumentStore>, CliError>,
) -> Result<Output, CliError> {
    match command {
        Command::Kinds { category } => Ok(Output::ok(render_kinds(
            registry,
            category.map(EventCategory::from),
        ))),
        Command::Describe { kind } => Ok(Output::ok(render_schema(registry.describe(&kind)?))),
        Command::Blank { kind } => Ok(Output::ok(to_yaml(&registry.blank_event(&kind)?)?)),
        Command::Validate { file } => {
            let chapter = read_chapter(&file).await?;
            let problems = registry.validate_chapter(&chapter);
            if problems.is_empty() {
                Ok(Output::ok(format!(
                    "{}: {} events, all valid\n",
                    file.display(),
                    chapter.events.len()
                )))
            } else {
                Ok(Output::failed(render_reports(&problems)))
            }
        }
        Command::Scripts => {
            let store = ScriptStore::new(connect()?);
            store.refresh_script_list().await?;
            Ok(Output::ok(
                store.read(|session| render_scripts(session.known_scripts())),
            ))
        }
        Command::Open { script_id } => {
            let store = ScriptStore::new(connect()?);
            let report = store.open_script(&script_id).await;
            let mut text = store.read(render_session);
            for failure in report.failures() {
                text.push_str(&format!("warning: {failure}\n"));
            }
            Ok(Output {
                text,
                success: report.failures().is_empty(),
            })
        }
        Command::Chapter { script_id, path } => {
            let store = ScriptStore::new(connect()?);
            store.open_script(&script_id).await.summary?;
            store.open_chapter(&script_id, &path).await?;
            let content = store
                .read(|session| session.open_chapter_content().cloned())
                .unwrap_or_default();
            Ok(Output::ok(to_yaml(&content)?))
        }
        Command::Save {
            script_id,
            path,
            file,
            force,
        } => {
            let chapter = read_chapter(&file).await?;
            let problems = registry.validate_chapter(&chapter);
            if !problems.is_empty() && !force {
                let mut text = render_reports(&problems);
                text.push_str("not saved; pass --force to save anyway\n");
                return Ok(Output::failed(text));
            }

            let store = ScriptStore::new(connect()?);
            store.open_script(&script_id).await.summary?;
            store.stage_chapter(&path, chapter)?;
            let ack = store.save_open_chapter().await?;
            Ok(Output::ok(format!("saved {path} to {script_id}: {}\n", ack.status)))
        }
        Command::Delete { script_id, path } => {
            let store = ScriptStore::new(connect()?);
            store.open_script(&script_id).await.summary?;
            store.delete_chapter(&path).await?;
            Ok(Output::ok(format!("deleted {path} from {script_id}\n")))
        }
        Command::Create {
            name,
            description,
            user_name,
            user_subtitle,
            intro_chapter,
        } => {
            let store = ScriptStore::new(connect()?);
            let script_id = store
                .create_script(&CreateScriptRequest {
                    name,
                    description,
                    user_name,
                    user_subtitle,
                    intro_chapter,
                })
                .await?;
            Ok(Output::ok(format!("created script {script_id}\n")))
        }
    }
}

async fn read_chapter(path: &Path) -> Result<ChapterContent, CliError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_owned(),
            source,
        })?;
    serde_yaml::from_str(&text).map_err(|source| CliError::ChapterFile {
        path: path.to_owned(),
        source,
    })
}

fn to_yaml(value: &impl Serialize) -> Result<String, CliError> {
    serde_yaml::to_string(value).map_err(CliError::Render)
}

fn render_kinds(registry: &SchemaRegistry, category: Option<EventCategory>) -> String {
    let kinds = match category {
        Some(category) => registry.kinds_in(category),
        None => registry.list_kinds(),
    };
    kinds
        .into_iter()
        .filter_map(|kind| registry.describe(kind).ok())
        .map(|schema| {
            format!(
                "{:<18}{:<22}{}\n",
                schema.type_id, schema.label, schema.category
            )
        })
        .collect()
}

fn render_schema(schema: &EventKindSchema) -> String {
    let mut text = format!(
        "{} ({}): {}, {}\n",
        schema.type_id, schema.label, schema.category, schema.color_tag
    );
    for field in schema.fields() {
        let presence = if schema.is_mandatory(field.key) {
            "required"
        } else {
            "optional"
        };
        text.push_str(&format!(
            "  {:<12}{:<10}{presence}",
            field.key,
            field.kind.wire_name()
        ));
        if !field.choices().is_empty() {
            text.push_str(&format!("  one of {}", field.choices().join(", ")));
        }
        if let Some(default_value) = field.default_value {
            text.push_str(&format!("  default {}", default_value.to_value()));
        }
        if let Some(hint) = field.hint {
            text.push_str(&format!("  ({hint})"));
        }
        text.push('\n');
    }
    text
}

fn render_reports(reports: &[EventReport]) -> String {
    reports
        .iter()
        .map(|report| {
            let detail = match &report.outcome {
                Ok(violations) => violations
                    .iter()
                    .map(|violation| format!("{}: {}", violation.key, violation.reason))
                    .collect::<Vec<_>>()
                    .join("; "),
                Err(err) => err.to_string(),
            };
            format!("event {} ({}): {detail}\n", report.index, report.kind)
        })
        .collect()
}

fn render_scripts(scripts: &[ScriptSummary]) -> String {
    scripts
        .iter()
        .map(|script| {
            format!(
                "{:<20}{:<24}{}\n",
                script.id.as_deref().unwrap_or("-"),
                script.name,
                script.intro_chapter_path
            )
        })
        .collect()
}

fn render_session(session: &EditingSession) -> String {
    let mut text = match session.active_script() {
        Some(script) => format!("{} (intro {})\n", script.name, script.intro_chapter_path),
        None => format!(
            "{} (summary unavailable)\n",
            session.bound_script_id().unwrap_or("-")
        ),
    };
    text.push_str(&format!("chapters ({}):\n", session.chapter_paths().len()));
    for path in session.chapter_paths() {
        text.push_str(&format!("  {path}\n"));
    }
    let manifest = session.asset_manifest();
    text.push_str(&format!("assets ({}):\n", manifest.len()));
    for category in manifest.categories() {
        text.push_str(&format!(
            "  {category}: {}\n",
            manifest.assets(category).len()
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use scriptwright_core::error::EditorError;
    use scriptwright_core::model::{AssetManifest, EventRecord};
    use scriptwright_test_support::{Endpoint, InMemoryDocumentStore};

    use super::*;
    use crate::cli::CategoryArg;

    fn chapter_file(name: &str, yaml: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "scriptwright-cli-{}-{name}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, yaml).unwrap();
        path
    }

    fn offline() -> Result<Arc<dyn DocumentStore>, CliError> {
        panic!("offline command connected to the store")
    }

    fn library() -> Arc<InMemoryDocumentStore> {
        Arc::new(
            InMemoryDocumentStore::new()
                .with_script("tides", "Tides")
                .with_chapter(
                    "tides",
                    "intro",
                    ChapterContent {
                        events: vec![EventRecord::new("narration").with("text", "Low tide.")],
                        ..ChapterContent::default()
                    },
                )
                .with_assets(
                    "tides",
                    AssetManifest(
                        [("Musics".to_owned(), vec!["Musics/waves.ogg".to_owned()])].into(),
                    ),
                ),
        )
    }

    fn online(
        remote: &Arc<InMemoryDocumentStore>,
    ) -> impl FnOnce() -> Result<Arc<dyn DocumentStore>, CliError> {
        let remote: Arc<dyn DocumentStore> = Arc::clone(remote) as Arc<dyn DocumentStore>;
        move || Ok(remote)
    }

    const VALID: &str = "\
events:
  - type: narration
    text: The tide goes out.
  - type: music
    musicPath: Musics/waves.ogg
    duration: 2
  - type: end
    next: act1/shore
";

    const INVALID: &str = "\
events:
  - type: narration
    text: The tide goes out.
  - type: dialogue
    text: Who goes there?
  - type: fireworks
";

    #[tokio::test]
    async fn test_kinds_lists_every_kind_in_order() {
        // Act
        let output = run(
            Command::Kinds { category: None },
            SchemaRegistry::builtin(),
            offline,
        )
        .await
        .unwrap();

        // Assert
        let kinds: Vec<&str> = output
            .text
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(kinds, SchemaRegistry::builtin().list_kinds());
    }

    #[tokio::test]
    async fn test_kinds_filters_by_category() {
        // Act
        let output = run(
            Command::Kinds {
                category: Some(CategoryArg::Asset),
            },
            SchemaRegistry::builtin(),
            offline,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(output.text.lines().count(), 2);
        assert!(output.text.starts_with("background"));
    }

    #[tokio::test]
    async fn test_describe_shows_required_and_inherited_fields() {
        // Act
        let output = run(
            Command::Describe {
                kind: "dialogue".to_owned(),
            },
            SchemaRegistry::builtin(),
            offline,
        )
        .await
        .unwrap();

        // Assert
        let lines: Vec<&str> = output.text.lines().collect();
        assert!(lines[0].starts_with("dialogue (Character Dialogue)"));
        assert!(lines[1].contains("character") && lines[1].contains("required"));
        assert!(output.text.contains("duration"));
        assert!(output.text.contains("default 0"));
    }

    #[tokio::test]
    async fn test_describe_unknown_kind_fails() {
        // Act
        let err = run(
            Command::Describe {
                kind: "fireworks".to_owned(),
            },
            SchemaRegistry::builtin(),
            offline,
        )
        .await
        .unwrap_err();

        // Assert
        assert!(matches!(
            err,
            CliError::Editor(EditorError::UnknownEventKind(kind)) if kind == "fireworks"
        ));
    }

    #[tokio::test]
    async fn test_blank_event_is_yaml_with_defaults() {
        // Act
        let output = run(
            Command::Blank {
                kind: "music".to_owned(),
            },
            SchemaRegistry::builtin(),
            offline,
        )
        .await
        .unwrap();

        // Assert
        let event: EventRecord = serde_yaml::from_str(&output.text).unwrap();
        assert_eq!(event.kind, "music");
        assert!(event.field("duration").is_some());
        assert!(event.field("musicPath").is_none());
    }

    #[tokio::test]
    async fn test_validate_reports_problem_events() {
        // Arrange
        let file = chapter_file("invalid", INVALID);

        // Act
        let output = run(Command::Validate { file }, SchemaRegistry::builtin(), offline)
            .await
            .unwrap();

        // Assert
        assert!(!output.success);
        let lines: Vec<&str> = output.text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("event 1 (dialogue): character"));
        assert!(lines[1].starts_with("event 2 (fireworks): unknown event kind"));
    }

    #[tokio::test]
    async fn test_validate_missing_file_is_an_io_error() {
        // Act
        let err = run(
            Command::Validate {
                file: PathBuf::from("/nonexistent/scriptwright/intro.yaml"),
            },
            SchemaRegistry::builtin(),
            offline,
        )
        .await
        .unwrap_err();

        // Assert
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[tokio::test]
    async fn test_open_lists_chapters_and_assets() {
        // Arrange
        let remote = library();

        // Act
        let output = run(
            Command::Open {
                script_id: "tides".to_owned(),
            },
            SchemaRegistry::builtin(),
            online(&remote),
        )
        .await
        .unwrap();

        // Assert
        assert!(output.success);
        assert!(output.text.starts_with("Tides (intro intro)"));
        assert!(output.text.contains("chapters (1):\n  intro\n"));
        assert!(output.text.contains("  Musics: 1\n"));
    }

    #[tokio::test]
    async fn test_open_reports_failed_branches_as_warnings() {
        // Arrange
        let remote = library();
        remote.fail(Endpoint::GetAssets);

        // Act
        let output = run(
            Command::Open {
                script_id: "tides".to_owned(),
            },
            SchemaRegistry::builtin(),
            online(&remote),
        )
        .await
        .unwrap();

        // Assert
        assert!(!output.success);
        assert!(output.text.contains("warning: failed to fetch asset manifest"));
        assert!(output.text.contains("chapters (1):"));
    }

    #[tokio::test]
    async fn test_chapter_prints_yaml() {
        // Arrange
        let remote = library();

        // Act
        let output = run(
            Command::Chapter {
                script_id: "tides".to_owned(),
                path: "intro".to_owned(),
            },
            SchemaRegistry::builtin(),
            online(&remote),
        )
        .await
        .unwrap();

        // Assert
        let content: ChapterContent = serde_yaml::from_str(&output.text).unwrap();
        assert_eq!(Some(content), remote.chapter("tides", "intro"));
    }

    #[tokio::test]
    async fn test_save_refuses_invalid_chapter_without_force() {
        // Arrange
        let remote = library();
        let file = chapter_file("refused", INVALID);

        // Act
        let output = run(
            Command::Save {
                script_id: "tides".to_owned(),
                path: "act1/shore".to_owned(),
                file,
                force: false,
            },
            SchemaRegistry::builtin(),
            online(&remote),
        )
        .await
        .unwrap();

        // Assert
        assert!(!output.success);
        assert!(output.text.ends_with("not saved; pass --force to save anyway\n"));
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_save_stores_valid_chapter() {
        // Arrange
        let remote = library();
        let file = chapter_file("valid", VALID);

        // Act
        let output = run(
            Command::Save {
                script_id: "tides".to_owned(),
                path: "act1/shore".to_owned(),
                file,
                force: false,
            },
            SchemaRegistry::builtin(),
            online(&remote),
        )
        .await
        .unwrap();

        // Assert
        assert!(output.success);
        let stored = remote.chapter("tides", "act1/shore").unwrap();
        assert_eq!(stored.events.len(), 3);
        assert_eq!(stored.events[2].kind, "end");
    }

    #[tokio::test]
    async fn test_save_to_unknown_script_fails() {
        // Arrange
        let remote = library();
        let file = chapter_file("orphan", VALID);

        // Act
        let err = run(
            Command::Save {
                script_id: "missing".to_owned(),
                path: "intro".to_owned(),
                file,
                force: false,
            },
            SchemaRegistry::builtin(),
            online(&remote),
        )
        .await
        .unwrap_err();

        // Assert
        assert!(matches!(
            err,
            CliError::Editor(EditorError::RemoteFetchFailed { .. })
        ));
        assert_eq!(remote.call_count(Endpoint::SaveChapter), 0);
    }

    #[tokio::test]
    async fn test_delete_and_create() {
        // Arrange
        let remote = library();

        // Act
        let deleted = run(
            Command::Delete {
                script_id: "tides".to_owned(),
                path: "intro".to_owned(),
            },
            SchemaRegistry::builtin(),
            online(&remote),
        )
        .await
        .unwrap();
        let created = run(
            Command::Create {
                name: "harbor".to_owned(),
                description: String::new(),
                user_name: String::new(),
                user_subtitle: String::new(),
                intro_chapter: "intro.yaml".to_owned(),
            },
            SchemaRegistry::builtin(),
            online(&remote),
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(deleted.text, "deleted intro from tides\n");
        assert_eq!(remote.chapter("tides", "intro"), None);
        assert_eq!(created.text, "created script harbor\n");
        assert!(remote.chapter("harbor", "intro.yaml").is_some());
    }
}
