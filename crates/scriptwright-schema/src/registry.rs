//! The event kind registry.

use std::collections::HashMap;
use std::sync::LazyLock;

use scriptwright_core::error::EditorError;
use scriptwright_core::model::{ChapterContent, EventRecord};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::builtin::{BASE_OPTIONAL_FIELDS, BUILTIN_KINDS};
use crate::field::EventFieldSpec;
use crate::schema::{EventCategory, EventKindSchema, KindDeclaration};
use crate::validation::{EventReport, FieldViolation, validate_fields};

/// A declaration set that cannot form a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two declarations share a type id.
    #[error("event kind {0} is declared twice")]
    DuplicateEventKind(&'static str),

    /// One kind uses a field key twice across mandatory and optional fields.
    #[error("event kind {type_id} declares field {key} twice")]
    DuplicateFieldKey {
        /// The offending kind.
        type_id: &'static str,
        /// The repeated key.
        key: &'static str,
    },

    /// A field's default value does not fit its kind.
    #[error("event kind {type_id}: default of field {key} does not match its kind")]
    IncompatibleDefault {
        /// The offending kind.
        type_id: &'static str,
        /// The field with the bad default.
        key: &'static str,
    },
}

static BUILTIN: LazyLock<SchemaRegistry> = LazyLock::new(|| {
    SchemaRegistry::new(BUILTIN_KINDS, BASE_OPTIONAL_FIELDS)
        .expect("built-in event kinds are well-formed")
});

/// Immutable catalog of event kinds, in registration order.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<EventKindSchema>,
    by_type: HashMap<&'static str, usize>,
}

impl SchemaRegistry {
    /// Builds a registry from `declarations`, unioning `base` into each
    /// kind's optional fields.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if a type id or a field key within one kind is
    /// repeated, or a default value does not fit its field.
    pub fn new(
        declarations: &[KindDeclaration],
        base: &[EventFieldSpec],
    ) -> Result<Self, RegistryError> {
        let mut schemas = Vec::with_capacity(declarations.len());
        let mut by_type = HashMap::with_capacity(declarations.len());

        for declaration in declarations {
            if by_type.insert(declaration.type_id, schemas.len()).is_some() {
                return Err(RegistryError::DuplicateEventKind(declaration.type_id));
            }

            let schema = EventKindSchema::compose(declaration, base);
            if let Some(key) = schema.duplicate_key() {
                return Err(RegistryError::DuplicateFieldKey {
                    type_id: schema.type_id,
                    key,
                });
            }
            if let Some(field) = schema
                .fields()
                .find(|field| field.default_value.is_some_and(|d| !d.fits(field.kind)))
            {
                return Err(RegistryError::IncompatibleDefault {
                    type_id: schema.type_id,
                    key: field.key,
                });
            }
            schemas.push(schema);
        }

        tracing::debug!(kinds = schemas.len(), "event kind registry built");
        Ok(Self { schemas, by_type })
    }

    /// The registry of built-in event kinds.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// All type ids, in registration order.
    #[must_use]
    pub fn list_kinds(&self) -> Vec<&'static str> {
        self.schemas.iter().map(|schema| schema.type_id).collect()
    }

    /// Type ids of one category, in registration order.
    #[must_use]
    pub fn kinds_in(&self, category: EventCategory) -> Vec<&'static str> {
        self.schemas
            .iter()
            .filter(|schema| schema.category == category)
            .map(|schema| schema.type_id)
            .collect()
    }

    /// Returns the schema of `type_id`.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::UnknownEventKind` if `type_id` is not registered.
    pub fn describe(&self, type_id: &str) -> Result<&EventKindSchema, EditorError> {
        self.by_type
            .get(type_id)
            .map(|&index| &self.schemas[index])
            .ok_or_else(|| EditorError::UnknownEventKind(type_id.to_owned()))
    }

    /// Validates field values for an event of `type_id`. An empty result
    /// means the values are valid.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::UnknownEventKind` if `type_id` is not registered.
    pub fn validate(
        &self,
        type_id: &str,
        values: &Map<String, Value>,
    ) -> Result<Vec<FieldViolation>, EditorError> {
        Ok(validate_fields(self.describe(type_id)?, values))
    }

    /// Validates a stored event record.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::UnknownEventKind` if the record's kind is not
    /// registered.
    pub fn validate_event(&self, event: &EventRecord) -> Result<Vec<FieldViolation>, EditorError> {
        self.validate(&event.kind, &event.fields)
    }

    /// Validates every event of a chapter, reporting only the events that
    /// are of an unknown kind or have violations.
    #[must_use]
    pub fn validate_chapter(&self, chapter: &ChapterContent) -> Vec<EventReport> {
        chapter
            .events
            .iter()
            .enumerate()
            .map(|(index, event)| EventReport {
                index,
                kind: event.kind.clone(),
                outcome: self.validate_event(event),
            })
            .filter(|report| !report.is_valid())
            .collect()
    }

    /// A new event of `type_id` pre-filled with its fields' default values.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::UnknownEventKind` if `type_id` is not registered.
    pub fn blank_event(&self, type_id: &str) -> Result<EventRecord, EditorError> {
        let schema = self.describe(type_id)?;
        let mut event = EventRecord::new(schema.type_id);
        for field in schema.fields() {
            if let Some(default_value) = field.default_value {
                event.fields.insert(field.key.to_owned(), default_value.to_value());
            }
        }
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::field::{FieldDefault, FieldKind};
    use crate::validation::ViolationReason;

    fn values(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_every_builtin_kind_is_listed_once_with_unique_field_keys() {
        let registry = SchemaRegistry::builtin();
        let kinds = registry.list_kinds();

        for type_id in &kinds {
            let schema = registry.describe(type_id).unwrap();
            assert_eq!(schema.duplicate_key(), None, "{type_id}");
            assert_eq!(kinds.iter().filter(|k| *k == type_id).count(), 1);
        }
    }

    #[test]
    fn test_list_kinds_follows_registration_order() {
        let kinds = SchemaRegistry::builtin().list_kinds();

        assert_eq!(
            kinds,
            [
                "narration",
                "player",
                "dialogue",
                "ai_dialogue",
                "modify_character",
                "background",
                "music",
                "set_variable",
                "end",
            ]
        );
    }

    #[test]
    fn test_kinds_in_category() {
        let registry = SchemaRegistry::builtin();

        assert_eq!(registry.kinds_in(EventCategory::Asset), ["background", "music"]);
        assert_eq!(registry.kinds_in(EventCategory::Logic), ["set_variable", "end"]);
    }

    #[test]
    fn test_describe_unknown_kind_fails() {
        let result = SchemaRegistry::builtin().describe("teleport");

        match result {
            Err(EditorError::UnknownEventKind(id)) => assert_eq!(id, "teleport"),
            other => panic!("expected UnknownEventKind, got {other:?}"),
        }
    }

    #[test]
    fn test_every_kind_inherits_condition_and_duration() {
        let registry = SchemaRegistry::builtin();

        for type_id in registry.list_kinds() {
            let schema = registry.describe(type_id).unwrap();
            assert!(schema.field("condition").is_some(), "{type_id}");
            assert_eq!(
                schema.field("duration").map(|f| f.kind),
                Some(FieldKind::Number),
                "{type_id}"
            );
        }
    }

    #[test]
    fn test_empty_values_yield_one_violation_per_mandatory_field() {
        let registry = SchemaRegistry::builtin();
        let empty = Map::new();

        for type_id in registry.list_kinds() {
            let schema = registry.describe(type_id).unwrap();
            let violations = registry.validate(type_id, &empty).unwrap();

            assert_eq!(violations.len(), schema.mandatory_fields.len(), "{type_id}");
            assert!(violations.iter().all(|v| v.reason == ViolationReason::Missing));
        }
        assert!(registry.validate("end", &empty).unwrap().is_empty());
    }

    #[test]
    fn test_validate_dialogue() {
        let registry = SchemaRegistry::builtin();

        let complete = registry
            .validate("dialogue", &values(json!({ "character": "Ann", "text": "Hi" })))
            .unwrap();
        let partial = registry
            .validate("dialogue", &values(json!({ "character": "Ann" })))
            .unwrap();

        assert!(complete.is_empty());
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].key, "text");
    }

    #[test]
    fn test_validate_checks_choices_and_inherited_fields() {
        let registry = SchemaRegistry::builtin();

        let violations = registry
            .validate(
                "modify_character",
                &values(json!({ "action": "dance", "character": "Ann", "duration": "soon" })),
            )
            .unwrap();

        let keys: Vec<_> = violations.iter().map(|v| v.key).collect();
        assert_eq!(keys, ["action", "duration"]);
    }

    #[test]
    fn test_validate_unknown_kind_fails() {
        let result = SchemaRegistry::builtin().validate("teleport", &Map::new());

        assert!(matches!(result, Err(EditorError::UnknownEventKind(_))));
    }

    #[test]
    fn test_validate_chapter_reports_only_problem_events() {
        let chapter: ChapterContent = serde_json::from_value(json!({
            "events": [
                { "type": "narration", "text": "The tide goes out." },
                { "type": "music" },
                { "type": "teleport", "to": "moon" },
                { "type": "end", "next": "act2/start" }
            ]
        }))
        .unwrap();

        let reports = SchemaRegistry::builtin().validate_chapter(&chapter);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].index, 1);
        assert_eq!(reports[0].outcome.as_ref().unwrap()[0].key, "musicPath");
        assert_eq!(reports[1].index, 2);
        assert!(matches!(reports[1].outcome, Err(EditorError::UnknownEventKind(_))));
    }

    #[test]
    fn test_event_without_type_is_reported_unknown() {
        let chapter: ChapterContent =
            serde_json::from_value(json!({ "events": [{ "text": "Waves." }] })).unwrap();

        let reports = SchemaRegistry::builtin().validate_chapter(&chapter);

        assert_eq!(reports.len(), 1);
        assert!(matches!(&reports[0].outcome, Err(EditorError::UnknownEventKind(id)) if id.is_empty()));
    }

    #[test]
    fn test_blank_event_carries_defaults() {
        let event = SchemaRegistry::builtin().blank_event("narration").unwrap();

        assert_eq!(event.kind, "narration");
        assert_eq!(event.field("duration"), Some(&json!(0)));
        assert_eq!(event.field("text"), None);
    }

    #[test]
    fn test_duplicate_type_id_rejected() {
        const TWICE: &[KindDeclaration] = &[
            KindDeclaration {
                type_id: "narration",
                label: "Narration",
                color_tag: "purple",
                category: EventCategory::Narrative,
                mandatory: &[],
                optional: &[],
            },
            KindDeclaration {
                type_id: "narration",
                label: "Narration again",
                color_tag: "purple",
                category: EventCategory::Narrative,
                mandatory: &[],
                optional: &[],
            },
        ];

        let result = SchemaRegistry::new(TWICE, &[]);

        assert_eq!(result.unwrap_err(), RegistryError::DuplicateEventKind("narration"));
    }

    #[test]
    fn test_duplicate_field_key_rejected() {
        const CLASH: &[KindDeclaration] = &[KindDeclaration {
            type_id: "set_variable",
            label: "Set Variable",
            color_tag: "red",
            category: EventCategory::Logic,
            mandatory: &[EventFieldSpec::new("name", "Name", FieldKind::ShortText)],
            optional: &[EventFieldSpec::new("name", "Alias", FieldKind::ShortText)],
        }];

        let result = SchemaRegistry::new(CLASH, &[]);

        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateFieldKey {
                type_id: "set_variable",
                key: "name",
            }
        );
    }

    #[test]
    fn test_incompatible_default_rejected() {
        const BAD_DEFAULT: &[KindDeclaration] = &[KindDeclaration {
            type_id: "wait",
            label: "Wait",
            color_tag: "gray",
            category: EventCategory::Logic,
            mandatory: &[EventFieldSpec::new("seconds", "Seconds", FieldKind::Number)
                .with_default(FieldDefault::Text("soon"))],
            optional: &[],
        }];

        let result = SchemaRegistry::new(BAD_DEFAULT, &[]);

        assert!(matches!(
            result,
            Err(RegistryError::IncompatibleDefault { key: "seconds", .. })
        ));
    }
}
