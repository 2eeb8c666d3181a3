//! Event kind schemas.

use std::fmt;

use crate::field::EventFieldSpec;

/// Domain grouping of event kinds, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Narration and player lines.
    Narrative,
    /// Character speech and staging.
    Character,
    /// Backgrounds, music and other asset cues.
    Asset,
    /// Variables, branching and chapter flow.
    Logic,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Narrative => "narrative",
            Self::Character => "character",
            Self::Asset => "asset",
            Self::Logic => "logic",
        })
    }
}

/// Static declaration of an event kind: its own fields only. The fields
/// every kind inherits are layered on when the declaration is registered.
#[derive(Debug, Clone, Copy)]
pub struct KindDeclaration {
    /// Unique kind identifier.
    pub type_id: &'static str,
    /// Display name.
    pub label: &'static str,
    /// Presentation color.
    pub color_tag: &'static str,
    /// Menu group.
    pub category: EventCategory,
    /// Fields that must hold a value.
    pub mandatory: &'static [EventFieldSpec],
    /// Kind-specific optional fields.
    pub optional: &'static [EventFieldSpec],
}

/// Complete description of one event kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EventKindSchema {
    /// Unique kind identifier.
    pub type_id: &'static str,
    /// Display name.
    pub label: &'static str,
    /// Presentation color.
    pub color_tag: &'static str,
    /// Menu group.
    pub category: EventCategory,
    /// Fields that must be present and non-empty, in form order.
    pub mandatory_fields: Vec<EventFieldSpec>,
    /// Fields that may be absent, in form order.
    pub optional_fields: Vec<EventFieldSpec>,
}

impl EventKindSchema {
    /// Builds the schema of `declaration`, appending each `base` field whose
    /// key the declaration does not already use.
    #[must_use]
    pub fn compose(declaration: &KindDeclaration, base: &[EventFieldSpec]) -> Self {
        let mut optional_fields = declaration.optional.to_vec();
        for inherited in base {
            let taken = declaration
                .mandatory
                .iter()
                .chain(declaration.optional)
                .any(|field| field.key == inherited.key);
            if !taken {
                optional_fields.push(*inherited);
            }
        }

        Self {
            type_id: declaration.type_id,
            label: declaration.label,
            color_tag: declaration.color_tag,
            category: declaration.category,
            mandatory_fields: declaration.mandatory.to_vec(),
            optional_fields,
        }
    }

    /// All fields, mandatory first.
    pub fn fields(&self) -> impl Iterator<Item = &EventFieldSpec> {
        self.mandatory_fields.iter().chain(&self.optional_fields)
    }

    /// Looks up a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&EventFieldSpec> {
        self.fields().find(|field| field.key == key)
    }

    /// Returns `true` if `key` names a mandatory field.
    #[must_use]
    pub fn is_mandatory(&self, key: &str) -> bool {
        self.mandatory_fields.iter().any(|field| field.key == key)
    }

    /// The first key used by more than one field, if any.
    #[must_use]
    pub fn duplicate_key(&self) -> Option<&'static str> {
        let keys: Vec<&'static str> = self.fields().map(|field| field.key).collect();
        keys.iter()
            .enumerate()
            .find(|(i, key)| keys[..*i].contains(key))
            .map(|(_, key)| *key)
    }
}
