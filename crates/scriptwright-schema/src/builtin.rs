//! Event kinds shipped with the editor.

use crate::field::{EventFieldSpec, FieldDefault, FieldKind};
use crate::schema::{EventCategory, KindDeclaration};

/// Optional fields every event kind supports.
pub const BASE_OPTIONAL_FIELDS: &[EventFieldSpec] = &[
    EventFieldSpec::new("condition", "Condition", FieldKind::ShortText)
        .with_hint("Variable expression (e.g. var > 1)"),
    EventFieldSpec::new("duration", "Duration", FieldKind::Number)
        .with_default(FieldDefault::Number(0.0)),
];

/// Stage actions of `modify_character`.
pub const CHARACTER_ACTIONS: &[&str] = &[
    "show_character",
    "hide_character",
    "move_character",
    "shake_character",
];

const CONTENT: EventFieldSpec = EventFieldSpec::new("text", "Content", FieldKind::LongText);
const CHARACTER: EventFieldSpec = EventFieldSpec::new("character", "Character", FieldKind::ShortText);

/// Built-in event kinds in menu order.
pub const BUILTIN_KINDS: &[KindDeclaration] = &[
    // Story
    KindDeclaration {
        type_id: "narration",
        label: "Narration",
        color_tag: "purple",
        category: EventCategory::Narrative,
        mandatory: &[CONTENT],
        optional: &[],
    },
    KindDeclaration {
        type_id: "player",
        label: "Player Says",
        color_tag: "gray",
        category: EventCategory::Narrative,
        mandatory: &[CONTENT],
        optional: &[],
    },
    // Characters
    KindDeclaration {
        type_id: "dialogue",
        label: "Character Dialogue",
        color_tag: "blue",
        category: EventCategory::Character,
        mandatory: &[CHARACTER, CONTENT],
        optional: &[],
    },
    KindDeclaration {
        type_id: "ai_dialogue",
        label: "AI Dialogue",
        color_tag: "cyan",
        category: EventCategory::Character,
        mandatory: &[
            CHARACTER,
            EventFieldSpec::new("prompt", "AI Prompt", FieldKind::LongText),
        ],
        optional: &[],
    },
    KindDeclaration {
        type_id: "modify_character",
        label: "Modify Character",
        color_tag: "pink",
        category: EventCategory::Character,
        mandatory: &[
            EventFieldSpec::new("action", "Action", FieldKind::Choice(CHARACTER_ACTIONS)),
            CHARACTER,
        ],
        optional: &[EventFieldSpec::new("emotion", "Emotion", FieldKind::ShortText)],
    },
    // Assets
    KindDeclaration {
        type_id: "background",
        label: "Background",
        color_tag: "green",
        category: EventCategory::Asset,
        mandatory: &[EventFieldSpec::new("imagePath", "Image Path", FieldKind::FileReference)],
        optional: &[],
    },
    KindDeclaration {
        type_id: "music",
        label: "Music",
        color_tag: "yellow",
        category: EventCategory::Asset,
        mandatory: &[EventFieldSpec::new("musicPath", "Music Path", FieldKind::FileReference)],
        optional: &[],
    },
    // Logic
    KindDeclaration {
        type_id: "set_variable",
        label: "Set Variable",
        color_tag: "red",
        category: EventCategory::Logic,
        mandatory: &[
            EventFieldSpec::new("name", "Variable Name", FieldKind::ShortText),
            EventFieldSpec::new("value", "Value", FieldKind::ShortText),
        ],
        optional: &[],
    },
    KindDeclaration {
        type_id: "end",
        label: "End / Jump",
        color_tag: "white",
        category: EventCategory::Logic,
        mandatory: &[],
        optional: &[
            EventFieldSpec::new("next", "Next Chapter", FieldKind::ShortText)
                .with_hint("Chapter path or \"end\""),
            EventFieldSpec::new("condition", "Condition", FieldKind::ShortText),
        ],
    },
];
