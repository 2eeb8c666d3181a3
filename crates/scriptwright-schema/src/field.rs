//! Field declarations of event kinds.

use std::fmt;

use serde_json::Value;

/// The editing widget and value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line text.
    ShortText,
    /// A numeric value.
    Number,
    /// Multi-line text.
    LongText,
    /// One value out of a fixed, ordered list.
    Choice(&'static [&'static str]),
    /// A path to an asset file.
    FileReference,
}

impl FieldKind {
    /// Name of the kind as the editor UI knows it.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::ShortText => "text",
            Self::Number => "number",
            Self::LongText => "textarea",
            Self::Choice(_) => "select",
            Self::FileReference => "file",
        }
    }

    /// Allowed values; empty unless this is a `Choice`.
    #[must_use]
    pub fn choices(self) -> &'static [&'static str] {
        match self {
            Self::Choice(choices) => choices,
            _ => &[],
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Pre-fill value of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    /// A text value, also used for choices.
    Text(&'static str),
    /// A numeric value.
    Number(f64),
}

impl FieldDefault {
    /// The default as a JSON value.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Self::Text(text) => Value::from(text),
            Self::Number(number) => {
                whole_number(number).map_or_else(|| Value::from(number), Value::from)
            }
        }
    }

    /// Returns `true` if this default may pre-fill a field of `kind`.
    #[must_use]
    pub fn fits(self, kind: FieldKind) -> bool {
        match (self, kind) {
            (Self::Text(_), FieldKind::ShortText | FieldKind::LongText | FieldKind::FileReference)
            | (Self::Number(_), FieldKind::Number) => true,
            (Self::Text(text), FieldKind::Choice(choices)) => choices.contains(&text),
            _ => false,
        }
    }
}

/// Largest magnitude an `f64` holds without losing integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// `number` as an integer when it has no fractional part.
#[allow(clippy::cast_possible_truncation)]
fn whole_number(number: f64) -> Option<i64> {
    (number.is_finite() && number.fract() == 0.0 && number.abs() <= MAX_EXACT_INTEGER)
        .then(|| number as i64)
}

/// One editable field of an event kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventFieldSpec {
    /// Key of the value in an event record.
    pub key: &'static str,
    /// Human-readable name.
    pub label: &'static str,
    /// Widget and value type.
    pub kind: FieldKind,
    /// Optional pre-fill value.
    pub default_value: Option<FieldDefault>,
    /// Optional guidance shown next to the field.
    pub hint: Option<&'static str>,
}

impl EventFieldSpec {
    /// Declares a field with no default and no hint.
    #[must_use]
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            default_value: None,
            hint: None,
        }
    }

    /// Adds a pre-fill value.
    #[must_use]
    pub const fn with_default(mut self, default_value: FieldDefault) -> Self {
        self.default_value = Some(default_value);
        self
    }

    /// Adds a guidance hint.
    #[must_use]
    pub const fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Allowed values; empty unless the field is a choice.
    #[must_use]
    pub fn choices(&self) -> &'static [&'static str] {
        self.kind.choices()
    }
}
