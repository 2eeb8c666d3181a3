//! Validation of field values against an event kind schema.
//!
//! Validation is pure: it only answers whether values fit the declared
//! fields. Whether an invalid event may still be saved is the caller's call.

use std::fmt;

use scriptwright_core::error::EditorError;
use serde_json::{Map, Value};

use crate::field::{EventFieldSpec, FieldKind};
use crate::schema::EventKindSchema;

/// Why a field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationReason {
    /// A mandatory field is absent or empty.
    Missing,
    /// The value is not a string, number or boolean.
    NotText,
    /// The value neither is nor parses as a finite number.
    NotANumber,
    /// The value is not one of the declared choices.
    NotAChoice(String),
    /// The value is not a path string.
    NotAFileReference,
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "value is required"),
            Self::NotText => write!(f, "expected text"),
            Self::NotANumber => write!(f, "expected a number"),
            Self::NotAChoice(value) => write!(f, "{value:?} is not an allowed choice"),
            Self::NotAFileReference => write!(f, "expected a file path"),
        }
    }
}

/// One field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Key of the offending field.
    pub key: &'static str,
    /// What was wrong.
    pub reason: ViolationReason,
}

impl From<FieldViolation> for EditorError {
    fn from(violation: FieldViolation) -> Self {
        Self::MissingOrInvalidField {
            key: violation.key.to_owned(),
            reason: violation.reason.to_string(),
        }
    }
}

/// Validation outcome of one event of a chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct EventReport {
    /// Position of the event in the chapter.
    pub index: usize,
    /// The event's kind identifier.
    pub kind: String,
    /// `Err` if the kind is unknown, otherwise the field violations.
    pub outcome: Result<Vec<FieldViolation>, EditorError>,
}

impl EventReport {
    /// Returns `true` if the event is of a known kind and has no violations.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(&self.outcome, Ok(violations) if violations.is_empty())
    }
}

/// Checks `values` against `schema`. Mandatory fields come first, then
/// optional ones, each in declaration order.
#[must_use]
pub fn validate_fields(schema: &EventKindSchema, values: &Map<String, Value>) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    for field in &schema.mandatory_fields {
        let reason = match values.get(field.key) {
            Some(value) if !is_empty(value) => check_value(field, value).err(),
            _ => Some(ViolationReason::Missing),
        };
        if let Some(reason) = reason {
            violations.push(FieldViolation { key: field.key, reason });
        }
    }

    for field in &schema.optional_fields {
        let Some(value) = values.get(field.key).filter(|value| !is_empty(value)) else {
            continue;
        };
        if let Err(reason) = check_value(field, value) {
            violations.push(FieldViolation { key: field.key, reason });
        }
    }

    violations
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn check_value(field: &EventFieldSpec, value: &Value) -> Result<(), ViolationReason> {
    match field.kind {
        FieldKind::ShortText | FieldKind::LongText => match value {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(()),
            _ => Err(ViolationReason::NotText),
        },
        FieldKind::Number => {
            let numeric = match value {
                Value::Number(_) => true,
                Value::String(text) => text.trim().parse::<f64>().is_ok_and(f64::is_finite),
                _ => false,
            };
            if numeric {
                Ok(())
            } else {
                Err(ViolationReason::NotANumber)
            }
        }
        FieldKind::Choice(choices) => match value {
            Value::String(text) if choices.contains(&text.as_str()) => Ok(()),
            Value::String(text) => Err(ViolationReason::NotAChoice(text.clone())),
            other => Err(ViolationReason::NotAChoice(other.to_string())),
        },
        FieldKind::FileReference => match value {
            Value::String(_) => Ok(()),
            _ => Err(ViolationReason::NotAFileReference),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::EventCategory;

    const MOODS: &[&str] = &["calm", "angry"];

    fn schema() -> EventKindSchema {
        EventKindSchema {
            type_id: "gauge",
            label: "Gauge",
            color_tag: "gray",
            category: EventCategory::Logic,
            mandatory_fields: vec![
                EventFieldSpec::new("mood", "Mood", FieldKind::Choice(MOODS)),
                EventFieldSpec::new("weight", "Weight", FieldKind::Number),
            ],
            optional_fields: vec![
                EventFieldSpec::new("note", "Note", FieldKind::LongText),
                EventFieldSpec::new("sprite", "Sprite", FieldKind::FileReference),
            ],
        }
    }

    fn values(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_numeric_strings_are_numbers() {
        let values = values(json!({ "mood": "calm", "weight": " 2.5 " }));

        let violations = validate_fields(&schema(), &values);

        assert!(violations.is_empty());
    }

    #[test]
    fn test_wrong_kinds_are_reported_in_declaration_order() {
        let violations = validate_fields(
            &schema(),
            &values(json!({ "weight": "heavy", "mood": "sad", "sprite": 7 })),
        );

        assert_eq!(
            violations,
            vec![
                FieldViolation { key: "mood", reason: ViolationReason::NotAChoice("sad".to_owned()) },
                FieldViolation { key: "weight", reason: ViolationReason::NotANumber },
                FieldViolation { key: "sprite", reason: ViolationReason::NotAFileReference },
            ]
        );
    }

    #[test]
    fn test_blank_mandatory_value_is_missing() {
        let violations = validate_fields(&schema(), &values(json!({ "mood": "calm", "weight": null })));

        assert_eq!(
            violations,
            vec![FieldViolation { key: "weight", reason: ViolationReason::Missing }]
        );
    }

    #[test]
    fn test_blank_optional_value_counts_as_absent() {
        let violations = validate_fields(
            &schema(),
            &values(json!({ "mood": "angry", "weight": 1, "note": "  ", "sprite": "" })),
        );

        assert!(violations.is_empty());
    }

    #[test]
    fn test_structured_value_is_not_text() {
        let violations = validate_fields(
            &schema(),
            &values(json!({ "mood": "calm", "weight": 1, "note": ["a"] })),
        );

        assert_eq!(
            violations,
            vec![FieldViolation { key: "note", reason: ViolationReason::NotText }]
        );
    }

    #[test]
    fn test_violation_converts_to_editor_error() {
        let err: EditorError = FieldViolation { key: "text", reason: ViolationReason::Missing }.into();

        assert_eq!(
            err,
            EditorError::MissingOrInvalidField {
                key: "text".to_owned(),
                reason: "value is required".to_owned(),
            }
        );
    }
}
