//! Scriptwright: event kind schema registry.
//!
//! A static, read-only catalog describing every event kind a chapter can
//! contain: its display metadata, its mandatory and optional fields, and a
//! pure validation of field values against those declarations.

pub mod builtin;
pub mod field;
pub mod registry;
pub mod schema;
pub mod validation;

pub use field::{EventFieldSpec, FieldDefault, FieldKind};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{EventCategory, EventKindSchema, KindDeclaration};
pub use validation::{EventReport, FieldViolation, ViolationReason};
