//! Form building blocks: typed field options, field group rendering and
//! per-field validation messages.

pub mod field_group;
pub mod validation;

pub use field_group::{FieldGroup, FieldOptions, InputKind};
pub use validation::ValidationErrors;
