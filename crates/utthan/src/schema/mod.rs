//! Typed schema for the assessment sheet.

mod binding;
mod field;

pub use binding::SchemaBinding;
pub use field::{Dimension, Field, Subject, header_key};
