//! Table normalizer.

use crate::input::DataTable;
use crate::schema::{Field, SchemaBinding};

use super::aliases::canonical_attendance;

/// Rewrites a raw table into canonical form.
///
/// Applying the normalizer to its own output is a no-op. No column is added
/// or dropped; columns that are not expected fields are only trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize headers and every cell.
    pub fn normalize(&self, table: &DataTable) -> DataTable {
        let headers: Vec<String> = table.headers.iter().map(|h| h.trim().to_string()).collect();
        let binding = SchemaBinding::resolve(&headers);

        let rules: Vec<Option<Field>> = (0..headers.len())
            .map(|index| binding.field_at(index))
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(index, value)| match rules.get(index).copied().flatten() {
                        Some(field) => Self::normalize_value(field, value),
                        None => value.trim().to_string(),
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(
            rows = table.row_count(),
            bound = rules.iter().flatten().count(),
            "normalized table"
        );
        DataTable::new(headers, rows)
    }

    /// Normalize a single value of a known field.
    pub fn normalize_value(field: Field, value: &str) -> String {
        match field {
            Field::Attendance => canonical_attendance(value),
            Field::Medium | Field::SchoolName => normalize_name(value),
            Field::Ward | Field::Class => normalize_code(value),
            Field::Reading | Field::Writing | Field::Numeracy => normalize_level(value),
        }
    }
}

/// Trim and title-case a name (medium, school).
pub fn normalize_name(value: &str) -> String {
    title_case(value.trim())
}

/// Trim, collapse inner whitespace and uppercase an identifier (ward, class).
pub fn normalize_code(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Canonical level text: uppercase, no whitespace, `LEVEL` collapsed to `L`.
///
/// `"l 2"`, `"Level 2"` and `"LEVEL2"` all become `"L2"`. Replacement repeats
/// until no `LEVEL` remains so the result is stable under re-normalization.
pub fn normalize_level(value: &str) -> String {
    let mut level: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    while level.contains("LEVEL") {
        level = level.replace("LEVEL", "L");
    }
    level
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
///
/// Characters whose case mapping expands to several characters are kept
/// as-is.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_alpha = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            let mapped = if prev_alpha {
                single_char(ch.to_lowercase())
            } else {
                single_char(ch.to_uppercase())
            };
            out.push(mapped.unwrap_or(ch));
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn single_char(mut mapping: impl Iterator<Item = char>) -> Option<char> {
    let first = mapping.next()?;
    match mapping.next() {
        None => Some(first),
        Some(_) => None,
    }
}
