//! Typed student records built from a normalized table.

use serde::{Deserialize, Serialize};

use super::level::{Category, Level};
use crate::schema::{Dimension, Field, SchemaBinding, Subject};

/// A subject result: the normalized cell text and its parsed level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Normalized cell text (`L2`, `NA`, `LONGABSENT`, ...).
    pub raw: String,
    /// Parsed level; `None` for anything outside L0..L5.
    pub level: Option<Level>,
}

impl Assessment {
    /// Classify an already-normalized value.
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let level = Level::parse(&raw);
        Self { raw, level }
    }

    /// Derived category, missing when the value is not a level.
    pub fn category(&self) -> Option<Category> {
        self.level.map(|l| l.category())
    }

    /// Derived score, missing when the value is not a level.
    pub fn score(&self) -> Option<u8> {
        self.level.map(|l| l.score())
    }
}

/// One row of the assessment sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub ward: String,
    pub school_name: String,
    pub class: String,
    pub medium: String,
    pub attendance: String,
    pub reading: Assessment,
    pub writing: Assessment,
    pub numeracy: Assessment,
}

impl StudentRecord {
    /// Build a record from a normalized row. Absent columns read as blank.
    pub fn from_row(row: &[String], binding: &SchemaBinding) -> Self {
        let cell = |field: Field| -> String {
            binding
                .index(field)
                .and_then(|i| row.get(i))
                .cloned()
                .unwrap_or_default()
        };

        Self {
            ward: cell(Field::Ward),
            school_name: cell(Field::SchoolName),
            class: cell(Field::Class),
            medium: cell(Field::Medium),
            attendance: cell(Field::Attendance),
            reading: Assessment::classify(cell(Field::Reading)),
            writing: Assessment::classify(cell(Field::Writing)),
            numeracy: Assessment::classify(cell(Field::Numeracy)),
        }
    }

    pub fn assessment(&self, subject: Subject) -> &Assessment {
        match subject {
            Subject::Reading => &self.reading,
            Subject::Writing => &self.writing,
            Subject::Numeracy => &self.numeracy,
        }
    }

    /// Value of a grouping dimension. Missing categories are `None`.
    pub fn value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Ward => Some(self.ward.as_str()),
            Dimension::SchoolName => Some(self.school_name.as_str()),
            Dimension::Class => Some(self.class.as_str()),
            Dimension::Medium => Some(self.medium.as_str()),
            Dimension::Attendance => Some(self.attendance.as_str()),
            Dimension::Level(subject) => Some(self.assessment(subject).raw.as_str()),
            Dimension::Category(subject) => self.assessment(subject).category().map(|c| c.label()),
        }
    }
}
