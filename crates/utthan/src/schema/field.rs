//! Column and dimension definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A column the assessment sheet is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Ward,
    SchoolName,
    Class,
    Medium,
    Attendance,
    Reading,
    Writing,
    Numeracy,
}

impl Field {
    /// Every expected column, in sheet order.
    pub const ALL: [Field; 8] = [
        Field::Ward,
        Field::SchoolName,
        Field::Class,
        Field::Medium,
        Field::Attendance,
        Field::Reading,
        Field::Writing,
        Field::Numeracy,
    ];

    /// Canonical header text.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Ward => "Ward",
            Field::SchoolName => "School Name",
            Field::Class => "Class",
            Field::Medium => "Medium",
            Field::Attendance => "Attendance",
            Field::Reading => "Reading",
            Field::Writing => "Writing",
            Field::Numeracy => "Numeracy",
        }
    }

    /// Whether a raw header names this field.
    ///
    /// Matching ignores case, whitespace, underscores and punctuation, so
    /// `" school_name "` and `"SCHOOL NAME"` both name [`Field::SchoolName`].
    pub fn matches_header(&self, header: &str) -> bool {
        header_key(header) == header_key(self.label())
    }

    /// The assessed subject stored in this column, if any.
    pub fn subject(&self) -> Option<Subject> {
        match self {
            Field::Reading => Some(Subject::Reading),
            Field::Writing => Some(Subject::Writing),
            Field::Numeracy => Some(Subject::Numeracy),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reduce a header to lowercase alphanumerics for tolerant matching.
pub fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// An assessed subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Reading,
    Writing,
    Numeracy,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Reading, Subject::Writing, Subject::Numeracy];

    pub fn label(&self) -> &'static str {
        match self {
            Subject::Reading => "Reading",
            Subject::Writing => "Writing",
            Subject::Numeracy => "Numeracy",
        }
    }

    /// Column holding the raw level.
    pub fn field(&self) -> Field {
        match self {
            Subject::Reading => Field::Reading,
            Subject::Writing => Field::Writing,
            Subject::Numeracy => Field::Numeracy,
        }
    }

    /// Header of the derived category column, e.g. `Reading_Category`.
    pub fn category_column(&self) -> String {
        format!("{}_Category", self.label())
    }

    /// Header of the derived score column, e.g. `Reading_Score`.
    pub fn score_column(&self) -> String {
        format!("{}_Score", self.label())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reading" => Ok(Subject::Reading),
            "writing" => Ok(Subject::Writing),
            "numeracy" | "math" | "maths" => Ok(Subject::Numeracy),
            _ => Err(format!(
                "Unknown subject: {}. Use reading, writing, or numeracy.",
                s
            )),
        }
    }
}

/// Something records can be grouped or counted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "subject", rename_all = "snake_case")]
pub enum Dimension {
    Ward,
    SchoolName,
    Class,
    Medium,
    Attendance,
    /// Normalized level text of a subject.
    Level(Subject),
    /// Derived category of a subject.
    Category(Subject),
}

impl Dimension {
    /// Source column the dimension is read from.
    pub fn field(&self) -> Field {
        match self {
            Dimension::Ward => Field::Ward,
            Dimension::SchoolName => Field::SchoolName,
            Dimension::Class => Field::Class,
            Dimension::Medium => Field::Medium,
            Dimension::Attendance => Field::Attendance,
            Dimension::Level(subject) | Dimension::Category(subject) => subject.field(),
        }
    }

    /// Column label for tables.
    pub fn label(&self) -> String {
        match self {
            Dimension::Level(subject) => subject.label().to_string(),
            Dimension::Category(subject) => subject.category_column(),
            other => other.field().label().to_string(),
        }
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match header_key(s).as_str() {
            "ward" => Ok(Dimension::Ward),
            "schoolname" | "school" => Ok(Dimension::SchoolName),
            "class" => Ok(Dimension::Class),
            "medium" => Ok(Dimension::Medium),
            "attendance" => Ok(Dimension::Attendance),
            other => {
                for subject in Subject::ALL {
                    let key = header_key(subject.label());
                    if other == key {
                        return Ok(Dimension::Level(subject));
                    }
                    if other == format!("{}category", key) {
                        return Ok(Dimension::Category(subject));
                    }
                }
                Err(format!(
                    "Unknown dimension: {}. Use ward, school, class, medium, attendance, \
                     a subject, or <subject>_category.",
                    s
                ))
            }
        }
    }
}
