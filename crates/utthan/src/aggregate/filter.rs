//! Set-membership filters over ward, class and school.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::classify::StudentRecord;
use crate::normalize::{normalize_code, normalize_name};

/// Restricts records to selected wards, classes and schools.
///
/// An empty set places no restriction on that column. Values are normalized
/// the same way as the sheet, so `"ii"` selects class `II`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub wards: BTreeSet<String>,
    pub classes: BTreeSet<String>,
    pub schools: BTreeSet<String>,
}

impl RecordFilter {
    /// A filter that keeps every record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wards<I, S>(mut self, wards: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.wards
            .extend(wards.into_iter().map(|w| normalize_code(w.as_ref())));
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.classes
            .extend(classes.into_iter().map(|c| normalize_code(c.as_ref())));
        self
    }

    pub fn with_schools<I, S>(mut self, schools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.schools
            .extend(schools.into_iter().map(|s| normalize_name(s.as_ref())));
        self
    }

    /// True when no restriction is set.
    pub fn is_empty(&self) -> bool {
        self.wards.is_empty() && self.classes.is_empty() && self.schools.is_empty()
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        (self.wards.is_empty() || self.wards.contains(&record.ward))
            && (self.classes.is_empty() || self.classes.contains(&record.class))
            && (self.schools.is_empty() || self.schools.contains(&record.school_name))
    }

    /// Records passing the filter, in source order.
    pub fn apply<'a>(&self, records: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}
