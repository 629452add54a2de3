//! Session configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, UtthanError};
use crate::input::LoaderConfig;
use crate::normalize::{canonical_attendance, normalize_code};

/// Configuration for loading and aggregating a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtthanConfig {
    /// Loader configuration.
    pub loader: LoaderConfig,
    /// Attendance statuses that always appear as columns, in column order.
    pub attendance_statuses: Vec<String>,
    /// Classes that get their own attendance chart, in display order.
    pub class_order: Vec<String>,
    /// Fail on a missing required column instead of degrading the views.
    pub strict_schema: bool,
}

impl Default for UtthanConfig {
    fn default() -> Self {
        Self {
            loader: LoaderConfig::default(),
            attendance_statuses: vec!["Present".into(), "Absent".into(), "Long Absent".into()],
            class_order: vec!["I".into(), "II".into(), "III".into(), "IV".into()],
            strict_schema: true,
        }
    }
}

impl UtthanConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| UtthanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: UtthanConfig = serde_json::from_str(&contents)?;
        config.validated()
    }

    /// Canonicalize configured labels and reject unusable settings.
    pub fn validated(mut self) -> Result<Self> {
        let mut statuses: Vec<String> = Vec::new();
        for status in &self.attendance_statuses {
            let canonical = canonical_attendance(status);
            if !statuses.contains(&canonical) {
                statuses.push(canonical);
            }
        }
        if statuses.is_empty() {
            return Err(UtthanError::Config(
                "at least one attendance status is required".to_string(),
            ));
        }
        self.attendance_statuses = statuses;

        self.class_order = self.class_order.iter().map(|c| normalize_code(c)).collect();
        self.class_order.retain(|c| !c.is_empty());

        self.loader.check()?;
        Ok(self)
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.loader.sheet = Some(sheet.into());
        self
    }

    pub fn lenient(mut self) -> Self {
        self.strict_schema = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = UtthanConfig::default();
        assert!(config.strict_schema);
        assert_eq!(config.attendance_statuses, vec!["Present", "Absent", "Long Absent"]);
        assert_eq!(config.class_order, vec!["I", "II", "III", "IV"]);
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"attendance_statuses": ["present", "longabsent"], "strict_schema": false}}"#
        )
        .unwrap();

        let config = UtthanConfig::load(file.path()).unwrap();
        assert_eq!(config.attendance_statuses, vec!["Present", "Long Absent"]);
        assert!(!config.strict_schema);
        assert_eq!(config.class_order.len(), 4);
    }

    #[test]
    fn test_statuses_deduplicated() {
        let config = UtthanConfig {
            attendance_statuses: vec!["Present".into(), "present ".into(), "  ".into()],
            ..UtthanConfig::default()
        };
        let config = config.validated().unwrap();
        assert_eq!(config.attendance_statuses, vec!["Present", "NA"]);
    }

    #[test]
    fn test_empty_status_set_rejected() {
        let config = UtthanConfig {
            attendance_statuses: Vec::new(),
            ..UtthanConfig::default()
        };
        assert!(matches!(config.validated(), Err(UtthanError::Config(_))));
    }

    #[test]
    fn test_zero_max_rows_rejected() {
        let mut config = UtthanConfig::default();
        config.loader.max_rows = Some(0);
        assert!(matches!(config.validated(), Err(UtthanError::Config(_))));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"loader": {{"delimiter": "§"}}}}"#).unwrap();
        assert!(matches!(
            UtthanConfig::load(file.path()),
            Err(UtthanError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(UtthanConfig::load(file.path()), Err(UtthanError::Json(_))));
    }
}
