//! Static synonym table for attendance statuses.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const PRESENT: &str = "Present";
pub const ABSENT: &str = "Absent";
pub const LONG_ABSENT: &str = "Long Absent";
pub const NOT_AVAILABLE: &str = "NA";

/// Attendance spellings seen in field sheets and their canonical label.
///
/// Keys are compared after lowercasing and dropping whitespace, so the table
/// only lists distinct spellings, not casing variants.
pub const ATTENDANCE_ALIASES: &[(&str, &str)] = &[
    ("present", PRESENT),
    ("absent", ABSENT),
    ("longabsent", LONG_ABSENT),
    ("longabsentee", LONG_ABSENT),
    ("long-absent", LONG_ABSENT),
    ("long_absent", LONG_ABSENT),
    ("na", NOT_AVAILABLE),
    ("n/a", NOT_AVAILABLE),
    ("nan", NOT_AVAILABLE),
    ("none", NOT_AVAILABLE),
    ("null", NOT_AVAILABLE),
    ("", NOT_AVAILABLE),
];

static ALIAS_LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ATTENDANCE_ALIASES.iter().copied().collect());

fn alias_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map an attendance value to its canonical label.
///
/// Unrecognized values come back trimmed but otherwise unchanged.
pub fn canonical_attendance(value: &str) -> String {
    let trimmed = value.trim();
    match ALIAS_LOOKUP.get(alias_key(trimmed).as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_absent_variants() {
        for raw in [
            "Longabsent",
            "longabsent",
            "Long absent",
            "long absent",
            "LONG ABSENT",
            " Long  Absent ",
            "Long Absent",
        ] {
            assert_eq!(canonical_attendance(raw), "Long Absent", "input {raw:?}");
        }
    }

    #[test]
    fn test_na_variants() {
        for raw in ["Na", "nan", "NAN", "NaN", "", "   ", "N/A", "NA"] {
            assert_eq!(canonical_attendance(raw), "NA", "input {raw:?}");
        }
    }

    #[test]
    fn test_simple_statuses() {
        assert_eq!(canonical_attendance("present"), "Present");
        assert_eq!(canonical_attendance(" ABSENT"), "Absent");
    }

    #[test]
    fn test_unknown_passes_through_trimmed() {
        assert_eq!(canonical_attendance(" Transferred "), "Transferred");
    }

    #[test]
    fn test_canonical_labels_are_fixed_points() {
        for (_, canonical) in ATTENDANCE_ALIASES {
            assert_eq!(canonical_attendance(canonical), *canonical);
        }
    }
}
