//! Property-based tests for normalization and aggregation.
//!
//! ```bash
//! cargo test -p utthan --test property_tests
//! PROPTEST_CASES=10000 cargo test -p utthan --test property_tests
//! ```

use proptest::prelude::*;

use utthan::aggregate::{attendance_by_group, cross_tab, level_distribution, value_distribution};
use utthan::classify::{Assessment, Category, Level, StudentRecord};
use utthan::normalize::{Normalizer, canonical_attendance, normalize_level};
use utthan::{DataTable, Dimension, SchemaBinding, Subject};

// =============================================================================
// Test Strategies
// =============================================================================

const HEADERS: &[&str] = &[
    "Ward", "School Name", "Class", "Medium", "Attendance", "Reading", "Writing", "Numeracy",
];

/// Cell text with the kinds of noise field sheets carry.
fn messy_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ ]{0,2}[a-zA-Z]{1,10}( [a-zA-Z]{1,8})?[ ]{0,2}",
        "[ ]{0,2}(level|LEVEL|Level|l|L) ?[0-9][ ]{0,2}",
        "(longabsent|Long Absent|LONG ABSENT|nan|NaN|N/A|na|Present|absent| )",
        "[0-9]{1,3}",
        ".{0,12}",
    ]
}

fn messy_table() -> impl Strategy<Value = DataTable> {
    prop::collection::vec(prop::collection::vec(messy_cell(), HEADERS.len()), 0..20).prop_map(
        |rows| DataTable::new(HEADERS.iter().map(|h| format!(" {h} ")).collect(), rows),
    )
}

fn level_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u8..=5).prop_map(|n| format!("L{n}")),
        Just("NA".to_string()),
        Just("LONGABSENT".to_string()),
        "[A-Z0-9]{0,4}",
    ]
}

fn record() -> impl Strategy<Value = StudentRecord> {
    (
        "[1-4]",
        "(I|II|III|IV)",
        "(Present|Absent|Long Absent|NA)",
        level_text(),
    )
        .prop_map(|(ward, class, attendance, reading)| StudentRecord {
            ward,
            school_name: "School".to_string(),
            class,
            medium: "Marathi".to_string(),
            attendance,
            reading: Assessment::classify(reading),
            writing: Assessment::classify("L1"),
            numeracy: Assessment::classify("L1"),
        })
}

fn canonical() -> Vec<String> {
    vec!["Present".into(), "Absent".into(), "Long Absent".into()]
}

// =============================================================================
// Normalization
// =============================================================================

proptest! {
    #[test]
    fn normalize_is_idempotent(table in messy_table()) {
        let normalizer = Normalizer::new();
        let once = normalizer.normalize(&table);
        let twice = normalizer.normalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalize_keeps_shape(table in messy_table()) {
        let normalized = Normalizer::new().normalize(&table);
        prop_assert_eq!(normalized.column_count(), table.column_count());
        prop_assert_eq!(normalized.row_count(), table.row_count());
    }

    #[test]
    fn long_absent_spellings_are_canonical(
        long in "[Ll][Oo][Nn][Gg]",
        absent in "[Aa][Bb][Ss][Ee][Nn][Tt]",
        gap in "[ ]{0,3}",
        pad in "[ ]{0,2}",
    ) {
        let raw = format!("{pad}{long}{gap}{absent}{pad}");
        prop_assert_eq!(canonical_attendance(&raw), "Long Absent");
    }

    #[test]
    fn level_normalization_has_no_level_prefix(value in ".{0,20}") {
        let normalized = normalize_level(&value);
        prop_assert!(!normalized.contains("LEVEL"));
        prop_assert!(!normalized.chars().any(char::is_whitespace));
        prop_assert_eq!(normalize_level(&normalized), normalized.clone());
    }
}

// =============================================================================
// Classification
// =============================================================================

proptest! {
    #[test]
    fn classifier_is_total(value in ".{0,8}") {
        let assessment = Assessment::classify(value.clone());
        match Level::parse(&value) {
            Some(level) => {
                let expected = match level {
                    Level::L0 | Level::L1 => Category::NeedsImprovement,
                    Level::L2 | Level::L3 => Category::DevelopingStage,
                    Level::L4 | Level::L5 => Category::Progressive,
                };
                prop_assert_eq!(assessment.category(), Some(expected));
                prop_assert!(assessment.score().is_some_and(|s| s <= 5));
            }
            None => {
                prop_assert_eq!(assessment.category(), None);
                prop_assert_eq!(assessment.score(), None);
            }
        }
    }
}

// =============================================================================
// Aggregation
// =============================================================================

proptest! {
    #[test]
    fn attendance_percentages_sum_to_100(records in prop::collection::vec(record(), 1..60)) {
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let table = attendance_by_group(&refs, Dimension::Ward, &canonical());

        for status in canonical() {
            prop_assert!(table.statuses.contains(&status));
        }
        for row in &table.rows {
            prop_assert!(row.total > 0);
            let sum: f64 = table.statuses.iter().map(|s| row.percentage(s).or_zero()).sum();
            prop_assert!((sum - 100.0).abs() < 1e-6, "row {} sums to {}", row.group, sum);
        }
        prop_assert_eq!(table.total(), records.len());
    }

    #[test]
    fn crosstab_margins_match_distributions(records in prop::collection::vec(record(), 0..60)) {
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let tab = cross_tab(&refs, Dimension::Class, Dimension::Attendance);
        let classes = value_distribution(&refs, Dimension::Class);
        let statuses = value_distribution(&refs, Dimension::Attendance);

        for row in &classes.rows {
            prop_assert_eq!(tab.row_total(&row.value), row.count);
        }
        for row in &statuses.rows {
            prop_assert_eq!(tab.column_total(&row.value), row.count);
        }
        prop_assert_eq!(tab.grand_total, records.len());
    }

    #[test]
    fn level_distribution_counts_only_levels(records in prop::collection::vec(record(), 0..60)) {
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let dist = level_distribution(&refs, Subject::Reading);
        let valid = records.iter().filter(|r| r.reading.level.is_some()).count();

        prop_assert_eq!(dist.total, valid);
        prop_assert_eq!(dist.total + dist.excluded, records.len());
        prop_assert!(dist.rows.windows(2).all(|w| w[0].level < w[1].level));
    }
}

#[test]
fn binding_resolves_padded_headers() {
    let headers: Vec<String> = HEADERS.iter().map(|h| format!(" {h} ")).collect();
    assert!(SchemaBinding::resolve(&headers).missing().is_empty());
}
