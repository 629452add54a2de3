//! Value, level and category distributions.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::view::{ChartKind, ChartSeries, Percentage, TableView, Tabulate, compare_labels};
use crate::classify::{Category, Level, StudentRecord};
use crate::schema::{Dimension, Subject};

/// Count and share of one distinct value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRow {
    pub value: String,
    pub count: usize,
    pub percentage: Percentage,
}

/// Counts per distinct value of a dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub dimension: Dimension,
    /// Most frequent first; ties by value.
    pub rows: Vec<DistributionRow>,
    pub total: usize,
}

impl Distribution {
    pub fn count(&self, value: &str) -> usize {
        self.rows
            .iter()
            .find(|r| r.value == value)
            .map(|r| r.count)
            .unwrap_or(0)
    }
}

/// Count records per distinct value of `dimension`.
///
/// Records with no value for the dimension (a missing category) are not
/// counted.
pub fn value_distribution(records: &[&StudentRecord], dimension: Dimension) -> Distribution {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        if let Some(value) = record.value(dimension) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let total: usize = counts.values().sum();
    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| Reverse(a.1).cmp(&Reverse(b.1)).then_with(|| compare_labels(a.0, b.0)));

    let rows = entries
        .into_iter()
        .map(|(value, count)| DistributionRow {
            value: value.to_string(),
            count,
            percentage: Percentage::of(count, total),
        })
        .collect();

    Distribution {
        dimension,
        rows,
        total,
    }
}

impl Tabulate for Distribution {
    fn to_table(&self) -> TableView {
        let mut table = TableView::new(vec![
            self.dimension.label(),
            "Count".to_string(),
            "Percentage".to_string(),
        ]);
        for row in &self.rows {
            table.push_row(vec![
                Value::from(row.value.clone()),
                Value::from(row.count),
                Value::from(row.percentage.to_string()),
            ]);
        }
        table
    }

    fn to_series(&self) -> Vec<ChartSeries> {
        let kind = match self.dimension {
            Dimension::Attendance => ChartKind::Donut,
            _ => ChartKind::Bar,
        };
        vec![self.rows.iter().fold(
            ChartSeries::new(self.dimension.label(), kind),
            |series, row| series.point(row.value.clone(), row.count as f64),
        )]
    }
}

/// Count and share of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCount {
    pub level: Level,
    pub count: usize,
    pub percentage: Percentage,
}

/// Level counts of one subject over records holding a valid level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub subject: Subject,
    /// Observed levels only, L0 first.
    pub rows: Vec<LevelCount>,
    /// Records with a valid level.
    pub total: usize,
    /// Records left out because their value is not a level.
    pub excluded: usize,
}

impl LevelDistribution {
    pub fn count(&self, level: Level) -> usize {
        self.rows
            .iter()
            .find(|r| r.level == level)
            .map(|r| r.count)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Count records per level for a subject, ignoring non-level values.
pub fn level_distribution(records: &[&StudentRecord], subject: Subject) -> LevelDistribution {
    let mut counts: BTreeMap<Level, usize> = BTreeMap::new();
    let mut excluded = 0;
    for record in records {
        match record.assessment(subject).level {
            Some(level) => *counts.entry(level).or_insert(0) += 1,
            None => excluded += 1,
        }
    }

    let total: usize = counts.values().sum();
    let rows = counts
        .into_iter()
        .map(|(level, count)| LevelCount {
            level,
            count,
            percentage: Percentage::of(count, total),
        })
        .collect();

    LevelDistribution {
        subject,
        rows,
        total,
        excluded,
    }
}

impl Tabulate for LevelDistribution {
    fn to_table(&self) -> TableView {
        let mut table = TableView::new(vec![
            "Level".to_string(),
            "Count".to_string(),
            "Percentage".to_string(),
        ]);
        for row in &self.rows {
            table.push_row(vec![
                Value::from(row.level.label()),
                Value::from(row.count),
                Value::from(row.percentage.to_string()),
            ]);
        }
        table
    }

    fn to_series(&self) -> Vec<ChartSeries> {
        vec![self.rows.iter().fold(
            ChartSeries::new(format!("{} Distribution", self.subject), ChartKind::Donut),
            |series, row| series.point(row.level.label(), row.count as f64),
        )]
    }
}

/// Count and share of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
    pub percentage: Percentage,
    /// Display color, carried for the chart legend only.
    pub color: String,
}

/// Category counts of one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub subject: Subject,
    /// Observed categories, lowest band first.
    pub rows: Vec<CategoryCount>,
    pub total: usize,
}

impl CategoryDistribution {
    pub fn count(&self, category: Category) -> usize {
        self.rows
            .iter()
            .find(|r| r.category == category)
            .map(|r| r.count)
            .unwrap_or(0)
    }
}

/// Count records per derived category of a subject.
pub fn category_distribution(records: &[&StudentRecord], subject: Subject) -> CategoryDistribution {
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();
    for record in records {
        if let Some(category) = record.assessment(subject).category() {
            *counts.entry(category).or_insert(0) += 1;
        }
    }

    let total: usize = counts.values().sum();
    let rows = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category,
            count,
            percentage: Percentage::of(count, total),
            color: category.color().to_string(),
        })
        .collect();

    CategoryDistribution {
        subject,
        rows,
        total,
    }
}

impl Tabulate for CategoryDistribution {
    fn to_table(&self) -> TableView {
        let mut table = TableView::new(vec![
            "Category".to_string(),
            "Count".to_string(),
            "Percentage".to_string(),
            "Color".to_string(),
        ]);
        for row in &self.rows {
            table.push_row(vec![
                Value::from(row.category.label()),
                Value::from(row.count),
                Value::from(row.percentage.to_string()),
                Value::from(row.color.clone()),
            ]);
        }
        table
    }

    fn to_series(&self) -> Vec<ChartSeries> {
        vec![self.rows.iter().fold(
            ChartSeries::new(format!("{} Overview", self.subject), ChartKind::Pie),
            |series, row| {
                series.colored_point(row.category.label(), row.count as f64, row.color.clone())
            },
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Assessment;

    fn record(medium: &str, reading: &str) -> StudentRecord {
        StudentRecord {
            ward: "1".into(),
            school_name: "Mps Marol".into(),
            class: "I".into(),
            medium: medium.into(),
            attendance: "Present".into(),
            reading: Assessment::classify(reading),
            writing: Assessment::classify("NA"),
            numeracy: Assessment::classify("NA"),
        }
    }

    #[test]
    fn test_value_distribution_orders_by_count() {
        let records = vec![
            record("Urdu", "L1"),
            record("Marathi", "L1"),
            record("Marathi", "L1"),
            record("Hindi", "L1"),
        ];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let dist = value_distribution(&refs, Dimension::Medium);

        let values: Vec<&str> = dist.rows.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["Marathi", "Hindi", "Urdu"]);
        assert_eq!(dist.total, 4);
        assert_eq!(dist.rows[0].percentage.to_string(), "50.00%");

        let sum: f64 = dist.rows.iter().map(|r| r.percentage.or_zero()).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_level_distribution_excludes_non_levels() {
        let records = vec![
            record("Marathi", "L2"),
            record("Marathi", "L2"),
            record("Marathi", "NA"),
            record("Marathi", "LONGABSENT"),
            record("Marathi", "L5"),
        ];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let dist = level_distribution(&refs, Subject::Reading);

        assert_eq!(dist.total, 3);
        assert_eq!(dist.excluded, 2);
        assert_eq!(dist.rows.len(), 2);
        assert_eq!(dist.count(Level::L2), 2);
        assert_eq!(dist.count(Level::L5), 1);
        assert_eq!(dist.rows[0].level, Level::L2);
        assert_eq!(dist.rows[0].percentage.to_string(), "66.67%");
    }

    #[test]
    fn test_level_distribution_sorted_by_ordinal() {
        let records = vec![record("M", "L5"), record("M", "L0"), record("M", "L3")];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let dist = level_distribution(&refs, Subject::Reading);
        let levels: Vec<Level> = dist.rows.iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![Level::L0, Level::L3, Level::L5]);
    }

    #[test]
    fn test_level_distribution_of_no_levels_is_empty() {
        let records = vec![record("M", "NA")];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let dist = level_distribution(&refs, Subject::Reading);
        assert!(dist.is_empty());
        assert_eq!(dist.total, 0);
    }

    #[test]
    fn test_category_distribution_with_colors() {
        let records = vec![
            record("M", "L0"),
            record("M", "L5"),
            record("M", "L4"),
            record("M", "NA"),
        ];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let dist = category_distribution(&refs, Subject::Reading);

        assert_eq!(dist.total, 3);
        assert_eq!(dist.count(Category::Progressive), 2);
        assert_eq!(dist.count(Category::NeedsImprovement), 1);
        assert_eq!(dist.count(Category::DevelopingStage), 0);
        assert_eq!(dist.rows[0].category, Category::NeedsImprovement);
        assert_eq!(dist.rows[1].color, "green");

        let series = dist.to_series();
        assert_eq!(series[0].points[1].color.as_deref(), Some("green"));
    }

    #[test]
    fn test_category_dimension_skips_missing() {
        let records = vec![record("M", "L2"), record("M", "NA")];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let dist = value_distribution(&refs, Dimension::Category(Subject::Reading));
        assert_eq!(dist.total, 1);
        assert_eq!(dist.count("Developing stage"), 1);
    }
}
