//! Mean learning scores per group.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::view::{ChartKind, ChartSeries, TableView, Tabulate, compare_labels, optional_number};
use crate::classify::StudentRecord;
use crate::schema::{Dimension, Subject};

/// Running mean that skips missing values.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn add(&mut self, value: Option<u8>) {
        if let Some(v) = value {
            self.sum += f64::from(v);
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Mean scores of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub group: String,
    pub reading: Option<f64>,
    pub writing: Option<f64>,
    pub numeracy: Option<f64>,
    /// Sum of the three subject means; missing if any mean is missing.
    pub total: Option<f64>,
    /// Records in the group.
    pub records: usize,
}

impl GroupScore {
    pub fn mean(&self, subject: Subject) -> Option<f64> {
        match subject {
            Subject::Reading => self.reading,
            Subject::Writing => self.writing,
            Subject::Numeracy => self.numeracy,
        }
    }
}

/// Mean scores of every group of a dimension, in group order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub dimension: Dimension,
    pub rows: Vec<GroupScore>,
}

impl ScoreTable {
    pub fn row(&self, group: &str) -> Option<&GroupScore> {
        self.rows.iter().find(|r| r.group == group)
    }

    /// Groups by descending total, missing totals last, ties by label.
    pub fn ranked(&self) -> Vec<&GroupScore> {
        let mut ranked: Vec<&GroupScore> = self.rows.iter().collect();
        ranked.sort_by(|a, b| match (a.total, b.total) {
            (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| compare_labels(&a.group, &b.group)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_labels(&a.group, &b.group),
        });
        ranked
    }

    /// Highest total among groups with a defined total.
    pub fn best(&self) -> Option<&GroupScore> {
        self.ranked().into_iter().find(|r| r.total.is_some())
    }

    /// Lowest total among groups with a defined total.
    pub fn worst(&self) -> Option<&GroupScore> {
        self.ranked().into_iter().rev().find(|r| r.total.is_some())
    }
}

/// Mean subject score per group, ignoring records without a level.
pub fn score_by_group(records: &[&StudentRecord], dimension: Dimension) -> ScoreTable {
    let mut groups: BTreeMap<&str, ([MeanAccumulator; 3], usize)> = BTreeMap::new();
    for record in records {
        let Some(group) = record.value(dimension) else {
            continue;
        };
        let (accumulators, count) = groups.entry(group).or_default();
        for (acc, subject) in accumulators.iter_mut().zip(Subject::ALL) {
            acc.add(record.assessment(subject).score());
        }
        *count += 1;
    }

    let mut rows: Vec<GroupScore> = groups
        .into_iter()
        .map(|(group, (accumulators, count))| {
            let [reading, writing, numeracy] = accumulators.map(|a| a.mean());
            let total = match (reading, writing, numeracy) {
                (Some(r), Some(w), Some(n)) => Some(r + w + n),
                _ => None,
            };
            GroupScore {
                group: group.to_string(),
                reading,
                writing,
                numeracy,
                total,
                records: count,
            }
        })
        .collect();
    rows.sort_by(|a, b| compare_labels(&a.group, &b.group));

    ScoreTable { dimension, rows }
}

impl Tabulate for ScoreTable {
    fn to_table(&self) -> TableView {
        let mut columns = vec![self.dimension.label()];
        columns.extend(Subject::ALL.iter().map(|s| s.score_column()));
        columns.push("Total_Score".to_string());

        let mut table = TableView::new(columns);
        for row in self.ranked() {
            let mut values = vec![Value::from(row.group.clone())];
            values.extend(Subject::ALL.iter().map(|&s| optional_number(row.mean(s))));
            values.push(optional_number(row.total));
            table.push_row(values);
        }
        table
    }

    fn to_series(&self) -> Vec<ChartSeries> {
        let kind = match self.dimension {
            Dimension::Medium => ChartKind::Line,
            _ => ChartKind::Bar,
        };
        let rows = match kind {
            ChartKind::Line => self.rows.iter().collect::<Vec<_>>(),
            _ => self.ranked(),
        };

        Subject::ALL
            .iter()
            .map(|&subject| {
                rows.iter()
                    .filter_map(|row| row.mean(subject).map(|m| (row, m)))
                    .fold(
                        ChartSeries::new(subject.score_column(), kind),
                        |series, (row, mean)| series.point(row.group.clone(), mean),
                    )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Assessment;

    fn record(ward: &str, reading: &str, writing: &str, numeracy: &str) -> StudentRecord {
        StudentRecord {
            ward: ward.into(),
            school_name: "Mps Marol".into(),
            class: "I".into(),
            medium: "Marathi".into(),
            attendance: "Present".into(),
            reading: Assessment::classify(reading),
            writing: Assessment::classify(writing),
            numeracy: Assessment::classify(numeracy),
        }
    }

    #[test]
    fn test_mean_ignores_missing_scores() {
        let records = vec![
            record("1", "L0", "L0", "L3"),
            record("1", "L0", "L0", "L4"),
            record("1", "L0", "L0", "NA"),
        ];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let table = score_by_group(&refs, Dimension::Ward);

        let ward = table.row("1").unwrap();
        assert_eq!(ward.numeracy, Some(3.5));
        assert_eq!(ward.reading, Some(0.0));
        assert_eq!(ward.total, Some(3.5));
        assert_eq!(ward.records, 3);
    }

    #[test]
    fn test_ranking_and_extremes() {
        let records = vec![
            record("1", "L1", "L1", "L1"),
            record("2", "L5", "L4", "L5"),
            record("3", "L2", "L2", "L2"),
            record("4", "NA", "L2", "L2"),
        ];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let table = score_by_group(&refs, Dimension::Ward);

        let order: Vec<&str> = table.ranked().iter().map(|r| r.group.as_str()).collect();
        assert_eq!(order, vec!["2", "3", "1", "4"]);
        assert_eq!(table.best().map(|r| r.group.as_str()), Some("2"));
        assert_eq!(table.worst().map(|r| r.group.as_str()), Some("1"));
        assert_eq!(table.row("4").unwrap().total, None);
    }

    #[test]
    fn test_no_defined_totals() {
        let records = vec![record("1", "NA", "NA", "NA")];
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let table = score_by_group(&refs, Dimension::Ward);
        assert!(table.best().is_none());
        assert!(table.worst().is_none());

        let view = table.to_table();
        assert_eq!(view.rows[0]["Total_Score"], Value::Null);
    }

    #[test]
    fn test_medium_series_keeps_group_order() {
        let records = vec![
            record("1", "L1", "L1", "L1"),
            record("1", "L5", "L5", "L5"),
        ];
        let mut records = records;
        records[0].medium = "Urdu".into();
        records[1].medium = "Hindi".into();
        let refs: Vec<&StudentRecord> = records.iter().collect();
        let series = score_by_group(&refs, Dimension::Medium).to_series();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].kind, ChartKind::Line);
        let labels: Vec<&str> = series[0].points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Hindi", "Urdu"]);
    }
}
