//! Two-way frequency table with margins.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::view::{ChartKind, ChartSeries, ColumnLabels, TableView, Tabulate, compare_labels};
use crate::classify::StudentRecord;
use crate::schema::Dimension;

/// Label of the margin row and column.
pub const MARGIN_LABEL: &str = "All";

/// Record counts per (row value, column value) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTab {
    pub row_dimension: Dimension,
    pub column_dimension: Dimension,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `counts[r][c]` for `row_labels[r]` x `column_labels[c]`.
    pub counts: Vec<Vec<usize>>,
    pub row_totals: Vec<usize>,
    pub column_totals: Vec<usize>,
    pub grand_total: usize,
}

impl CrossTab {
    pub fn count(&self, row: &str, column: &str) -> usize {
        let r = self.row_labels.iter().position(|l| l == row);
        let c = self.column_labels.iter().position(|l| l == column);
        match (r, c) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    pub fn row_total(&self, row: &str) -> usize {
        self.row_labels
            .iter()
            .position(|l| l == row)
            .map(|r| self.row_totals[r])
            .unwrap_or(0)
    }

    pub fn column_total(&self, column: &str) -> usize {
        self.column_labels
            .iter()
            .position(|l| l == column)
            .map(|c| self.column_totals[c])
            .unwrap_or(0)
    }
}

/// Cross-tabulate two dimensions.
///
/// Records missing either value are left out. Labels are sorted with
/// numeric-aware ordering.
pub fn cross_tab(
    records: &[&StudentRecord],
    row_dimension: Dimension,
    column_dimension: Dimension,
) -> CrossTab {
    let mut cells: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    let mut row_set: BTreeSet<&str> = BTreeSet::new();
    let mut column_set: BTreeSet<&str> = BTreeSet::new();

    for record in records {
        let (Some(row), Some(column)) = (
            record.value(row_dimension),
            record.value(column_dimension),
        ) else {
            continue;
        };
        row_set.insert(row);
        column_set.insert(column);
        *cells.entry((row, column)).or_insert(0) += 1;
    }

    let mut row_labels: Vec<&str> = row_set.into_iter().collect();
    row_labels.sort_by(|a, b| compare_labels(a, b));
    let mut column_labels: Vec<&str> = column_set.into_iter().collect();
    column_labels.sort_by(|a, b| compare_labels(a, b));

    let counts: Vec<Vec<usize>> = row_labels
        .iter()
        .map(|row| {
            column_labels
                .iter()
                .map(|column| cells.get(&(*row, *column)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    let row_totals: Vec<usize> = counts.iter().map(|r| r.iter().sum()).collect();
    let column_totals: Vec<usize> = (0..column_labels.len())
        .map(|c| counts.iter().map(|r| r[c]).sum())
        .collect();
    let grand_total = row_totals.iter().sum();

    CrossTab {
        row_dimension,
        column_dimension,
        row_labels: row_labels.into_iter().map(String::from).collect(),
        column_labels: column_labels.into_iter().map(String::from).collect(),
        counts,
        row_totals,
        column_totals,
        grand_total,
    }
}

impl Tabulate for CrossTab {
    fn to_table(&self) -> TableView {
        let dimension = self.row_dimension.label();
        let mut columns = ColumnLabels::reserving([dimension.clone(), MARGIN_LABEL.to_string()]);
        columns.fixed(dimension);
        for label in &self.column_labels {
            columns.data(label.clone());
        }
        columns.fixed(MARGIN_LABEL);

        let mut table = columns.into_table();
        for (r, label) in self.row_labels.iter().enumerate() {
            let mut values = vec![Value::from(label.clone())];
            values.extend(self.counts[r].iter().map(|&n| Value::from(n)));
            values.push(Value::from(self.row_totals[r]));
            table.push_row(values);
        }

        let mut margin = vec![Value::from(MARGIN_LABEL)];
        margin.extend(self.column_totals.iter().map(|&n| Value::from(n)));
        margin.push(Value::from(self.grand_total));
        table.push_row(margin);
        table
    }

    fn to_series(&self) -> Vec<ChartSeries> {
        self.column_labels
            .iter()
            .enumerate()
            .map(|(c, column)| {
                self.row_labels.iter().enumerate().fold(
                    ChartSeries::new(column.clone(), ChartKind::Bar),
                    |series, (r, row)| series.point(row.clone(), self.counts[r][c] as f64),
                )
            })
            .collect()
    }
}
