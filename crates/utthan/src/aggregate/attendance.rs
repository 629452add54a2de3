//! Attendance status counts per group.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::view::{
    ChartKind, ChartSeries, ColumnLabels, Percentage, TableView, Tabulate, compare_labels,
};
use crate::classify::StudentRecord;
use crate::schema::Dimension;

/// Header of the per-group total column.
pub const TOTAL_COLUMN: &str = "Total Students";

/// Status counts for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub group: String,
    /// Count per status, in table column order, zero-filled.
    pub counts: IndexMap<String, usize>,
    pub total: usize,
}

impl AttendanceRow {
    pub fn count(&self, status: &str) -> usize {
        self.counts.get(status).copied().unwrap_or(0)
    }

    pub fn percentage(&self, status: &str) -> Percentage {
        Percentage::of(self.count(status), self.total)
    }
}

/// Attendance breakdown of every group of a dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceTable {
    pub dimension: Dimension,
    /// Status columns: the configured canonical statuses first, then any
    /// other status observed in the data.
    pub statuses: Vec<String>,
    pub rows: Vec<AttendanceRow>,
}

impl AttendanceTable {
    pub fn row(&self, group: &str) -> Option<&AttendanceRow> {
        self.rows.iter().find(|r| r.group == group)
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.total).sum()
    }
}

/// Count records per (group, attendance status).
///
/// Every status in `canonical` is a column even when no record has it.
/// Statuses outside `canonical` (such as `NA`) get their own columns so each
/// row's percentages account for the whole group.
pub fn attendance_by_group(
    records: &[&StudentRecord],
    dimension: Dimension,
    canonical: &[String],
) -> AttendanceTable {
    let mut groups: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for record in records {
        let Some(group) = record.value(dimension) else {
            continue;
        };
        *groups
            .entry(group)
            .or_default()
            .entry(record.attendance.as_str())
            .or_insert(0) += 1;
    }

    let mut extra: Vec<&str> = groups
        .values()
        .flat_map(|counts| counts.keys().copied())
        .filter(|status| !canonical.iter().any(|c| c == status))
        .collect();
    extra.sort_by(|a, b| compare_labels(a, b));
    extra.dedup();

    let statuses: Vec<String> = canonical
        .iter()
        .cloned()
        .chain(extra.into_iter().map(String::from))
        .collect();

    let mut rows: Vec<AttendanceRow> = groups
        .into_iter()
        .map(|(group, observed)| {
            let counts: IndexMap<String, usize> = statuses
                .iter()
                .map(|s| (s.clone(), observed.get(s.as_str()).copied().unwrap_or(0)))
                .collect();
            let total = observed.values().sum();
            AttendanceRow {
                group: group.to_string(),
                counts,
                total,
            }
        })
        .collect();
    rows.sort_by(|a, b| compare_labels(&a.group, &b.group));

    AttendanceTable {
        dimension,
        statuses,
        rows,
    }
}

impl Tabulate for AttendanceTable {
    fn to_table(&self) -> TableView {
        let dimension = self.dimension.label();
        let mut columns = ColumnLabels::reserving([dimension.clone(), TOTAL_COLUMN.to_string()]);
        columns.fixed(dimension);
        columns.fixed(TOTAL_COLUMN);
        for status in &self.statuses {
            let label = columns.data(status.clone());
            columns.data(format!("{}%", label));
        }

        let mut table = columns.into_table();
        for row in &self.rows {
            let mut values = vec![Value::from(row.group.clone()), Value::from(row.total)];
            for status in &self.statuses {
                values.push(Value::from(row.count(status)));
                values.push(Value::from(row.percentage(status).to_string()));
            }
            table.push_row(values);
        }
        table
    }

    fn to_series(&self) -> Vec<ChartSeries> {
        self.statuses
            .iter()
            .map(|status| {
                self.rows.iter().fold(
                    ChartSeries::new(status.clone(), ChartKind::Bar),
                    |series, row| series.point(row.group.clone(), row.count(status) as f64),
                )
            })
            .collect()
    }
}
