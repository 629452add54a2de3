//! Presentation-neutral result shapes: tables and chart series.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A share of a total, undefined when the total is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(Option<f64>);

impl Percentage {
    /// `count / total * 100`, or undefined for an empty total.
    pub fn of(count: usize, total: usize) -> Self {
        if total == 0 {
            Percentage(None)
        } else {
            Percentage(Some(count as f64 / total as f64 * 100.0))
        }
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    /// Numeric value with undefined read as zero.
    pub fn or_zero(&self) -> f64 {
        self.0.unwrap_or(0.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.or_zero())
    }
}

/// An ordered table: column labels plus rows keyed by those labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<IndexMap<String, Value>>,
}

impl TableView {
    /// Create an empty table. Repeated labels get a ` (2)`, ` (3)`, ...
    /// suffix so every column keeps its own cell.
    pub fn new(columns: Vec<String>) -> Self {
        let mut labels = ColumnLabels::default();
        for column in columns {
            labels.data(column);
        }
        labels.into_table()
    }

    /// Append a row given as values in column order.
    pub fn push_row(&mut self, values: Vec<Value>) {
        let row = self.columns.iter().cloned().zip(values).collect();
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds column labels where fixed labels win over labels taken from data.
///
/// Fixed labels passed to [`ColumnLabels::reserving`] keep their exact text.
/// A data label equal to one of them, or to an earlier column, is
/// suffixed with ` (2)`, ` (3)`, ... instead of overwriting that column.
#[derive(Debug, Default)]
pub struct ColumnLabels {
    taken: HashSet<String>,
    labels: Vec<String>,
}

impl ColumnLabels {
    pub fn reserving<I, S>(fixed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: fixed.into_iter().map(Into::into).collect(),
            labels: Vec::new(),
        }
    }

    /// Append a reserved label as is.
    pub fn fixed(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.taken.insert(label.clone());
        self.labels.push(label);
    }

    /// Append a label taken from data, returning the label actually used.
    pub fn data(&mut self, label: impl Into<String>) -> String {
        let label = label.into();
        let unique = if !self.taken.contains(&label) {
            label
        } else {
            (2..)
                .map(|n| format!("{} ({})", label, n))
                .find(|candidate| !self.taken.contains(candidate))
                .unwrap_or_default()
        };
        self.taken.insert(unique.clone());
        self.labels.push(unique.clone());
        unique
    }

    pub fn into_table(self) -> TableView {
        TableView {
            columns: self.labels,
            rows: Vec::new(),
        }
    }
}

/// Chart style the series was shaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Donut,
}

/// One labelled value of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A named (label, value) series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub kind: ChartKind,
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, kind: ChartKind) -> Self {
        Self {
            name: name.into(),
            kind,
            points: Vec::new(),
        }
    }

    pub fn point(mut self, label: impl Into<String>, value: f64) -> Self {
        self.points.push(SeriesPoint {
            label: label.into(),
            value,
            color: None,
        });
        self
    }

    pub fn colored_point(
        mut self,
        label: impl Into<String>,
        value: f64,
        color: impl Into<String>,
    ) -> Self {
        self.points.push(SeriesPoint {
            label: label.into(),
            value,
            color: Some(color.into()),
        });
        self
    }
}

/// Results that render as a table and as chart series.
pub trait Tabulate {
    fn to_table(&self) -> TableView;

    fn to_series(&self) -> Vec<ChartSeries>;
}

/// Order group labels: numerically when both parse as numbers, else by text.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (finite_number(a), finite_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn finite_number(label: &str) -> Option<f64> {
    label.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// JSON number for an optional float, `null` when missing.
pub(crate) fn optional_number(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_formatting() {
        assert_eq!(Percentage::of(1, 2).to_string(), "50.00%");
        assert_eq!(Percentage::of(1, 3).to_string(), "33.33%");
        assert_eq!(Percentage::of(0, 4).to_string(), "0.00%");
    }

    #[test]
    fn test_percentage_of_empty_total_is_undefined() {
        let p = Percentage::of(0, 0);
        assert_eq!(p.value(), None);
        assert_eq!(p.or_zero(), 0.0);
        assert_eq!(p.to_string(), "0.00%");
        assert_eq!(serde_json::to_string(&p).unwrap(), "null");
    }

    #[test]
    fn test_compare_labels() {
        let mut wards = vec!["10", "2", "K/E", "1", "A"];
        wards.sort_by(|a, b| compare_labels(a, b));
        assert_eq!(wards, vec!["1", "2", "10", "A", "K/E"]);

        let mut classes = vec!["IV", "II", "I", "III"];
        classes.sort_by(|a, b| compare_labels(a, b));
        assert_eq!(classes, vec!["I", "II", "III", "IV"]);
    }

    #[test]
    fn test_table_push_row() {
        let mut table = TableView::new(vec!["Medium".into(), "Count".into()]);
        table.push_row(vec![Value::from("Marathi"), Value::from(3)]);
        assert_eq!(table.rows[0]["Medium"], Value::from("Marathi"));
        assert_eq!(table.rows[0]["Count"], Value::from(3));
    }

    #[test]
    fn test_repeated_columns_keep_their_cells() {
        let mut table = TableView::new(vec!["Remarks".into(), "Ward".into(), "Remarks".into()]);
        table.push_row(vec![Value::from("a"), Value::from("1"), Value::from("b")]);

        assert_eq!(table.columns, vec!["Remarks", "Ward", "Remarks (2)"]);
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.rows[0]["Remarks (2)"], Value::from("b"));
    }

    #[test]
    fn test_data_labels_yield_to_fixed_labels() {
        let mut labels = ColumnLabels::reserving(["Class", "All"]);
        labels.fixed("Class");
        assert_eq!(labels.data("All"), "All (2)");
        assert_eq!(labels.data("Class"), "Class (2)");
        assert_eq!(labels.data("All (2)"), "All (2) (2)");
        assert_eq!(labels.data("Present"), "Present");
        labels.fixed("All");

        let table = labels.into_table();
        assert_eq!(
            table.columns,
            vec!["Class", "All (2)", "Class (2)", "All (2) (2)", "Present", "All"]
        );
    }
}
