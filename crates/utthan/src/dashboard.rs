//! Dashboard tabs composed from the aggregation queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::{ChartSeries, RecordFilter, TableView, Tabulate};
use crate::classify::Category;
use crate::dataset::Dataset;
use crate::error::{Result, UtthanError};
use crate::input::SourceMetadata;
use crate::schema::{Dimension, Subject};

/// Message shown when the filters leave nothing to aggregate.
const NO_MATCHING_RECORDS: &str = "No records match the current filters";

/// The five dashboard tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    WardAttendance,
    Medium,
    ClassAttendance,
    Levels,
    Comparative,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::WardAttendance,
        ViewKind::Medium,
        ViewKind::ClassAttendance,
        ViewKind::Levels,
        ViewKind::Comparative,
    ];

    /// URL and CLI name.
    pub fn slug(&self) -> &'static str {
        match self {
            ViewKind::WardAttendance => "ward-attendance",
            ViewKind::Medium => "medium",
            ViewKind::ClassAttendance => "class-attendance",
            ViewKind::Levels => "levels",
            ViewKind::Comparative => "comparative",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::WardAttendance => "Ward Wise Attendance",
            ViewKind::Medium => "Medium Wise Distribution",
            ViewKind::ClassAttendance => "Class Wise Attendance",
            ViewKind::Levels => "Learning Level Distribution",
            ViewKind::Comparative => "Comparative Views",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        ViewKind::ALL
            .into_iter()
            .find(|v| v.slug() == key)
            .ok_or_else(|| {
                let names: Vec<&str> = ViewKind::ALL.iter().map(|v| v.slug()).collect();
                format!("Unknown view: {}. Use one of: {}", s, names.join(", "))
            })
    }
}

/// One block of a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Panel {
    /// A result table and its chart series.
    Table {
        title: String,
        table: TableView,
        series: Vec<ChartSeries>,
    },
    /// A line of text derived from a result.
    Note { title: String, text: String },
    /// A view that could not be computed.
    NoData { title: String, message: String },
}

impl Panel {
    pub fn title(&self) -> &str {
        match self {
            Panel::Table { title, .. } | Panel::Note { title, .. } | Panel::NoData { title, .. } => {
                title
            }
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Panel::NoData { .. })
    }

    fn table(title: impl Into<String>, result: &impl Tabulate) -> Self {
        Panel::Table {
            title: title.into(),
            table: result.to_table(),
            series: result.to_series(),
        }
    }

    fn no_data(title: impl Into<String>, message: impl Into<String>) -> Self {
        Panel::NoData {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Table panel, or no-data when the query failed or had nothing to count.
    fn from_query<T: Tabulate>(
        title: impl Into<String>,
        result: Result<T>,
        is_empty: impl Fn(&T) -> bool,
    ) -> Self {
        let title = title.into();
        match result {
            Ok(value) if is_empty(&value) => Panel::no_data(title, NO_MATCHING_RECORDS),
            Ok(value) => Panel::table(title, &value),
            Err(err) => Panel::no_data(title, no_data_message(&err)),
        }
    }
}

fn no_data_message(err: &UtthanError) -> String {
    match err {
        UtthanError::MissingColumn(column) => {
            format!("No data: the dataset has no '{}' column", column)
        }
        other => other.to_string(),
    }
}

/// A titled group of panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub view: ViewKind,
    pub title: String,
    pub panels: Vec<Panel>,
}

/// Every tab for one filter selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub source: SourceMetadata,
    pub filter: RecordFilter,
    /// Records left after filtering.
    pub record_count: usize,
    pub tabs: Vec<Tab>,
}

/// Builds dashboard tabs over a dataset and a filter selection.
pub struct Dashboard<'a> {
    dataset: &'a Dataset,
    filter: &'a RecordFilter,
}

impl<'a> Dashboard<'a> {
    pub fn new(dataset: &'a Dataset, filter: &'a RecordFilter) -> Self {
        Self { dataset, filter }
    }

    /// All five tabs.
    pub fn build(&self) -> DashboardReport {
        DashboardReport {
            source: self.dataset.source().clone(),
            filter: self.filter.clone(),
            record_count: self.dataset.filtered(self.filter).len(),
            tabs: ViewKind::ALL.iter().map(|&kind| self.build_view(kind)).collect(),
        }
    }

    /// A single tab.
    pub fn build_view(&self, kind: ViewKind) -> Tab {
        let panels = match kind {
            ViewKind::WardAttendance => self.ward_attendance(),
            ViewKind::Medium => self.medium(),
            ViewKind::ClassAttendance => self.class_attendance(),
            ViewKind::Levels => self.levels(),
            ViewKind::Comparative => self.comparative(),
        };
        Tab {
            view: kind,
            title: kind.title().to_string(),
            panels,
        }
    }

    fn ward_attendance(&self) -> Vec<Panel> {
        vec![
            Panel::from_query(
                "Ward Wise Attendance Distribution",
                self.dataset.attendance_by(self.filter, Dimension::Ward),
                |t| t.rows.is_empty(),
            ),
            Panel::from_query(
                "Overall Attendance Distribution",
                self.dataset.value_distribution(self.filter, Dimension::Attendance),
                |d| d.total == 0,
            ),
        ]
    }

    fn medium(&self) -> Vec<Panel> {
        vec![Panel::from_query(
            "Medium Wise Student Distribution",
            self.dataset.value_distribution(self.filter, Dimension::Medium),
            |d| d.total == 0,
        )]
    }

    fn class_attendance(&self) -> Vec<Panel> {
        let title = "Class Wise Attendance Distribution";
        let crosstab = self
            .dataset
            .cross_tab(self.filter, Dimension::Class, Dimension::Attendance);
        let crosstab_ok = crosstab.is_ok();
        let mut panels = vec![Panel::from_query(title, crosstab, |t| t.grand_total == 0)];
        if !crosstab_ok {
            return panels;
        }

        for class in &self.dataset.config().class_order {
            if !self.filter.classes.is_empty() && !self.filter.classes.contains(class) {
                continue;
            }
            let mut per_class = self.filter.clone();
            per_class.classes = [class.clone()].into();

            if let Ok(distribution) = self
                .dataset
                .value_distribution(&per_class, Dimension::Attendance)
            {
                if distribution.total > 0 {
                    panels.push(Panel::table(format!("Class {} Attendance", class), &distribution));
                }
            }
        }
        panels
    }

    fn levels(&self) -> Vec<Panel> {
        Subject::ALL
            .iter()
            .map(|&subject| {
                let title = format!("{} Levels", subject);
                match self.dataset.level_distribution(self.filter, subject) {
                    Ok(dist) if dist.is_empty() => Panel::no_data(
                        title,
                        format!("No valid levels (L0-L5) found for {}", subject),
                    ),
                    result => Panel::from_query(title, result, |_| false),
                }
            })
            .collect()
    }

    fn comparative(&self) -> Vec<Panel> {
        let mut panels = Vec::new();

        let ward_title = "Average Learning Score by Ward";
        match self.dataset.scores_by(self.filter, Dimension::Ward) {
            Ok(scores) if scores.rows.is_empty() => {
                panels.push(Panel::no_data(ward_title, NO_MATCHING_RECORDS));
            }
            Ok(scores) => {
                panels.push(Panel::table(ward_title, &scores));
                if let (Some(best), Some(worst)) = (scores.best(), scores.worst()) {
                    panels.push(Panel::Note {
                        title: "Ward Performance".to_string(),
                        text: format!(
                            "Highest Performing Ward: {} (Total_Score {:.2}); \
                             Lowest Performing Ward: {} (Total_Score {:.2})",
                            best.group,
                            best.total.unwrap_or_default(),
                            worst.group,
                            worst.total.unwrap_or_default(),
                        ),
                    });
                }
            }
            Err(err) => panels.push(Panel::no_data(ward_title, no_data_message(&err))),
        }

        panels.push(Panel::from_query(
            "Average Learning Score Trends by Medium",
            self.dataset.scores_by(self.filter, Dimension::Medium),
            |s| s.rows.is_empty(),
        ));

        panels.push(Panel::Note {
            title: "Category Legend".to_string(),
            text: Category::ALL
                .iter()
                .map(|c| {
                    let (low, high) = c.levels();
                    format!("{}: {} to {} ({})", c.color(), low.label(), high.label(), c.label())
                })
                .collect::<Vec<_>>()
                .join("; "),
        });

        for subject in Subject::ALL {
            let title = format!("{} Overview", subject);
            match self.dataset.category_distribution(self.filter, subject) {
                Ok(dist) if dist.total == 0 => {
                    panels.push(Panel::no_data(title, format!("No data for {}", subject)));
                }
                result => panels.push(Panel::from_query(title, result, |_| false)),
            }
        }
        panels
    }
}
