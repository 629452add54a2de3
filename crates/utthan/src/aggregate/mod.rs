//! Group-by queries over filtered student records.
//!
//! Every query is a pure function of a record slice. Results implement
//! [`Tabulate`] so they can be rendered as a [`TableView`] or as chart
//! series.

mod attendance;
mod crosstab;
mod distribution;
mod filter;
mod scores;
mod view;

pub use attendance::{AttendanceRow, AttendanceTable, TOTAL_COLUMN, attendance_by_group};
pub use crosstab::{CrossTab, MARGIN_LABEL, cross_tab};
pub use distribution::{
    CategoryCount, CategoryDistribution, Distribution, DistributionRow, LevelCount,
    LevelDistribution, category_distribution, level_distribution, value_distribution,
};
pub use filter::RecordFilter;
pub use scores::{GroupScore, ScoreTable, score_by_group};
pub use view::{
    ChartKind, ChartSeries, ColumnLabels, Percentage, SeriesPoint, TableView, Tabulate,
    compare_labels,
};
