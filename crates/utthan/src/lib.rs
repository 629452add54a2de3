//! Utthan: baseline-assessment dataset normalizer and aggregator.
//!
//! Loads one assessment spreadsheet, cleans it into canonical form, derives
//! learning categories and scores, and answers group-by queries that feed
//! the dashboard views.
//!
//! # Example
//!
//! ```no_run
//! use utthan::{Dashboard, Dataset, RecordFilter, UtthanConfig};
//!
//! let dataset = Dataset::load("baseline.xlsx", &UtthanConfig::default()).unwrap();
//! let filter = RecordFilter::new().with_wards(["1"]);
//! let report = Dashboard::new(&dataset, &filter).build();
//!
//! println!("Records: {}", report.record_count);
//! println!("Tabs: {}", report.tabs.len());
//! ```

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod input;
pub mod normalize;
pub mod schema;

mod cache;
mod config;
mod dashboard;
mod dataset;

pub use aggregate::{ChartSeries, Percentage, RecordFilter, TableView, Tabulate};
pub use cache::DatasetCache;
pub use classify::{Assessment, Category, Level, StudentRecord};
pub use config::UtthanConfig;
pub use dashboard::{Dashboard, DashboardReport, Panel, Tab, ViewKind};
pub use dataset::{Dataset, DatasetSummary, FilterOptions};
pub use error::{Result, UtthanError};
pub use input::{DataTable, Loader, LoaderConfig, SourceMetadata};
pub use schema::{Dimension, Field, SchemaBinding, Subject};
