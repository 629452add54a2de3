//! Immutable, normalized dataset snapshot and its queries.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::{
    AttendanceTable, CategoryDistribution, CrossTab, Distribution, LevelDistribution,
    RecordFilter, ScoreTable, attendance_by_group, category_distribution, compare_labels,
    cross_tab, level_distribution, score_by_group, value_distribution,
};
use crate::classify::StudentRecord;
use crate::config::UtthanConfig;
use crate::error::Result;
use crate::input::{DataTable, Loader, SourceMetadata};
use crate::normalize::Normalizer;
use crate::schema::{Dimension, Field, SchemaBinding, Subject, header_key};

/// Distinct values offered by the ward, class and school filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub wards: Vec<String>,
    pub classes: Vec<String>,
    pub schools: Vec<String>,
}

/// Overview of a loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub source: SourceMetadata,
    pub row_count: usize,
    pub filter_options: FilterOptions,
    /// Expected columns the sheet does not have.
    pub missing_columns: Vec<String>,
}

/// A loaded, normalized and classified assessment sheet.
///
/// Built once and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: SourceMetadata,
    table: DataTable,
    binding: SchemaBinding,
    records: Vec<StudentRecord>,
    config: UtthanConfig,
}

impl Dataset {
    /// Load, normalize and classify a sheet.
    pub fn load(path: impl AsRef<Path>, config: &UtthanConfig) -> Result<Self> {
        let loader = Loader::with_config(config.loader.clone());
        let (table, source) = loader.load_file(path)?;
        Self::from_table(table, source, config)
    }

    /// Build a snapshot from an already loaded table.
    pub fn from_table(raw: DataTable, source: SourceMetadata, config: &UtthanConfig) -> Result<Self> {
        let table = Normalizer::new().normalize(&raw);
        let binding = SchemaBinding::resolve(&table.headers);

        if config.strict_schema {
            binding.require_all()?;
        } else {
            let missing = binding.missing();
            if !missing.is_empty() {
                let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
                tracing::warn!(
                    file = %source.file,
                    missing = %labels.join(", "),
                    "dataset is missing columns; dependent views will report no data"
                );
            }
        }

        let records: Vec<StudentRecord> = table
            .rows
            .iter()
            .map(|row| StudentRecord::from_row(row, &binding))
            .collect();

        tracing::info!(
            file = %source.file,
            rows = records.len(),
            columns = table.column_count(),
            "built dataset snapshot"
        );

        Ok(Self {
            source,
            table,
            binding,
            records,
            config: config.clone(),
        })
    }

    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    /// The normalized table.
    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn binding(&self) -> &SchemaBinding {
        &self.binding
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn config(&self) -> &UtthanConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Expected fields the sheet does not provide.
    pub fn missing_fields(&self) -> Vec<Field> {
        self.binding.missing()
    }

    /// Records passing `filter`, in sheet order.
    pub fn filtered(&self, filter: &RecordFilter) -> Vec<&StudentRecord> {
        filter.apply(&self.records)
    }

    /// Distinct wards, classes and schools, sorted.
    pub fn filter_options(&self) -> FilterOptions {
        let distinct = |field: Field, value: fn(&StudentRecord) -> &str| -> Vec<String> {
            if !self.binding.has(field) {
                return Vec::new();
            }
            let mut values: Vec<String> = self
                .records
                .iter()
                .map(value)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect();
            values.sort_by(|a, b| compare_labels(a, b));
            values.dedup();
            values
        };

        FilterOptions {
            wards: distinct(Field::Ward, |r| r.ward.as_str()),
            classes: distinct(Field::Class, |r| r.class.as_str()),
            schools: distinct(Field::SchoolName, |r| r.school_name.as_str()),
        }
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            source: self.source.clone(),
            row_count: self.records.len(),
            filter_options: self.filter_options(),
            missing_columns: self
                .missing_fields()
                .iter()
                .map(|f| f.label().to_string())
                .collect(),
        }
    }

    fn require(&self, fields: &[Field]) -> Result<()> {
        for &field in fields {
            self.binding.require(field)?;
        }
        Ok(())
    }

    /// Attendance status counts per group of `dimension`.
    pub fn attendance_by(&self, filter: &RecordFilter, dimension: Dimension) -> Result<AttendanceTable> {
        self.require(&[dimension.field(), Field::Attendance])?;
        Ok(attendance_by_group(
            &self.filtered(filter),
            dimension,
            &self.config.attendance_statuses,
        ))
    }

    pub fn value_distribution(&self, filter: &RecordFilter, dimension: Dimension) -> Result<Distribution> {
        self.require(&[dimension.field()])?;
        Ok(value_distribution(&self.filtered(filter), dimension))
    }

    pub fn cross_tab(
        &self,
        filter: &RecordFilter,
        rows: Dimension,
        columns: Dimension,
    ) -> Result<CrossTab> {
        self.require(&[rows.field(), columns.field()])?;
        Ok(cross_tab(&self.filtered(filter), rows, columns))
    }

    pub fn level_distribution(&self, filter: &RecordFilter, subject: Subject) -> Result<LevelDistribution> {
        self.require(&[subject.field()])?;
        Ok(level_distribution(&self.filtered(filter), subject))
    }

    /// Mean subject scores per group; needs all three subject columns.
    pub fn scores_by(&self, filter: &RecordFilter, dimension: Dimension) -> Result<ScoreTable> {
        self.require(&[dimension.field(), Field::Reading, Field::Writing, Field::Numeracy])?;
        Ok(score_by_group(&self.filtered(filter), dimension))
    }

    pub fn category_distribution(
        &self,
        filter: &RecordFilter,
        subject: Subject,
    ) -> Result<CategoryDistribution> {
        self.require(&[subject.field()])?;
        Ok(category_distribution(&self.filtered(filter), subject))
    }

    /// The normalized table plus `{Subject}_Category` and `{Subject}_Score`
    /// columns. Missing derivations are blank cells.
    pub fn classified_table(&self) -> DataTable {
        let derived: Vec<String> = Subject::ALL
            .iter()
            .flat_map(|s| [s.category_column(), s.score_column()])
            .collect();
        let derived_keys: Vec<String> = derived.iter().map(|d| header_key(d)).collect();

        // Columns already named like a derived one are replaced.
        let kept: Vec<usize> = (0..self.table.column_count())
            .filter(|&i| !derived_keys.contains(&header_key(&self.table.headers[i])))
            .collect();

        let mut headers: Vec<String> = kept.iter().map(|&i| self.table.headers[i].clone()).collect();
        headers.extend(derived);

        let rows = self
            .table
            .rows
            .iter()
            .zip(&self.records)
            .map(|(row, record)| {
                let mut out: Vec<String> = kept
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or_default())
                    .collect();
                for subject in Subject::ALL {
                    let assessment = record.assessment(subject);
                    out.push(
                        assessment
                            .category()
                            .map(|c| c.label().to_string())
                            .unwrap_or_default(),
                    );
                    out.push(
                        assessment
                            .score()
                            .map(|s| s.to_string())
                            .unwrap_or_default(),
                    );
                }
                out
            })
            .collect();

        DataTable::new(headers, rows)
    }
}
