//! Export command - write the normalized and classified table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use serde_json::Value;
use utthan::{DataTable, Dataset, TableView, UtthanConfig};

use crate::cli::OutputFormat;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: OutputFormat,
    config: &UtthanConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::load(&file, config)?;
    let table = dataset.classified_table();

    let output_path = output.unwrap_or_else(|| default_output_path(&file, format));

    let writer = BufWriter::new(File::create(&output_path)?);
    write_table(&table, format, writer)?;

    println!(
        "{} {} rows ({} columns) to {}",
        "Exported".green().bold(),
        table.row_count().to_string().white().bold(),
        table.column_count(),
        output_path.display().to_string().cyan()
    );

    Ok(())
}

fn default_output_path(file: &Path, format: OutputFormat) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    file.with_file_name(format!("{}_normalized.{}", stem, format.extension()))
}

/// Serialize a table as delimited text or as a JSON array of row objects.
pub fn write_table<W: Write>(
    table: &DataTable,
    format: OutputFormat,
    mut writer: W,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &rows_as_objects(table).rows)?;
            writeln!(writer)?;
        }
        OutputFormat::Tsv | OutputFormat::Csv => {
            let delimiter = if format == OutputFormat::Tsv { b'\t' } else { b',' };
            let mut csv_writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(writer);
            csv_writer.write_record(&table.headers)?;
            for row in &table.rows {
                csv_writer.write_record(row)?;
            }
            csv_writer.flush()?;
        }
    }
    Ok(())
}

/// Rows as header-keyed objects, in column order.
fn rows_as_objects(table: &DataTable) -> TableView {
    let mut view = TableView::new(table.headers.clone());
    for row in &table.rows {
        view.push_row(row.iter().map(|v| Value::from(v.as_str())).collect());
    }
    view
}
