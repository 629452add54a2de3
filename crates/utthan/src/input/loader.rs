//! Spreadsheet and CSV/TSV loader.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::source::{DataTable, SourceMetadata};
use crate::error::{Result, UtthanError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// File extensions read through the workbook reader.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "xla", "ods"];

/// Magic bytes of a zip container (xlsx/ods) and an OLE compound file (xls).
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Loader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Worksheet to read, by name or 0-based index (None = first sheet).
    pub sheet: Option<String>,
    /// Delimiter for text files (None = auto-detect).
    pub delimiter: Option<char>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character for text files.
    pub quote: char,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            delimiter: None,
            max_rows: None,
            quote: '"',
        }
    }
}

impl LoaderConfig {
    /// Reject settings the delimited reader cannot honor.
    pub fn check(&self) -> Result<()> {
        if let Some(delimiter) = self.delimiter {
            ascii_byte(delimiter, "delimiter")?;
        }
        ascii_byte(self.quote, "quote")?;
        if self.max_rows == Some(0) {
            return Err(UtthanError::Config("max_rows must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// The single byte the csv reader needs for a delimiter or quote character.
fn ascii_byte(c: char, setting: &str) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(UtthanError::Config(format!(
            "{} must be an ASCII character, got '{}'",
            setting, c
        )))
    }
}

/// How the source bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Excel/OpenDocument workbook.
    Workbook,
    /// Delimited text (CSV, TSV, ...).
    Delimited,
}

impl SourceFormat {
    /// Pick a format from the file extension, falling back to content sniffing.
    pub fn detect(path: &Path, contents: &[u8]) -> Self {
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match by_extension.as_deref() {
            Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => SourceFormat::Workbook,
            Some("csv") | Some("tsv") | Some("txt") | Some("psv") => SourceFormat::Delimited,
            _ if contents.starts_with(ZIP_MAGIC) || contents.starts_with(OLE_MAGIC) => {
                SourceFormat::Workbook
            }
            _ => SourceFormat::Delimited,
        }
    }
}

/// Loads assessment spreadsheets into a [`DataTable`].
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a new loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file and return the data table and metadata.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| UtthanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let size_bytes = file
            .metadata()
            .map_err(|e| UtthanError::Io {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| UtthanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let source_format = SourceFormat::detect(path, &contents);
        let (table, format, sheet) = match source_format {
            SourceFormat::Workbook => {
                let format = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase())
                    .unwrap_or_else(|| "workbook".to_string());
                let (table, sheet) = self.load_workbook(contents)?;
                (table, format, Some(sheet))
            }
            SourceFormat::Delimited => {
                let delimiter = match self.config.delimiter {
                    Some(d) => ascii_byte(d, "delimiter")?,
                    None => detect_delimiter(&contents)?,
                };
                tracing::debug!(delimiter = %(delimiter as char).escape_default(), "detected delimiter");
                let table = self.parse_bytes(&contents, delimiter)?;
                let format = match delimiter {
                    b'\t' => "tsv",
                    b',' => "csv",
                    b';' => "csv-semicolon",
                    b'|' => "psv",
                    _ => "delimited",
                }
                .to_string();
                (table, format, None)
            }
        };

        let mut metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );
        if let Some(sheet) = sheet {
            metadata = metadata.with_sheet(sheet);
        }

        tracing::info!(
            file = %metadata.file,
            format = %metadata.format,
            rows = metadata.row_count,
            columns = metadata.column_count,
            "loaded source table"
        );

        Ok((table, metadata))
    }

    /// Read the configured worksheet out of workbook bytes.
    fn load_workbook(&self, contents: Vec<u8>) -> Result<(DataTable, String)> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents))?;
        let sheet_names = workbook.sheet_names().to_vec();
        if sheet_names.is_empty() {
            return Err(UtthanError::EmptyData(
                "Workbook has no worksheets".to_string(),
            ));
        }

        let sheet_name = match self.config.sheet.as_deref() {
            None => sheet_names[0].clone(),
            Some(selector) => select_sheet(&sheet_names, selector)?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows = range.rows();

        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .enumerate()
                .map(|(i, cell)| match cell_to_string(cell) {
                    h if h.trim().is_empty() => format!("column_{}", i + 1),
                    h => h,
                })
                .collect(),
            None => {
                return Err(UtthanError::EmptyData(format!(
                    "Worksheet '{}' is empty",
                    sheet_name
                )));
            }
        };

        let expected_cols = headers.len();
        let mut data_rows = Vec::new();
        for row in rows {
            if let Some(max) = self.config.max_rows {
                if data_rows.len() >= max {
                    break;
                }
            }

            let mut values: Vec<String> = row.iter().map(cell_to_string).collect();
            if values.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            values.resize(expected_cols, String::new());
            data_rows.push(values);
        }

        if data_rows.is_empty() {
            return Err(UtthanError::EmptyData(format!(
                "No data rows found in worksheet '{}'",
                sheet_name
            )));
        }

        Ok((DataTable::new(headers, data_rows), sheet_name))
    }

    /// Parse delimited bytes directly.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(ascii_byte(self.config.quote, "quote")?)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if h.trim().is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    h.to_string()
                }
            })
            .collect();

        if headers.is_empty() {
            return Err(UtthanError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            // Pad short rows, truncate long ones
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(UtthanError::EmptyData("No data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a sheet selector: an exact sheet name first, then a 0-based index.
fn select_sheet(sheet_names: &[String], selector: &str) -> Result<String> {
    if let Some(name) = sheet_names.iter().find(|name| name.as_str() == selector) {
        return Ok(name.clone());
    }

    match selector.trim().parse::<usize>() {
        Ok(idx) => sheet_names.get(idx).cloned().ok_or_else(|| {
            UtthanError::Spreadsheet(format!(
                "No worksheet named '{}' and no worksheet at index {}",
                selector, idx
            ))
        }),
        Err(_) => Err(UtthanError::Spreadsheet(format!(
            "No worksheet named '{}'",
            selector
        ))),
    }
}

/// Render a workbook cell as text.
///
/// Whole-number floats drop their fraction so numeric ward codes read as
/// `1`, not `1.0`. Error cells (`#N/A`, `#REF!`) read as blank.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(UtthanError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts
                .iter()
                .map(|&c| (c as f64 - mean).powi(2))
                .sum::<f64>()
                / counts.len() as f64
        } else {
            0.0
        };

        // Consistent column counts dominate; tab wins ties
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
