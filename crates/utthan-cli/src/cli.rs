//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use utthan::{RecordFilter, Subject, UtthanConfig, ViewKind};

/// Utthan: baseline assessment analysis dashboard
#[derive(Parser)]
#[command(name = "utthan")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Keep going when expected columns are missing; affected views show no data
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Worksheet to read, by name or 0-based index
    #[arg(long, global = true, value_name = "NAME|INDEX")]
    pub sheet: Option<String>,
}

impl Cli {
    /// Defaults, overlaid by the config file, then by flags.
    pub fn load_config(&self) -> Result<UtthanConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => UtthanConfig::load(path)?,
            None => UtthanConfig::default(),
        };
        if let Some(sheet) = &self.sheet {
            config = config.with_sheet(sheet.clone());
        }
        if self.lenient {
            config = config.lenient();
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a sheet and print row counts, filter options and missing columns
    Summary {
        /// Path to the assessment sheet (xlsx/xls/ods/csv/tsv)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print one dashboard view
    View {
        /// Path to the assessment sheet
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// View to print
        #[arg(value_name = "VIEW", default_value = "dashboard")]
        view: ViewChoice,

        #[command(flatten)]
        filter: FilterArgs,

        /// Only show per-subject panels for this subject
        #[arg(long, value_name = "SUBJECT")]
        subject: Option<Subject>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the normalized table with derived category and score columns
    Export {
        /// Path to the assessment sheet
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>_normalized.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "tsv")]
        format: OutputFormat,
    },

    /// Start the dashboard web server
    Serve {
        /// Path to the assessment sheet
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Port for web server
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,
    },
}

/// Ward, class and school selection shared by the view commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep only these wards (repeatable)
    #[arg(long = "ward", value_name = "WARD")]
    pub wards: Vec<String>,

    /// Keep only these classes (repeatable)
    #[arg(long = "class", value_name = "CLASS")]
    pub classes: Vec<String>,

    /// Keep only these schools (repeatable)
    #[arg(long = "school", value_name = "SCHOOL")]
    pub schools: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> RecordFilter {
        RecordFilter::new()
            .with_wards(&self.wards)
            .with_classes(&self.classes)
            .with_schools(&self.schools)
    }
}

/// A single tab or the whole dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewChoice {
    Dashboard,
    Tab(ViewKind),
}

impl std::str::FromStr for ViewChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dashboard" | "all" => Ok(ViewChoice::Dashboard),
            other => other.parse().map(ViewChoice::Tab),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use tsv, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_with_filters() {
        let cli = Cli::try_parse_from([
            "utthan",
            "view",
            "baseline.xlsx",
            "ward-attendance",
            "--ward",
            "1",
            "--ward",
            "2",
            "--class",
            "ii",
            "--lenient",
        ])
        .unwrap();

        assert!(cli.lenient);
        match cli.command {
            Commands::View { view, filter, .. } => {
                assert_eq!(view, ViewChoice::Tab(ViewKind::WardAttendance));
                let filter = filter.to_filter();
                assert_eq!(filter.wards.len(), 2);
                assert!(filter.classes.contains("II"));
            }
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_view_defaults_to_dashboard() {
        let cli = Cli::try_parse_from(["utthan", "view", "baseline.csv"]).unwrap();
        match cli.command {
            Commands::View { view, .. } => assert_eq!(view, ViewChoice::Dashboard),
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_subject_option() {
        let cli = Cli::try_parse_from([
            "utthan", "view", "baseline.csv", "levels", "--subject", "numeracy",
        ])
        .unwrap();
        match cli.command {
            Commands::View { subject, .. } => assert_eq!(subject, Some(Subject::Numeracy)),
            _ => panic!("expected view command"),
        }
    }

    #[test]
    fn test_unknown_view_rejected() {
        assert!(Cli::try_parse_from(["utthan", "view", "baseline.csv", "charts"]).is_err());
    }

    #[test]
    fn test_flags_overlay_config() {
        let cli = Cli::try_parse_from([
            "utthan", "summary", "baseline.xlsx", "--sheet", "Baseline", "--lenient",
        ])
        .unwrap();
        let config = cli.load_config().unwrap();
        assert_eq!(config.loader.sheet.as_deref(), Some("Baseline"));
        assert!(!config.strict_schema);
    }

    #[test]
    fn test_output_format() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("parquet".parse::<OutputFormat>().is_err());
    }
}
