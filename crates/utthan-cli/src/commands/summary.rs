//! Summary command - load a sheet and describe what was found.

use std::path::PathBuf;

use colored::Colorize;
use utthan::{Dataset, UtthanConfig};

pub fn run(
    file: PathBuf,
    json_output: bool,
    config: &UtthanConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::load(&file, config)?;
    let summary = dataset.summary();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Loaded".cyan().bold(),
        file.display().to_string().white()
    );
    println!();
    println!("  Format:  {}", summary.source.format);
    if let Some(sheet) = &summary.source.sheet {
        println!("  Sheet:   {}", sheet);
    }
    println!("  Rows:    {}", summary.row_count.to_string().white().bold());
    println!("  Columns: {}", summary.source.column_count);
    println!("  Hash:    {}", summary.source.hash.dimmed());
    println!();

    let options = &summary.filter_options;
    println!("{}", "Filter options:".yellow().bold());
    println!("  Wards   ({}): {}", options.wards.len(), preview(&options.wards));
    println!("  Classes ({}): {}", options.classes.len(), preview(&options.classes));
    println!("  Schools ({}): {}", options.schools.len(), preview(&options.schools));
    println!();

    if summary.missing_columns.is_empty() {
        println!("{}", "All expected columns present".green());
    } else {
        println!(
            "{} {}",
            "Missing columns:".red().bold(),
            summary.missing_columns.join(", ")
        );
        println!("Views that need these columns will show no data.");
    }

    Ok(())
}

/// First few values of a list, with a count of the rest.
fn preview(values: &[String]) -> String {
    const SHOWN: usize = 8;
    if values.len() <= SHOWN {
        values.join(", ")
    } else {
        format!("{}, ... (+{} more)", values[..SHOWN].join(", "), values.len() - SHOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates() {
        let values: Vec<String> = (1..=10).map(|n| n.to_string()).collect();
        assert_eq!(preview(&values), "1, 2, 3, 4, 5, 6, 7, 8, ... (+2 more)");
        assert_eq!(preview(&values[..2]), "1, 2");
    }
}
