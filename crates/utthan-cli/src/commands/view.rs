//! View command - print dashboard tabs as text tables or JSON.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::Value;
use utthan::{Dashboard, Dataset, Panel, RecordFilter, Subject, Tab, TableView, UtthanConfig};

use crate::cli::ViewChoice;

pub fn run(
    file: PathBuf,
    view: ViewChoice,
    filter: RecordFilter,
    subject: Option<Subject>,
    json_output: bool,
    config: &UtthanConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::load(&file, config)?;
    let dashboard = Dashboard::new(&dataset, &filter);

    match view {
        ViewChoice::Dashboard => {
            let mut report = dashboard.build();
            if let Some(subject) = subject {
                report.tabs.iter_mut().for_each(|tab| retain_subject(tab, subject));
            }
            if json_output {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            println!(
                "{} {} of {} records",
                "Showing".cyan().bold(),
                report.record_count.to_string().white().bold(),
                dataset.len()
            );
            for tab in &report.tabs {
                print_tab(tab);
            }
        }
        ViewChoice::Tab(kind) => {
            let mut tab = dashboard.build_view(kind);
            if let Some(subject) = subject {
                retain_subject(&mut tab, subject);
            }
            if json_output {
                println!("{}", serde_json::to_string_pretty(&tab)?);
            } else {
                print_tab(&tab);
            }
        }
    }

    Ok(())
}

/// Drop panels titled after a different subject.
fn retain_subject(tab: &mut Tab, subject: Subject) {
    tab.panels.retain(|panel| {
        Subject::ALL
            .iter()
            .filter(|other| **other != subject)
            .all(|other| !panel.title().starts_with(other.label()))
    });
}

fn print_tab(tab: &Tab) {
    println!();
    println!("{}", format!("== {} ==", tab.title).yellow().bold());
    for panel in &tab.panels {
        println!();
        match panel {
            Panel::Table { title, table, .. } => {
                println!("{}", title.bold());
                print!("{}", render_table(table));
            }
            Panel::Note { title, text } => {
                println!("{} {}", format!("{}:", title).bold(), text);
            }
            Panel::NoData { title, message } => {
                println!("{}", title.bold());
                println!("  {}", message.dimmed());
            }
        }
    }
}

/// Render a table as aligned plain text.
pub fn render_table(table: &TableView) -> String {
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .map(|c| row.get(c).map(display_value).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&table.columns);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(&rule));
    for row in &cells {
        out.push_str(&line(row));
    }
    out
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(u), _) => u.to_string(),
            (None, Some(f)) => format!("{:.2}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
