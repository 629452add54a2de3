//! Serve command - run the dashboard web server.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use utthan::{Dataset, DatasetCache, UtthanConfig};

use crate::server::{app, state::AppState};

pub fn run(
    file: PathBuf,
    port: u16,
    no_open: bool,
    config: UtthanConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Refuse to start on a sheet that cannot be loaded.
    let dataset = Dataset::load(&file, &config)?;

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting dashboard server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  File: {}", file.display());
    println!("  Rows: {}", dataset.len());
    if !dataset.missing_fields().is_empty() {
        let missing: Vec<&str> = dataset.missing_fields().iter().map(|f| f.label()).collect();
        println!("  {} {}", "Missing columns:".yellow(), missing.join(", "));
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let cache = Arc::new(DatasetCache::with_dataset(file, dataset));
    let state = AppState::new(cache);

    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        tokio::spawn(async {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            std::process::exit(0);
        });

        app::run_server(state, port).await
    })
}
