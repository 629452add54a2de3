//! Utthan CLI - baseline assessment analysis dashboard.

mod cli;
mod commands;
mod server;
mod web;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "utthan=debug,utthan_cli=debug" } else { "utthan=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = cli.load_config().and_then(|config| match cli.command {
        Commands::Summary { file, json } => commands::summary::run(file, json, &config),

        Commands::View {
            file,
            view,
            filter,
            subject,
            json,
        } => commands::view::run(file, view, filter.to_filter(), subject, json, &config),

        Commands::Export {
            file,
            output,
            format,
        } => commands::export::run(file, output, format, &config),

        Commands::Serve {
            file,
            port,
            no_open,
        } => commands::serve::run(file, port, no_open, config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
