//! Stratum CLI - rule-driven patching for layered record datasets.

mod cli;
mod commands;
mod manifest;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            dataset,
            manifest,
            output,
            json,
        } => commands::run::run(dataset, manifest, output, json, cli.verbose),

        Commands::Status { dataset, json } => commands::status::run(dataset, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
