//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stratum: rule-driven patch engine for layered record datasets
#[derive(Parser)]
#[command(name = "stratum")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the patch pipelines over a dataset and write the override layer
    Run {
        /// Path to the dataset file (JSON load order)
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// Path to the patch manifest
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output path for the override layer (default: <dataset>.patch.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show layer and annotation counts for a dataset
    Status {
        /// Path to the dataset file
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
