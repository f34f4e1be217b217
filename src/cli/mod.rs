pub mod audit;
pub mod rules;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "claimcheck",
    about = "Rule-based data-quality auditor for pipe-delimited healthcare claim extracts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit every extract file in a directory and print the findings.
    Audit {
        /// Directory containing the extract files
        dir: String,
        /// Write the full findings table to a CSV file
        #[arg(long)]
        csv: Option<String>,
        /// Write the full report (findings, summary, per-file outcomes) as JSON
        #[arg(long)]
        json: Option<String>,
        /// Seed for the anomaly detector
        #[arg(long, default_value_t = crate::engine::DEFAULT_SEED)]
        seed: u64,
        /// Also show zero-impact informational findings
        #[arg(long)]
        all: bool,
    },
    /// List the rule catalogue and its thresholds.
    Rules,
}
