mod aggregate;
mod anomaly;
mod classifier;
mod cli;
mod decoder;
mod engine;
mod error;
mod fmt;
mod models;
mod parser;
mod rules;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Audit {
            dir,
            csv,
            json,
            seed,
            all,
        } => cli::audit::run(&dir, csv.as_deref(), json.as_deref(), seed, all),
        Commands::Rules => cli::rules::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
