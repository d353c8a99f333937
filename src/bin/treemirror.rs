//! Treemirror CLI Binary
//!
//! Mirrors a source directory onto a replica on a fixed interval.

use clap::Parser;
use std::process;
use tracing::{error, info};
use treemirror::cli::{build_logging_config, map_error, Cli, RunContext};
use treemirror::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    // Initialize logging early
    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Treemirror starting");

    let context = match RunContext::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute() {
        Ok(output) => {
            info!("Run finished");
            println!("{}", output);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}
