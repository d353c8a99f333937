//! CLI domain: parse, route, and output only.

mod output;
mod parse;
mod route;

pub use output::{format_run_summary, map_error};
pub use parse::Cli;
pub use route::{build_logging_config, RunContext};
