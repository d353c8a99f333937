//! CLI parse: clap types for treemirror. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Treemirror - one-way periodic mirroring of a directory tree
#[derive(Debug, Parser)]
#[command(name = "treemirror")]
#[command(about = "Keep a replica directory identical to a source directory")]
pub struct Cli {
    /// Source directory (never modified)
    #[arg(required_unless_present = "dump_config")]
    pub source: Option<PathBuf>,

    /// Replica directory (made to match the source)
    #[arg(required_unless_present = "dump_config")]
    pub replica: Option<PathBuf>,

    /// Seconds between synchronization passes
    #[arg(
        required_unless_present = "dump_config",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: Option<u64>,

    /// Change log file (appended to)
    #[arg(required_unless_present = "dump_config")]
    pub log_file: Option<PathBuf>,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run a single pass and exit
    #[arg(long, conflicts_with = "passes")]
    pub once: bool,

    /// Run this many passes and exit
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub passes: Option<u64>,

    /// Summary format printed when a bounded run finishes (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Do not echo change log lines to stdout
    #[arg(long)]
    pub no_echo: bool,

    /// Fail instead of creating a missing replica root
    #[arg(long)]
    pub no_create_replica: bool,

    /// Hash every common file even when sizes differ
    #[arg(long)]
    pub no_size_fast_path: bool,

    /// Read size in bytes used while hashing
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub dump_config: bool,

    /// Disable diagnostic logging
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug diagnostic logging
    #[arg(long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Diagnostic log file path (if output is "file")
    #[arg(long)]
    pub diag_log_file: Option<PathBuf>,
}

impl Cli {
    /// Passes to run before exiting; `None` runs until killed
    pub fn max_passes(&self) -> Option<u64> {
        if self.once {
            Some(1)
        } else {
            self.passes
        }
    }
}
