//! Command-line interface orchestration for the rmat generator.
//!
//! Offers a single `generate` command that builds an R-MAT graph from
//! command-line parameters and prints either the edge list or a summary.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, GenerateCommand, OutputFormat, render_summary,
    run_cli,
};
