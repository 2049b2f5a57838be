//! Command-line interface orchestration for randdot.
//!
//! A single command samples one random graph from the positional counts and
//! flags, then writes its DOT document to a file or standard output.

mod commands;
mod input;

pub use commands::{
    Cli, CliError, DEFAULT_OUTPUT, Destination, ExecutionSummary, GraphType, STDOUT_MARKER,
    StrategyArg, render_summary, run_cli,
};
pub use input::{COUNT_CEILING, clamp_count};

#[cfg(test)]
mod test_helpers;
