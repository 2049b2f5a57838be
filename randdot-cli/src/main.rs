//! CLI entry point for randdot.
//!
//! Parses command-line arguments with clap, generates one random graph,
//! prints a summary when the document went to a file, and maps errors to exit
//! codes. Logging is initialised first so later steps can emit structured
//! diagnostics via `tracing`.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use randdot_cli::{
    cli::{Cli, CliError, Destination, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, and report where the graph went.
fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to generate graph")?;
    if summary.destination == Destination::Stdout {
        return Ok(());
    }
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let code = err.downcast_ref::<CliError>().and_then(|cli_error| match cli_error {
            CliError::Core(core) => Some(core.code()),
            CliError::Stdout { .. } => None,
        });
        let code_field = code.map(|value| field::display(value.as_str()));

        let message = format!("{err:#}");

        error!(error = %message, code = code_field, "command execution failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialised"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
