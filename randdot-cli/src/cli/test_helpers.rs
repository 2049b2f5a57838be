//! Small helpers shared across CLI tests.

use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use super::{Cli, CliError, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Parses `args` after the binary name, panicking on rejected input.
pub(super) fn parse(args: &[&str]) -> Cli {
    let argv = std::iter::once("randdot").chain(args.iter().copied());
    match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err) => panic!("arguments {args:?} must parse: {err}"),
    }
}

/// Parses `args` with `--output` pointing at `name` inside `dir`.
pub(super) fn parse_with_output(dir: &TempDir, name: &str, args: &[&str]) -> (Cli, PathBuf) {
    let path = dir.path().join(name);
    let mut cli = parse(args);
    cli.output = path.clone();
    (cli, path)
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
