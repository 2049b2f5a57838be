//! Argument parsing and command execution for the randdot CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use randdot_core::{
    DEFAULT_GRAPH_NAME, GenerationReport, GraphConstraints, GraphError, RandomGraph,
    RandomGraphBuilder, SamplingStrategy,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::clamp_count;

/// File written when no `--output` is given.
pub const DEFAULT_OUTPUT: &str = "RandomGraph.txt";

/// `--output` value that selects standard output.
pub const STDOUT_MARKER: &str = "-";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "randdot",
    version,
    allow_negative_numbers = true,
    about = "Generate a uniform random graph and write it as DOT."
)]
pub struct Cli {
    /// Number of vertices.
    #[arg(value_parser = clamp_count)]
    pub vertices: usize,

    /// Number of edges.
    #[arg(default_value = "0", value_parser = clamp_count)]
    pub edges: usize,

    /// Whether edges carry a direction.
    #[arg(short = 't', long = "graph-type", value_enum, default_value_t = GraphType::Directed)]
    pub graph_type: GraphType,

    /// Forbid edges from a vertex to itself.
    #[arg(long = "no-self-loop")]
    pub no_self_loop: bool,

    /// Destination file; `-` writes to standard output.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Seed for reproducible output (drawn from the OS when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Graph name written in the document header.
    #[arg(long, default_value = DEFAULT_GRAPH_NAME)]
    pub name: String,

    /// Clamp the edge count to the maximum instead of failing.
    #[arg(long)]
    pub saturate: bool,

    /// Edge placement strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Auto)]
    pub strategy: StrategyArg,
}

/// Graph directedness accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphType {
    /// Ordered vertex pairs, written with `->`.
    Directed,
    /// Unordered vertex pairs, written with `--`.
    Undirected,
}

impl GraphType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Directed => "directed",
            Self::Undirected => "undirected",
        }
    }
}

/// Sampling strategies accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Rejection sampling with enumeration near saturation.
    Auto,
    /// Rejection sampling only.
    Rejection,
    /// Enumerate free slots up front.
    Enumeration,
}

impl From<StrategyArg> for SamplingStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Auto => Self::Auto,
            StrategyArg::Rejection => Self::Rejection,
            StrategyArg::Enumeration => Self::Enumeration,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing to standard output failed.
    #[error("failed to write to standard output: {source}")]
    Stdout {
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Sampling, rendering, or persisting the graph failed.
    #[error(transparent)]
    Core(#[from] GraphError),
}

/// Where the document was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A file on disk.
    File(PathBuf),
    /// Standard output.
    Stdout,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Where the document went.
    pub destination: Destination,
    /// Counts, constraints, and seed of the generated graph.
    pub report: GenerationReport,
}

impl Cli {
    /// Constraint set selected by the flags.
    #[must_use]
    pub const fn constraints(&self) -> GraphConstraints {
        GraphConstraints::new(matches!(self.graph_type, GraphType::Undirected), self.no_self_loop)
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when validation, sampling, or output fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use randdot_cli::cli::{Cli, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("graph.dot");
/// let cli = Cli::try_parse_from([
///     "randdot", "4", "3", "--graph-type", "undirected", "--seed", "1",
///     "--output", path.to_str().expect("utf-8 temp path"),
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.report.edges, 3);
/// assert!(std::fs::read_to_string(&path)?.starts_with("graph G {"));
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(
        vertices = cli.vertices,
        edges = cli.edges,
        graph_type = cli.graph_type.as_str(),
        no_self_loop = cli.no_self_loop,
        destination = field::Empty,
    ),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let graph = build_graph(&cli)?;
    let destination = resolve_destination(&cli.output);
    let span = Span::current();

    let report = match &destination {
        Destination::Stdout => {
            span.record("destination", field::display("stdout"));
            write_stdout(&graph)?
        }
        Destination::File(path) => {
            span.record("destination", field::display(path.display()));
            graph.write_to_path(path)?
        }
    };

    info!(
        vertices = report.vertices,
        edges = report.edges,
        seed = report.seed.value(),
        "command completed"
    );
    Ok(ExecutionSummary {
        destination,
        report,
    })
}

pub(super) fn build_graph(cli: &Cli) -> Result<RandomGraph, CliError> {
    let mut builder = RandomGraphBuilder::new(cli.vertices)
        .with_edges(cli.edges)
        .with_constraints(cli.constraints())
        .with_strategy(cli.strategy.into())
        .with_graph_name(cli.name.as_str())
        .with_saturation(cli.saturate);
    if let Some(seed) = cli.seed {
        builder = builder.with_seed(seed);
    }
    Ok(builder.build()?)
}

pub(super) fn resolve_destination(output: &Path) -> Destination {
    if output.as_os_str() == STDOUT_MARKER {
        Destination::Stdout
    } else {
        Destination::File(output.to_path_buf())
    }
}

fn write_stdout(graph: &RandomGraph) -> Result<GenerationReport, CliError> {
    let stdout = io::stdout();
    let mut writer = io::BufWriter::new(stdout.lock());
    let report = graph.write_to(&mut writer, STDOUT_MARKER)?;
    writer
        .flush()
        .map_err(|source| CliError::Stdout { source })?;
    Ok(report)
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::path::PathBuf;
/// # use randdot_cli::cli::{Destination, ExecutionSummary, render_summary};
/// # use randdot_core::{GenerationReport, GraphConstraints, resolve_seed};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     destination: Destination::File(PathBuf::from("RandomGraph.txt")),
///     report: GenerationReport {
///         vertices: 3,
///         edges: 2,
///         constraints: GraphConstraints::default(),
///         seed: resolve_seed(Some(9)),
///     },
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert!(String::from_utf8(buffer)?.contains("edges: 2"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let report = &summary.report;
    match &summary.destination {
        Destination::File(path) => writeln!(writer, "output: {}", path.display())?,
        Destination::Stdout => writeln!(writer, "output: <stdout>")?,
    }
    let kind = if report.constraints.is_undirected() {
        "undirected"
    } else {
        "directed"
    };
    let loops = if report.constraints.forbids_self_loops() {
        "forbidden"
    } else {
        "allowed"
    };
    writeln!(writer, "type: {kind}")?;
    writeln!(writer, "self-loops: {loops}")?;
    writeln!(writer, "vertices: {}", report.vertices)?;
    writeln!(writer, "edges: {}", report.edges)?;
    writeln!(
        writer,
        "seed: {} ({})",
        report.seed.value(),
        report.seed.origin().as_str()
    )?;
    Ok(())
}
