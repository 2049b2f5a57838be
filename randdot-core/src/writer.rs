//! DOT rendering for sampled adjacency matrices.
//!
//! Every row emits its vertex statement followed by the edges leaving it. The
//! lower triangle (diagonal included) is always scanned; the strict upper
//! triangle is scanned only for directed graphs, so an undirected edge is
//! emitted exactly once through its lower-triangle cell.

use std::{
    fmt,
    io::{self, Write},
};

use tracing::{debug, instrument};

use crate::{Result, adjacency::AdjacencyMatrix, error::GraphError};

/// Graph name used when none is configured.
pub const DEFAULT_GRAPH_NAME: &str = "G";

/// One DOT statement with 1-based vertex labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    /// Declares a vertex.
    Vertex(usize),
    /// Connects two vertices with the graph's arc symbol.
    Edge {
        /// Label of the source vertex.
        from: usize,
        /// Label of the target vertex.
        to: usize,
        /// `->` or `--`.
        arc: &'static str,
    },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex(label) => write!(f, "{label};"),
            Self::Edge { from, to, arc } => write!(f, "{from}{arc}{to};"),
        }
    }
}

/// Renders adjacency matrices as DOT documents.
///
/// # Examples
/// ```
/// use randdot_core::{AdjacencyMatrix, GraphConstraints, GraphWriter};
///
/// let mut adjacency = AdjacencyMatrix::try_new(2, GraphConstraints::default())?;
/// adjacency.insert(0, 1);
/// let text = GraphWriter::new().render(&adjacency);
/// assert_eq!(text, "digraph G {\n1;\n1->2;\n2;\n}\n");
/// # Ok::<(), randdot_core::GraphError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphWriter {
    name: String,
}

impl Default for GraphWriter {
    fn default() -> Self {
        Self {
            name: DEFAULT_GRAPH_NAME.to_owned(),
        }
    }
}

impl GraphWriter {
    /// Creates a writer that names the graph [`DEFAULT_GRAPH_NAME`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with a custom graph name.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameters`] unless `name` is a plain DOT
    /// identifier (`[A-Za-z_][A-Za-z0-9_]*`).
    ///
    /// # Examples
    /// ```
    /// use randdot_core::GraphWriter;
    ///
    /// assert!(GraphWriter::with_graph_name("random_1").is_ok());
    /// assert!(GraphWriter::with_graph_name("1st graph").is_err());
    /// ```
    pub fn with_graph_name(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_graph_name(&name)?;
        Ok(Self { name })
    }

    /// Name placed in the document header.
    #[must_use]
    pub fn graph_name(&self) -> &str {
        &self.name
    }

    /// Statements for `adjacency` in emission order, excluding the header
    /// and closing brace.
    pub fn statements(adjacency: &AdjacencyMatrix) -> impl Iterator<Item = Statement> + '_ {
        let order = adjacency.order();
        let constraints = adjacency.constraints();
        let arc = constraints.arc();
        (0..order).flat_map(move |row| {
            let upper_end = if constraints.is_directed() { order } else { row + 1 };
            let edges = (0..=row)
                .chain(row + 1..upper_end)
                .filter(move |&col| adjacency.contains(row, col))
                .map(move |col| Statement::Edge {
                    from: row + 1,
                    to: col + 1,
                    arc,
                });
            std::iter::once(Statement::Vertex(row + 1)).chain(edges)
        })
    }

    /// Borrowing view that formats the full document via [`fmt::Display`].
    #[must_use]
    pub fn document<'a>(&'a self, adjacency: &'a AdjacencyMatrix) -> DotDocument<'a> {
        DotDocument {
            name: &self.name,
            adjacency,
        }
    }

    /// Renders the full document into a string.
    #[must_use]
    pub fn render(&self, adjacency: &AdjacencyMatrix) -> String {
        self.document(adjacency).to_string()
    }

    /// Streams the full document into `writer`, one statement per line.
    ///
    /// # Errors
    /// Returns [`io::Error`] if writing to the supplied writer fails.
    #[instrument(
        name = "writer.write_to",
        err,
        skip(self, adjacency, writer),
        fields(vertices = adjacency.order(), name = %self.name),
    )]
    pub fn write_to<W: Write>(&self, adjacency: &AdjacencyMatrix, mut writer: W) -> io::Result<()> {
        write!(writer, "{}", self.document(adjacency))?;
        debug!("document written");
        Ok(())
    }
}

/// A DOT document ready to be formatted.
#[derive(Debug, Clone, Copy)]
pub struct DotDocument<'a> {
    name: &'a str,
    adjacency: &'a AdjacencyMatrix,
}

impl fmt::Display for DotDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.adjacency.constraints().graph_keyword();
        writeln!(f, "{keyword} {} {{", self.name)?;
        for statement in GraphWriter::statements(self.adjacency) {
            writeln!(f, "{statement}")?;
        }
        writeln!(f, "}}")
    }
}

fn validate_graph_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let leading_ok = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
    if leading_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(GraphError::invalid(format!(
            "graph name `{name}` is not a DOT identifier"
        )))
    }
}
