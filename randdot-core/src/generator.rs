//! Builder and orchestration for one random-graph invocation.
//!
//! [`RandomGraphBuilder`] validates counts, constraints, and the graph name
//! before anything is allocated. The resulting [`RandomGraph`] resolves a
//! seed, samples the adjacency matrix, and renders or persists it.

use std::{io::Write, path::Path};

use rand::Rng;
use tracing::{Span, field, info, instrument};

use crate::{
    Result,
    adjacency::AdjacencyMatrix,
    constraints::{GraphConstraints, widen},
    error::GraphError,
    output::persist,
    sampler::{GraphSampler, SamplingStrategy},
    seed::{ResolvedSeed, resolve_seed},
    writer::{DEFAULT_GRAPH_NAME, GraphWriter},
};

/// Configures and constructs [`RandomGraph`] instances.
///
/// # Examples
/// ```
/// use randdot_core::{GraphConstraints, RandomGraphBuilder};
///
/// let graph = RandomGraphBuilder::new(4)
///     .with_edges(3)
///     .with_constraints(GraphConstraints::default().with_undirected(true))
///     .with_seed(9)
///     .build()
///     .expect("three edges fit on four vertices");
/// assert_eq!(graph.edges(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RandomGraphBuilder {
    vertices: usize,
    edges: usize,
    constraints: GraphConstraints,
    strategy: SamplingStrategy,
    seed: Option<u64>,
    graph_name: String,
    saturate: bool,
}

impl RandomGraphBuilder {
    /// Creates a builder for a graph on `vertices` vertices with no edges.
    #[must_use]
    pub fn new(vertices: usize) -> Self {
        Self {
            vertices,
            edges: 0,
            constraints: GraphConstraints::default(),
            strategy: SamplingStrategy::Auto,
            seed: None,
            graph_name: DEFAULT_GRAPH_NAME.to_owned(),
            saturate: false,
        }
    }

    /// Sets the number of edges to place.
    #[must_use]
    pub fn with_edges(mut self, edges: usize) -> Self {
        self.edges = edges;
        self
    }

    /// Sets the structural constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: GraphConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the sampling strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fixes the seed so the same graph is produced on every run.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the name written in the document header.
    #[must_use]
    pub fn with_graph_name(mut self, name: impl Into<String>) -> Self {
        self.graph_name = name.into();
        self
    }

    /// Clamps an oversized edge count to the maximum instead of rejecting it.
    ///
    /// # Examples
    /// ```
    /// use randdot_core::RandomGraphBuilder;
    ///
    /// let graph = RandomGraphBuilder::new(2)
    ///     .with_edges(100)
    ///     .with_saturation(true)
    ///     .build()
    ///     .expect("saturation clamps the edge count");
    /// assert_eq!(graph.edges(), 4);
    /// ```
    #[must_use]
    pub fn with_saturation(mut self, saturate: bool) -> Self {
        self.saturate = saturate;
        self
    }

    /// Validates the configuration and constructs a [`RandomGraph`].
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameters`] when the edge count exceeds
    /// the constraint-specific maximum (and saturation is off) or the graph
    /// name is not a DOT identifier.
    pub fn build(self) -> Result<RandomGraph> {
        let writer = GraphWriter::with_graph_name(self.graph_name)?;
        let sampler = GraphSampler::new(self.constraints).with_strategy(self.strategy);
        let edges = if self.saturate {
            saturated_edges(self.constraints, self.vertices, self.edges)
        } else {
            self.edges
        };
        sampler.validate(self.vertices, edges)?;

        Ok(RandomGraph {
            vertices: self.vertices,
            edges,
            sampler,
            writer,
            seed: self.seed,
        })
    }
}

fn saturated_edges(constraints: GraphConstraints, vertices: usize, edges: usize) -> usize {
    let max_edges = constraints.max_edges(vertices);
    if widen(edges) <= max_edges {
        return edges;
    }
    // `edges` is a usize, so a smaller maximum always fits.
    usize::try_from(max_edges).unwrap_or(edges)
}

/// A validated request for one random graph.
#[derive(Debug, Clone)]
pub struct RandomGraph {
    vertices: usize,
    edges: usize,
    sampler: GraphSampler,
    writer: GraphWriter,
    seed: Option<u64>,
}

/// Outcome of generating and emitting one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    /// Number of vertices in the graph.
    pub vertices: usize,
    /// Number of logical edges placed.
    pub edges: usize,
    /// Constraints the graph satisfies.
    pub constraints: GraphConstraints,
    /// Seed used for sampling.
    pub seed: ResolvedSeed,
}

impl RandomGraph {
    /// Number of vertices.
    #[must_use]
    pub const fn vertices(&self) -> usize {
        self.vertices
    }

    /// Number of edges that will be placed, after any saturation.
    #[must_use]
    pub const fn edges(&self) -> usize {
        self.edges
    }

    /// Constraints the sampled graph satisfies.
    #[must_use]
    pub const fn constraints(&self) -> GraphConstraints {
        self.sampler.constraints()
    }

    /// Writer used to render the graph.
    #[must_use]
    pub const fn writer(&self) -> &GraphWriter {
        &self.writer
    }

    /// Samples with a freshly resolved seed.
    ///
    /// # Errors
    /// Returns [`GraphError::ResourceExhausted`] when the adjacency matrix
    /// cannot be allocated.
    pub fn generate(&self) -> Result<(AdjacencyMatrix, ResolvedSeed)> {
        let seed = resolve_seed(self.seed);
        info!(seed = seed.value(), origin = seed.origin().as_str(), "seed resolved");
        let adjacency = self.generate_with_rng(&mut seed.rng())?;
        Ok((adjacency, seed))
    }

    /// Samples with a caller-supplied random source.
    ///
    /// # Errors
    /// Returns [`GraphError::ResourceExhausted`] when the adjacency matrix
    /// cannot be allocated.
    pub fn generate_with_rng<R>(&self, rng: &mut R) -> Result<AdjacencyMatrix>
    where
        R: Rng + ?Sized,
    {
        self.sampler.sample(self.vertices, self.edges, rng)
    }

    /// Samples a graph and writes its document into `path`.
    ///
    /// # Errors
    /// Returns [`GraphError::ResourceExhausted`] when the adjacency matrix
    /// cannot be allocated and [`GraphError::Io`] when the file cannot be
    /// written.
    ///
    /// # Examples
    /// ```
    /// use randdot_core::RandomGraphBuilder;
    ///
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("RandomGraph.txt");
    /// let report = RandomGraphBuilder::new(3)
    ///     .with_edges(2)
    ///     .with_seed(1)
    ///     .build()?
    ///     .write_to_path(&path)?;
    /// assert_eq!(report.edges, 2);
    /// assert!(std::fs::read_to_string(&path)?.starts_with("digraph G {"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[instrument(
        name = "graph.generate",
        err,
        skip(self, path),
        fields(
            vertices = self.vertices,
            edges = self.edges,
            destination = field::Empty,
        ),
    )]
    pub fn write_to_path(&self, path: &Path) -> Result<GenerationReport> {
        Span::current().record("destination", field::display(path.display()));
        let (adjacency, seed) = self.generate()?;
        persist(path, &self.writer, &adjacency)?;
        Ok(self.report(&adjacency, seed))
    }

    /// Samples a graph and streams its document into `writer`.
    ///
    /// # Errors
    /// Returns [`GraphError::ResourceExhausted`] when the adjacency matrix
    /// cannot be allocated and [`GraphError::Io`] (reported against `label`)
    /// when writing fails.
    #[instrument(
        name = "graph.generate",
        err,
        skip(self, writer),
        fields(vertices = self.vertices, edges = self.edges, destination = %label),
    )]
    pub fn write_to<W: Write>(&self, writer: W, label: &str) -> Result<GenerationReport> {
        let (adjacency, seed) = self.generate()?;
        self.writer
            .write_to(&adjacency, writer)
            .map_err(|source| GraphError::Io {
                path: label.into(),
                source,
            })?;
        Ok(self.report(&adjacency, seed))
    }

    fn report(&self, adjacency: &AdjacencyMatrix, seed: ResolvedSeed) -> GenerationReport {
        GenerationReport {
            vertices: adjacency.order(),
            edges: adjacency.edge_count(),
            constraints: adjacency.constraints(),
            seed,
        }
    }
}
