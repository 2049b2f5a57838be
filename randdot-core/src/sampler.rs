//! Uniform sampling of simple graphs with an exact edge count.
//!
//! The sampler draws candidate cells uniformly and rejects those that are
//! already occupied or forbidden. Near saturation almost every draw is a
//! rejection, so [`SamplingStrategy::Auto`] finishes by enumerating the free
//! cells and drawing from them directly. Every phase places the next edge on a
//! cell chosen uniformly among the free admissible cells, so an undirected
//! edge off the diagonal is twice as likely as a self-loop under every
//! strategy.

use rand::Rng;
use tracing::{Span, debug, field, instrument};

use crate::{
    Result,
    adjacency::AdjacencyMatrix,
    constraints::{GraphConstraints, widen},
    error::GraphError,
};

/// Auto switches to enumeration once fewer than `1 / ENUMERATION_DIVISOR` of
/// the admissible edges remain free.
const ENUMERATION_DIVISOR: u128 = 8;

/// Selects how the sampler places edges.
///
/// # Examples
/// ```
/// use randdot_core::SamplingStrategy;
///
/// assert_eq!(SamplingStrategy::default(), SamplingStrategy::Auto);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SamplingStrategy {
    /// Rejection sampling that falls back to enumeration near saturation.
    #[default]
    Auto,
    /// Pure rejection sampling for every edge.
    Rejection,
    /// Enumerate every free cell up front and draw from the list.
    Enumeration,
}

impl SamplingStrategy {
    /// Stable lowercase label used in logs and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Rejection => "rejection",
            Self::Enumeration => "enumeration",
        }
    }
}

/// Samples adjacency matrices satisfying a fixed [`GraphConstraints`].
///
/// The random source is supplied per call so callers control seeding and
/// tests can inject deterministic generators.
///
/// # Examples
/// ```
/// use rand::{SeedableRng, rngs::SmallRng};
/// use randdot_core::{GraphConstraints, GraphSampler};
///
/// let sampler = GraphSampler::new(GraphConstraints::default().with_undirected(true));
/// let mut rng = SmallRng::seed_from_u64(7);
/// let adjacency = sampler.sample(5, 4, &mut rng)?;
/// assert_eq!(adjacency.edge_count(), 4);
/// assert!(adjacency.is_symmetric());
/// # Ok::<(), randdot_core::GraphError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphSampler {
    constraints: GraphConstraints,
    strategy: SamplingStrategy,
}

impl GraphSampler {
    /// Creates a sampler using [`SamplingStrategy::Auto`].
    #[must_use]
    pub const fn new(constraints: GraphConstraints) -> Self {
        Self {
            constraints,
            strategy: SamplingStrategy::Auto,
        }
    }

    /// Overrides the sampling strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Constraints every sampled matrix satisfies.
    #[must_use]
    pub const fn constraints(&self) -> GraphConstraints {
        self.constraints
    }

    /// Strategy used to place edges.
    #[must_use]
    pub const fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Checks that `edges` fits on `vertices` vertices under the sampler's
    /// constraints.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameters`] when `edges` exceeds
    /// [`GraphConstraints::max_edges`].
    pub fn validate(&self, vertices: usize, edges: usize) -> Result<()> {
        let max_edges = self.constraints.max_edges(vertices);
        if widen(edges) > max_edges {
            return Err(GraphError::invalid(format!(
                "{edges} edges requested but a {} graph on {vertices} vertices {} holds at most {max_edges}",
                if self.constraints.is_undirected() { "undirected" } else { "directed" },
                if self.constraints.forbids_self_loops() {
                    "without self-loops"
                } else {
                    "with self-loops"
                },
            )));
        }
        Ok(())
    }

    /// Samples a graph with exactly `edges` logical edges on `vertices`
    /// vertices.
    ///
    /// Validation runs before the matrix is allocated, so a rejected request
    /// performs no allocation and consumes no randomness.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameters`] when `edges` exceeds the
    /// constraint-specific maximum and [`GraphError::ResourceExhausted`] when
    /// the matrix or the cell list cannot be allocated.
    #[instrument(
        name = "sampler.sample",
        err,
        skip(self, rng),
        fields(
            undirected = self.constraints.is_undirected(),
            no_self_loop = self.constraints.forbids_self_loops(),
            strategy = self.strategy.as_str(),
            draws = field::Empty,
            rejections = field::Empty,
        ),
    )]
    pub fn sample<R>(&self, vertices: usize, edges: usize, rng: &mut R) -> Result<AdjacencyMatrix>
    where
        R: Rng + ?Sized,
    {
        self.validate(vertices, edges)?;
        let mut adjacency = AdjacencyMatrix::try_new(vertices, self.constraints)?;
        if edges == 0 {
            return Ok(adjacency);
        }

        let capacity = self.constraints.max_edges(vertices);
        let mut remaining = edges;
        let stats = match self.strategy {
            SamplingStrategy::Enumeration => DrawStats::default(),
            SamplingStrategy::Rejection => {
                reject_until(&mut adjacency, rng, &mut remaining, |_| false)
            }
            SamplingStrategy::Auto => reject_until(&mut adjacency, rng, &mut remaining, |free| {
                free * ENUMERATION_DIVISOR < capacity
            }),
        };

        if remaining > 0 {
            debug!(
                remaining,
                placed = edges - remaining,
                "switching to cell enumeration"
            );
            enumerate_remaining(&mut adjacency, rng, remaining)?;
        }

        let span = Span::current();
        span.record("draws", stats.draws);
        span.record("rejections", stats.rejections);
        debug!(edges = adjacency.edge_count(), "sampling completed");
        Ok(adjacency)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct DrawStats {
    draws: u64,
    rejections: u64,
}

/// Places edges by rejection sampling until `remaining` reaches zero or
/// `should_stop` reports true for the current number of free edges.
fn reject_until<R, F>(
    adjacency: &mut AdjacencyMatrix,
    rng: &mut R,
    remaining: &mut usize,
    should_stop: F,
) -> DrawStats
where
    R: Rng + ?Sized,
    F: Fn(u128) -> bool,
{
    let order = adjacency.order();
    let mut free = adjacency.constraints().max_edges(order) - widen(adjacency.edge_count());
    let mut stats = DrawStats::default();
    while *remaining > 0 && !should_stop(free) {
        let row = rng.gen_range(0..order);
        let col = rng.gen_range(0..order);
        stats.draws += 1;
        if adjacency.insert(row, col) {
            *remaining -= 1;
            free -= 1;
        } else {
            stats.rejections += 1;
        }
    }
    stats
}

/// Draws `remaining` edges from the free admissible cells.
///
/// Placing an undirected edge also occupies its mirror cell; the stale entry
/// is dropped when it is drawn, so each placement stays uniform over the
/// cells that are still free.
fn enumerate_remaining<R>(
    adjacency: &mut AdjacencyMatrix,
    rng: &mut R,
    mut remaining: usize,
) -> Result<()>
where
    R: Rng + ?Sized,
{
    let mut cells = free_cells(adjacency)?;
    while remaining > 0 && !cells.is_empty() {
        let (row, col) = cells.swap_remove(rng.gen_range(0..cells.len()));
        if adjacency.insert(row, col) {
            remaining -= 1;
        }
    }
    Ok(())
}

/// Free admissible cells in row-major order, covering both triangles of an
/// undirected matrix.
fn free_cells(adjacency: &AdjacencyMatrix) -> Result<Vec<(usize, usize)>> {
    let order = adjacency.order();
    let constraints = adjacency.constraints();
    let is_free = |&(row, col): &(usize, usize)| {
        constraints.admits(row, col) && !adjacency.contains(row, col)
    };
    let all_cells = || (0..order).flat_map(move |row| (0..order).map(move |col| (row, col)));

    let mut cells = Vec::new();
    cells
        .try_reserve_exact(all_cells().filter(is_free).count())
        .map_err(|_| GraphError::ResourceExhausted { vertices: order })?;
    cells.extend(all_cells().filter(is_free));
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{SeedableRng, rngs::SmallRng};
    use randdot_test_support::tracing::RecordingLayer;
    use rstest::rstest;
    use tracing_subscriber::layer::SubscriberExt;

    fn constraints(undirected: bool, no_self_loop: bool) -> GraphConstraints {
        GraphConstraints::new(undirected, no_self_loop)
    }

    #[test]
    fn zero_vertices_zero_edges_returns_empty_matrix() {
        let mut rng = SmallRng::seed_from_u64(1);
        let adjacency = GraphSampler::default()
            .sample(0, 0, &mut rng)
            .expect("empty graph is valid");
        assert_eq!(adjacency.order(), 0);
        assert_eq!(adjacency.edge_count(), 0);
    }

    #[test]
    fn zero_vertices_with_edges_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        let err = GraphSampler::default()
            .sample(0, 1, &mut rng)
            .expect_err("no edge fits on zero vertices");
        assert!(matches!(err, GraphError::InvalidParameters { .. }));
    }

    #[test]
    fn undirected_with_loops_rejects_five_edges_on_two_vertices() {
        let mut rng = SmallRng::seed_from_u64(3);
        let err = GraphSampler::new(constraints(true, false))
            .sample(2, 5, &mut rng)
            .expect_err("max_edges(2) is 3");
        match err {
            GraphError::InvalidParameters { reason } => {
                assert!(reason.contains("at most 3"), "unexpected reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case::directed_loops(false, false, 16)]
    #[case::directed_simple(false, true, 12)]
    #[case::undirected_loops(true, false, 10)]
    #[case::undirected_simple(true, true, 6)]
    fn one_past_maximum_is_rejected(
        #[case] undirected: bool,
        #[case] no_self_loop: bool,
        #[case] max_edges: usize,
    ) {
        let sampler = GraphSampler::new(constraints(undirected, no_self_loop));
        assert!(sampler.validate(4, max_edges).is_ok());
        assert!(matches!(
            sampler.validate(4, max_edges + 1),
            Err(GraphError::InvalidParameters { .. })
        ));
    }

    #[test]
    fn rejected_request_consumes_no_randomness() {
        let mut used = SmallRng::seed_from_u64(11);
        let mut fresh = SmallRng::seed_from_u64(11);
        let sampler = GraphSampler::new(constraints(false, true));
        assert!(sampler.sample(3, 7, &mut used).is_err());
        assert_eq!(used.r#gen::<u64>(), fresh.r#gen::<u64>());
    }

    #[rstest]
    #[case::auto(SamplingStrategy::Auto)]
    #[case::rejection(SamplingStrategy::Rejection)]
    #[case::enumeration(SamplingStrategy::Enumeration)]
    fn complete_triangle_without_self_loops(#[case] strategy: SamplingStrategy) {
        let mut rng = SmallRng::seed_from_u64(42);
        let adjacency = GraphSampler::new(constraints(true, true))
            .with_strategy(strategy)
            .sample(3, 3, &mut rng)
            .expect("three edges fit on a triangle");
        for (row, col) in [(1, 0), (2, 0), (2, 1)] {
            assert!(adjacency.contains(row, col));
            assert!(adjacency.contains(col, row));
        }
        assert!(!adjacency.has_self_loop());
        assert_eq!(adjacency.edge_count(), 3);
    }

    #[rstest]
    #[case::directed_loops(false, false)]
    #[case::directed_simple(false, true)]
    #[case::undirected_loops(true, false)]
    #[case::undirected_simple(true, true)]
    fn saturation_fills_every_admissible_cell(
        #[case] undirected: bool,
        #[case] no_self_loop: bool,
        #[values(
            SamplingStrategy::Auto,
            SamplingStrategy::Rejection,
            SamplingStrategy::Enumeration
        )]
        strategy: SamplingStrategy,
    ) {
        let constraints = constraints(undirected, no_self_loop);
        let max_edges = usize::try_from(constraints.max_edges(6)).expect("fits in usize");
        let mut rng = SmallRng::seed_from_u64(99);
        let adjacency = GraphSampler::new(constraints)
            .with_strategy(strategy)
            .sample(6, max_edges, &mut rng)
            .expect("saturated graph is valid");
        for row in 0..6 {
            for col in 0..6 {
                assert_eq!(adjacency.contains(row, col), constraints.admits(row, col));
            }
        }
    }

    #[test]
    fn fixed_seed_reproduces_matrix() {
        let sampler = GraphSampler::new(constraints(false, false));
        let first = sampler
            .sample(12, 40, &mut SmallRng::seed_from_u64(5))
            .expect("valid request");
        let second = sampler
            .sample(12, 40, &mut SmallRng::seed_from_u64(5))
            .expect("valid request");
        assert_eq!(first, second);
    }

    #[test]
    fn free_cells_skip_occupied_mirrored_and_forbidden_cells() {
        let mut adjacency =
            AdjacencyMatrix::try_new(3, constraints(true, true)).expect("small matrix");
        adjacency.insert(0, 1);
        let cells = free_cells(&adjacency).expect("cells allocate");
        assert_eq!(cells, vec![(0, 2), (1, 2), (2, 0), (2, 1)]);
    }

    /// On two vertices with self-loops, one undirected edge lands between the
    /// vertices for two of the four admissible cells.
    #[rstest]
    #[case::auto(SamplingStrategy::Auto)]
    #[case::rejection(SamplingStrategy::Rejection)]
    #[case::enumeration(SamplingStrategy::Enumeration)]
    fn strategies_weight_undirected_edges_by_cell(#[case] strategy: SamplingStrategy) {
        const TRIALS: usize = 6_000;
        let sampler = GraphSampler::new(constraints(true, false)).with_strategy(strategy);
        let mut rng = SmallRng::seed_from_u64(2024);
        let between = (0..TRIALS)
            .filter(|_| {
                sampler
                    .sample(2, 1, &mut rng)
                    .expect("one edge fits on two vertices")
                    .contains(1, 0)
            })
            .count();
        assert!(
            (2_700..=3_300).contains(&between),
            "{} placed 1--2 in {between} of {TRIALS} trials",
            strategy.as_str()
        );
    }

    #[rstest]
    #[case::rejection(SamplingStrategy::Rejection, true)]
    #[case::enumeration(SamplingStrategy::Enumeration, false)]
    fn span_records_draws_and_rejections(
        #[case] strategy: SamplingStrategy,
        #[case] draws_cells: bool,
    ) {
        let layer = RecordingLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        tracing::subscriber::with_default(subscriber, || {
            GraphSampler::new(constraints(false, false))
                .with_strategy(strategy)
                .sample(4, 10, &mut SmallRng::seed_from_u64(8))
                .expect("ten edges fit on four vertices");
        });

        let span = layer.span_named("sampler.sample").expect("span closed");
        assert_eq!(span.field("strategy"), Some(strategy.as_str()));
        let draws = span.count("draws").expect("draws recorded");
        let rejections = span.count("rejections").expect("rejections recorded");
        if draws_cells {
            assert_eq!(draws, rejections + 10);
        } else {
            assert_eq!((draws, rejections), (0, 0));
        }
    }
}
