//! Structural constraints a generated graph must satisfy.

/// Directedness and self-loop policy for a generated graph.
///
/// The default describes a directed graph that permits self-loops.
///
/// # Examples
/// ```
/// use randdot_core::GraphConstraints;
///
/// let constraints = GraphConstraints::default()
///     .with_undirected(true)
///     .with_self_loops_forbidden(true);
/// assert_eq!(constraints.max_edges(3), 3);
/// assert_eq!(constraints.arc(), "--");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GraphConstraints {
    undirected: bool,
    no_self_loop: bool,
}

impl GraphConstraints {
    /// Creates a constraint set from explicit flags.
    #[must_use]
    pub const fn new(undirected: bool, no_self_loop: bool) -> Self {
        Self {
            undirected,
            no_self_loop,
        }
    }

    /// Marks edges as unordered pairs.
    #[must_use]
    pub const fn with_undirected(mut self, undirected: bool) -> Self {
        self.undirected = undirected;
        self
    }

    /// Forbids edges that connect a vertex to itself.
    #[must_use]
    pub const fn with_self_loops_forbidden(mut self, forbidden: bool) -> Self {
        self.no_self_loop = forbidden;
        self
    }

    /// Returns `true` when `(i, j)` and `(j, i)` denote the same edge.
    #[must_use]
    pub const fn is_undirected(&self) -> bool {
        self.undirected
    }

    /// Returns `true` when edges carry a direction.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        !self.undirected
    }

    /// Returns `true` when self-loops are rejected.
    #[must_use]
    pub const fn forbids_self_loops(&self) -> bool {
        self.no_self_loop
    }

    /// Largest edge count a simple graph on `vertices` vertices can hold
    /// under these constraints.
    ///
    /// Computed in 128-bit arithmetic so the bound never overflows for any
    /// `usize` vertex count.
    ///
    /// # Examples
    /// ```
    /// use randdot_core::GraphConstraints;
    ///
    /// let directed = GraphConstraints::default();
    /// assert_eq!(directed.max_edges(4), 16);
    /// assert_eq!(directed.with_self_loops_forbidden(true).max_edges(4), 12);
    ///
    /// let undirected = directed.with_undirected(true);
    /// assert_eq!(undirected.max_edges(4), 10);
    /// assert_eq!(undirected.with_self_loops_forbidden(true).max_edges(4), 6);
    /// ```
    #[must_use]
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "n * (n - 1) is always even"
    )]
    pub fn max_edges(&self, vertices: usize) -> u128 {
        let n = widen(vertices);
        let diagonal = if self.no_self_loop { 0 } else { n };
        let off_diagonal = n * n.saturating_sub(1);
        if self.undirected {
            off_diagonal / 2 + diagonal
        } else {
            off_diagonal + diagonal
        }
    }

    /// Returns `true` when a cell at `(row, col)` may hold an edge.
    #[must_use]
    pub const fn admits(&self, row: usize, col: usize) -> bool {
        !(self.no_self_loop && row == col)
    }

    /// Connector placed between the endpoints of an edge statement.
    #[must_use]
    pub const fn arc(&self) -> &'static str {
        if self.undirected { "--" } else { "->" }
    }

    /// Keyword that opens the graph block.
    #[must_use]
    pub const fn graph_keyword(&self) -> &'static str {
        if self.undirected { "graph" } else { "digraph" }
    }
}

/// Widens a count for arithmetic against [`GraphConstraints::max_edges`].
///
/// `usize` is at most 64 bits wide, so the conversion never saturates.
#[must_use]
pub(crate) fn widen(count: usize) -> u128 {
    u128::try_from(count).unwrap_or(u128::MAX)
}
