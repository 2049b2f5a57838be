//! Flat adjacency matrix owned by a single sampling call.
//!
//! Cells are stored row-major in one contiguous buffer. Symmetry for
//! undirected graphs and the empty diagonal for graphs without self-loops are
//! enforced on every insertion rather than checked afterwards.

use crate::{
    Result,
    constraints::GraphConstraints,
    error::GraphError,
};

/// Boolean `N×N` adjacency relation tied to the constraints it was built for.
///
/// # Examples
/// ```
/// use randdot_core::{AdjacencyMatrix, GraphConstraints};
///
/// let constraints = GraphConstraints::default().with_undirected(true);
/// let mut adjacency = AdjacencyMatrix::try_new(3, constraints)?;
/// assert!(adjacency.insert(2, 0));
/// assert!(adjacency.contains(0, 2));
/// assert_eq!(adjacency.edge_count(), 1);
/// # Ok::<(), randdot_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    order: usize,
    constraints: GraphConstraints,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    /// Allocates a zero-filled matrix for `order` vertices.
    ///
    /// # Errors
    /// Returns [`GraphError::ResourceExhausted`] when `order × order`
    /// overflows or the allocator refuses the request.
    pub fn try_new(order: usize, constraints: GraphConstraints) -> Result<Self> {
        let exhausted = || GraphError::ResourceExhausted { vertices: order };
        let len = order.checked_mul(order).ok_or_else(exhausted)?;
        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|_| exhausted())?;
        cells.resize(len, false);
        Ok(Self {
            order,
            constraints,
            cells,
        })
    }

    /// Number of vertices.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Constraints enforced on insertion.
    #[must_use]
    pub const fn constraints(&self) -> GraphConstraints {
        self.constraints
    }

    /// Returns `true` when the cell `(row, col)` is set. Out-of-range
    /// coordinates report `false`.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.index(row, col)
            .and_then(|index| self.cells.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Returns the cells of `row`, or an empty slice when `row` is out of
    /// range.
    #[must_use]
    pub fn row(&self, row: usize) -> &[bool] {
        if row >= self.order {
            return &[];
        }
        let start = row * self.order;
        self.cells.get(start..start + self.order).unwrap_or(&[])
    }

    /// Places the edge `(row, col)`.
    ///
    /// Undirected matrices also set `(col, row)`; both cells form one logical
    /// edge. Returns `true` only when a new edge was placed, and `false` when
    /// the cell was already set, lies on a forbidden diagonal, or is out of
    /// range.
    pub fn insert(&mut self, row: usize, col: usize) -> bool {
        if !self.constraints.admits(row, col) || self.contains(row, col) {
            return false;
        }
        let Some(forward) = self.index(row, col) else {
            return false;
        };
        self.set(forward);
        if self.constraints.is_undirected() {
            if let Some(mirror) = self.index(col, row) {
                self.set(mirror);
            }
        }
        true
    }

    /// Number of logical edges. Undirected edges are counted once.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        if self.constraints.is_directed() {
            return self.cells.iter().filter(|&&cell| cell).count();
        }
        (0..self.order)
            .map(|row| {
                self.row(row)
                    .iter()
                    .take(row + 1)
                    .filter(|&&cell| cell)
                    .count()
            })
            .sum()
    }

    /// Returns `true` when `adj[i][j] == adj[j][i]` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        (0..self.order)
            .all(|row| (0..row).all(|col| self.contains(row, col) == self.contains(col, row)))
    }

    /// Returns `true` when any vertex is connected to itself.
    #[must_use]
    pub fn has_self_loop(&self) -> bool {
        (0..self.order).any(|vertex| self.contains(vertex, vertex))
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.order && col < self.order).then(|| row * self.order + col)
    }

    fn set(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = true;
        }
    }
}
