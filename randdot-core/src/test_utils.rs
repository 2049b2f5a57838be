//! Shared test utilities for `randdot-core`.

use proptest::test_runner::Config as ProptestConfig;
use randdot_test_support::ci::property_test_profile::ProptestRunProfile;

use crate::{adjacency::AdjacencyMatrix, constraints::GraphConstraints};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// Keeps property suites aligned on the same `RANDDOT_PBT_CASES` and
/// `RANDDOT_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Every constraint combination, in a fixed order.
pub(crate) const ALL_CONSTRAINTS: [GraphConstraints; 4] = [
    GraphConstraints::new(false, false),
    GraphConstraints::new(false, true),
    GraphConstraints::new(true, false),
    GraphConstraints::new(true, true),
];

/// Collects the set cells of `adjacency` as `(row, col)` pairs in row-major
/// order.
pub(crate) fn set_cells(adjacency: &AdjacencyMatrix) -> Vec<(usize, usize)> {
    let order = adjacency.order();
    (0..order)
        .flat_map(|row| (0..order).map(move |col| (row, col)))
        .filter(|&(row, col)| adjacency.contains(row, col))
        .collect()
}
