//! Property-based tests for sampling and rendering.
//!
//! Each case draws a vertex count, a constraint set, a strategy, and a seed,
//! then an edge count anywhere between zero and the constraint-specific
//! maximum.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use randdot_test_support::dot::parse_document;

use crate::{
    GraphError, GraphSampler, GraphWriter, SamplingStrategy,
    constraints::GraphConstraints,
    test_utils::{ALL_CONSTRAINTS, set_cells, suite_proptest_config},
};

const MAX_VERTICES: usize = 24;

#[derive(Debug, Clone, Copy)]
struct SampleRequest {
    vertices: usize,
    edges: usize,
    constraints: GraphConstraints,
    strategy: SamplingStrategy,
    seed: u64,
}

fn strategy_strategy() -> impl Strategy<Value = SamplingStrategy> {
    prop_oneof![
        Just(SamplingStrategy::Auto),
        Just(SamplingStrategy::Rejection),
        Just(SamplingStrategy::Enumeration),
    ]
}

fn request_strategy() -> impl Strategy<Value = SampleRequest> {
    (
        0..=MAX_VERTICES,
        0..ALL_CONSTRAINTS.len(),
        strategy_strategy(),
        any::<u64>(),
    )
        .prop_flat_map(|(vertices, constraint_index, strategy, seed)| {
            let constraints = ALL_CONSTRAINTS
                .get(constraint_index)
                .copied()
                .unwrap_or_default();
            let max_edges = usize::try_from(constraints.max_edges(vertices)).unwrap_or_default();
            (0..=max_edges).prop_map(move |edges| SampleRequest {
                vertices,
                edges,
                constraints,
                strategy,
                seed,
            })
        })
}

fn sample(request: SampleRequest) -> Result<crate::AdjacencyMatrix, GraphError> {
    GraphSampler::new(request.constraints)
        .with_strategy(request.strategy)
        .sample(
            request.vertices,
            request.edges,
            &mut SmallRng::seed_from_u64(request.seed),
        )
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn sampled_graphs_hold_exactly_the_requested_edges(request in request_strategy()) {
        let adjacency = sample(request).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(adjacency.order(), request.vertices);
        prop_assert_eq!(adjacency.edge_count(), request.edges);
    }

    #[test]
    fn sampled_graphs_respect_their_constraints(request in request_strategy()) {
        let adjacency = sample(request).map_err(|err| TestCaseError::fail(err.to_string()))?;
        if request.constraints.is_undirected() {
            prop_assert!(adjacency.is_symmetric());
        }
        if request.constraints.forbids_self_loops() {
            prop_assert!(!adjacency.has_self_loop());
        }
    }

    #[test]
    fn oversized_requests_are_rejected(
        vertices in 0..=MAX_VERTICES,
        constraint_index in 0..ALL_CONSTRAINTS.len(),
        excess in 1_usize..64,
    ) {
        let constraints = ALL_CONSTRAINTS.get(constraint_index).copied().unwrap_or_default();
        let max_edges = usize::try_from(constraints.max_edges(vertices))
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        let edges = max_edges + excess;
        let result = GraphSampler::new(constraints).sample(
            vertices,
            edges,
            &mut SmallRng::seed_from_u64(0),
        );
        let rejected = matches!(result, Err(GraphError::InvalidParameters { .. }));
        prop_assert!(rejected, "{edges} edges on {vertices} vertices were accepted");
    }

    #[test]
    fn rendered_documents_list_each_edge_once(request in request_strategy()) {
        let adjacency = sample(request).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let text = GraphWriter::new().render(&adjacency);
        let document = parse_document(&text).map_err(TestCaseError::fail)?;

        prop_assert_eq!(document.undirected, request.constraints.is_undirected());
        prop_assert_eq!(document.vertices, (1..=request.vertices).collect::<Vec<_>>());
        prop_assert_eq!(document.edges.len(), request.edges);

        let distinct: HashSet<_> = document.edges.iter().copied().collect();
        prop_assert_eq!(distinct.len(), document.edges.len());

        let rendered: HashSet<(usize, usize)> = document
            .edges
            .iter()
            .map(|&(from, to)| (from - 1, to - 1))
            .collect();
        for (row, col) in set_cells(&adjacency) {
            let canonical = request.constraints.is_directed() || col <= row;
            prop_assert_eq!(rendered.contains(&(row, col)), canonical);
        }
    }
}
