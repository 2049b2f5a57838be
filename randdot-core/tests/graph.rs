//! End-to-end checks of sampling and rendering through the public API.

use std::collections::HashSet;

use rand::{SeedableRng, rngs::SmallRng};
use randdot_core::{
    GraphConstraints, GraphError, GraphSampler, GraphWriter, RandomGraphBuilder, SamplingStrategy,
};
use randdot_test_support::dot::parse_document;
use rstest::rstest;

#[test]
fn directed_graph_with_self_loops_lists_three_vertices_and_two_edges() {
    let adjacency = GraphSampler::new(GraphConstraints::default())
        .sample(3, 2, &mut SmallRng::seed_from_u64(2024))
        .expect("two edges fit on three vertices");
    let text = GraphWriter::new().render(&adjacency);
    let document = parse_document(&text).expect("rendered DOT must parse");

    assert!(text.starts_with("digraph G {\n"));
    assert!(text.ends_with("}\n"));
    assert_eq!(document.vertices, vec![1, 2, 3]);
    assert_eq!(document.edges.len(), 2);
    let distinct: HashSet<_> = document.edges.iter().collect();
    assert_eq!(distinct.len(), 2);
}

#[rstest]
#[case::auto(SamplingStrategy::Auto)]
#[case::rejection(SamplingStrategy::Rejection)]
#[case::enumeration(SamplingStrategy::Enumeration)]
fn undirected_simple_triangle_is_complete(#[case] strategy: SamplingStrategy) {
    let constraints = GraphConstraints::new(true, true);
    let adjacency = GraphSampler::new(constraints)
        .with_strategy(strategy)
        .sample(3, 3, &mut SmallRng::seed_from_u64(1))
        .expect("max_edges(3) is 3");
    let document = parse_document(&GraphWriter::new().render(&adjacency))
        .expect("rendered DOT must parse");

    assert!(document.undirected);
    assert_eq!(document.edges, vec![(2, 1), (3, 1), (3, 2)]);
}

#[test]
fn undirected_two_vertices_reject_five_edges() {
    let result = GraphSampler::new(GraphConstraints::default().with_undirected(true)).sample(
        2,
        5,
        &mut SmallRng::seed_from_u64(0),
    );
    assert!(matches!(result, Err(GraphError::InvalidParameters { .. })));
}

#[test]
fn empty_graph_renders_only_the_frame() {
    let graph = RandomGraphBuilder::new(0)
        .build()
        .expect("an empty graph is valid");
    let (adjacency, _) = graph.generate().expect("no allocation is needed");
    assert_eq!(GraphWriter::new().render(&adjacency), "digraph G {\n}\n");
}

#[test]
fn rendering_the_same_matrix_is_byte_identical() {
    let adjacency = GraphSampler::new(GraphConstraints::default().with_undirected(true))
        .sample(15, 40, &mut SmallRng::seed_from_u64(3))
        .expect("forty edges fit on fifteen vertices");
    let writer = GraphWriter::new();
    let first = writer.render(&adjacency);
    let mut streamed = Vec::new();
    writer
        .write_to(&adjacency, &mut streamed)
        .expect("vec writes cannot fail");
    assert_eq!(first, writer.render(&adjacency));
    assert_eq!(first.as_bytes(), streamed.as_slice());
}

#[test]
fn near_saturated_request_completes() {
    let constraints = GraphConstraints::new(false, true);
    let vertices = 60;
    let max_edges = usize::try_from(constraints.max_edges(vertices)).expect("fits in usize");
    let adjacency = GraphSampler::new(constraints)
        .sample(vertices, max_edges - 1, &mut SmallRng::seed_from_u64(17))
        .expect("one short of saturation is valid");
    assert_eq!(adjacency.edge_count(), max_edges - 1);
    assert!(!adjacency.has_self_loop());
}
