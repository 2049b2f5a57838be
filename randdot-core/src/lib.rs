//! randdot core library.
//!
//! Samples uniform random simple graphs with an exact vertex and edge count
//! under a directedness and self-loop policy, and renders them as DOT.
//!
//! ```
//! use rand::{SeedableRng, rngs::SmallRng};
//! use randdot_core::{GraphConstraints, GraphSampler, GraphWriter};
//!
//! let constraints = GraphConstraints::default()
//!     .with_undirected(true)
//!     .with_self_loops_forbidden(true);
//! let adjacency = GraphSampler::new(constraints).sample(3, 3, &mut SmallRng::seed_from_u64(1))?;
//! assert_eq!(
//!     GraphWriter::new().render(&adjacency),
//!     "graph G {\n1;\n2;\n2--1;\n3;\n3--1;\n3--2;\n}\n",
//! );
//! # Ok::<(), randdot_core::GraphError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adjacency;
mod constraints;
mod error;
mod generator;
mod output;
mod sampler;
mod seed;
mod writer;

#[cfg(test)]
mod property;
#[cfg(test)]
mod test_utils;

pub use crate::{
    adjacency::AdjacencyMatrix,
    constraints::GraphConstraints,
    error::{GraphError, GraphErrorCode, Result},
    generator::{GenerationReport, RandomGraph, RandomGraphBuilder},
    output::persist,
    sampler::{GraphSampler, SamplingStrategy},
    seed::{ResolvedSeed, SeedOrigin, resolve_seed},
    writer::{DEFAULT_GRAPH_NAME, DotDocument, GraphWriter, Statement},
};
