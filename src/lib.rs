//! PGM — probabilistic graph model
//!
//! An in-memory, deduplicated graph of named entities built incrementally
//! from a stream of observations. Vertices and edges are deduplicated by a
//! caller-supplied unique name: the first upsert of a name registers the
//! entity with a fresh identity and a counter of 1.0, every later upsert
//! resolves to the same record, merges its properties and moves the
//! counter. Per-entity counts divided by the graph-wide totals give
//! empirical occurrence probabilities.
//!
//! The upsert path is safe under concurrent callers: a single graph-level
//! mutex makes each lookup-or-create-and-merge sequence atomic, so racing
//! upserts on one name can never create two identities.
//!
//! ## Example Usage
//!
//! ```rust
//! use pgm::graph::{EdgeCandidate, Graph, VertexCandidate};
//!
//! let graph = Graph::new();
//!
//! // Observe two words and the transition between them
//! let what = graph.upsert_vertex(VertexCandidate::new("what")).unwrap();
//! let is = graph.upsert_vertex(VertexCandidate::new("is")).unwrap();
//! let edge = graph
//!     .upsert_edge(EdgeCandidate::new("what_is", what.id(), is.id()).with_directionality("directed"))
//!     .unwrap();
//!
//! // Adjacency is linked explicitly, once per endpoint
//! graph.link_edge(what.id(), edge.id());
//! graph.link_edge(is.id(), edge.id());
//!
//! // A repeated observation merges instead of creating
//! let again = graph.upsert_vertex(VertexCandidate::new("what")).unwrap();
//! assert_eq!(again.id(), what.id());
//! assert_eq!(again.entity.count, 2.0);
//!
//! let stats = graph.stats();
//! assert_eq!(stats.total_vertex_count, 2.0);
//! assert_eq!(stats.total_entity_count, 3.0);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod graph;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeCandidate, EdgeId, Entity, Graph, GraphError, GraphResult, GraphStats,
    IdGenerator, PropertyMap, PropertyValue, RandomIds, SequentialIds, Vertex,
    VertexCandidate, VertexId,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
