//! Probabilistic graph model core
//!
//! This module implements the deduplicating entity graph:
//! - Entity records with identity, observation counters and property bags
//! - Vertices with identity-keyed adjacency sets
//! - Edges with endpoint identities and a directionality tag
//! - A mutex-guarded store coordinating concurrent create-or-merge upserts
//! - An injectable identity-generation capability

pub mod entity;
pub mod ident;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use entity::{Edge, EdgeCandidate, Entity, Vertex, VertexCandidate};
pub use ident::{IdGenerator, RandomIds, SequentialIds};
pub use property::{PropertyMap, PropertyValue};
pub use store::{Graph, GraphError, GraphResult, GraphStats};
pub use types::{EdgeId, VertexId};
