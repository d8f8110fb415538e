//! Concurrent deduplicating store for vertices and edges
//!
//! The store is the only place identities are assigned and counters move.
//! Every upsert resolves the candidate's unique name against a dedup index
//! and either registers a fresh record or merges into the existing one,
//! under a single exclusive lock.

use super::entity::{Edge, EdgeCandidate, Entity, Vertex, VertexCandidate};
use super::ident::{IdGenerator, RandomIds};
use super::property::PropertyMap;
use super::types::{EdgeId, VertexId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    /// The unique name is the sole dedup key; an empty one would silently
    /// fold every such candidate into a single entity.
    #[error("candidate unique name is empty")]
    EmptyUniqueName,
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Aggregate totals used to normalize per-entity counts into empirical
/// probabilities
///
/// Maintained only on first-creation, never on merge: each total equals the
/// number of distinct unique names ever upserted for its kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_vertex_count: f64,
    pub total_edge_count: f64,
    pub total_entity_count: f64,
}

/// Everything the graph lock guards: both identity-keyed stores, both
/// name-keyed dedup indices, and the aggregate totals.
#[derive(Debug, Default)]
struct GraphInner {
    vertices: FxHashMap<VertexId, Vertex>,
    edges: FxHashMap<EdgeId, Edge>,
    vertex_names: HashMap<String, VertexId>,
    edge_names: HashMap<String, EdgeId>,
    stats: GraphStats,
}

/// In-memory deduplicated graph of named entities
///
/// One exclusive mutex guards all four maps and the totals, so an entire
/// lookup-or-create-and-merge sequence is atomic: concurrent upserts
/// racing on one unique name produce exactly one identity, and the totals
/// never observe a torn update. The lock is coarse (vertex and edge
/// upserts serialize against each other) — upserts are cheap map
/// operations and the critical section is bounded, so contention is
/// transient and a single lock rules out deadlock.
///
/// `Graph` is an explicit handle with no ambient global instance; share it
/// across threads via `Arc<Graph>`.
pub struct Graph {
    ids: Box<dyn IdGenerator>,
    inner: Mutex<GraphInner>,
}

impl Graph {
    /// Create an empty graph with random (uuid v4) identities
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(RandomIds))
    }

    /// Create an empty graph with an injected identity generator
    pub fn with_id_generator(ids: Box<dyn IdGenerator>) -> Self {
        Graph {
            ids,
            inner: Mutex::new(GraphInner::default()),
        }
    }

    /// Register a new vertex or merge into the existing one with the same
    /// unique name.
    ///
    /// On a dedup hit the stored vertex absorbs the candidate's properties
    /// (empty overwrite set) and its counter moves; on a miss the candidate
    /// becomes canonical with a fresh identity, counter 1.0, and an empty
    /// adjacency set, and the vertex and entity totals move. Returns a
    /// clone of the canonical record either way.
    pub fn upsert_vertex(&self, candidate: VertexCandidate) -> GraphResult<Vertex> {
        if candidate.unique_name.is_empty() {
            return Err(GraphError::EmptyUniqueName);
        }

        let mut inner = self.inner.lock().unwrap();
        if let Some(&id) = inner.vertex_names.get(&candidate.unique_name) {
            let vertex = inner
                .vertices
                .get_mut(&id)
                .expect("dedup index entry without stored vertex");
            vertex
                .entity
                .update_properties(candidate.properties, PropertyMap::new());
            debug!(unique_name = %vertex.entity.unique_name, count = vertex.entity.count, "merged vertex");
            Ok(vertex.clone())
        } else {
            let id = VertexId::new(self.ids.next_id());
            let vertex = Vertex::new(Entity::new(
                id.as_uuid(),
                candidate.name,
                candidate.unique_name,
                candidate.label,
                candidate.properties,
            ));
            inner
                .vertex_names
                .insert(vertex.entity.unique_name.clone(), id);
            inner.vertices.insert(id, vertex.clone());
            inner.stats.total_vertex_count += 1.0;
            inner.stats.total_entity_count += 1.0;
            debug!(unique_name = %vertex.entity.unique_name, %id, "created vertex");
            Ok(vertex)
        }
    }

    /// Register a new edge or merge into the existing one with the same
    /// unique name.
    ///
    /// Same protocol as [`Graph::upsert_vertex`]. A freshly created edge
    /// keeps the caller-supplied endpoint identities and directionality
    /// tag; neither is merged or re-validated on the hit path, and endpoint
    /// identities are not checked against the vertex store.
    pub fn upsert_edge(&self, candidate: EdgeCandidate) -> GraphResult<Edge> {
        if candidate.unique_name.is_empty() {
            return Err(GraphError::EmptyUniqueName);
        }

        let mut inner = self.inner.lock().unwrap();
        if let Some(&id) = inner.edge_names.get(&candidate.unique_name) {
            let edge = inner
                .edges
                .get_mut(&id)
                .expect("dedup index entry without stored edge");
            edge.entity
                .update_properties(candidate.properties, PropertyMap::new());
            debug!(unique_name = %edge.entity.unique_name, count = edge.entity.count, "merged edge");
            Ok(edge.clone())
        } else {
            let id = EdgeId::new(self.ids.next_id());
            let edge = Edge {
                entity: Entity::new(
                    id.as_uuid(),
                    candidate.name,
                    candidate.unique_name,
                    candidate.label,
                    candidate.properties,
                ),
                vertex_a: candidate.vertex_a,
                vertex_b: candidate.vertex_b,
                directionality: candidate.directionality,
            };
            inner.edge_names.insert(edge.entity.unique_name.clone(), id);
            inner.edges.insert(id, edge.clone());
            inner.stats.total_edge_count += 1.0;
            inner.stats.total_entity_count += 1.0;
            debug!(unique_name = %edge.entity.unique_name, %id, "created edge");
            Ok(edge)
        }
    }

    /// Link an edge into a vertex's adjacency set.
    ///
    /// Idempotent set-insert with no counting side effects. The adjacency
    /// view is complete only once the caller has linked the edge into both
    /// endpoints after a successful edge upsert; the store never does this
    /// automatically. Returns true if the edge was newly linked, false on a
    /// repeat link or an unknown vertex.
    pub fn link_edge(&self, vertex: VertexId, edge: EdgeId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.vertices.get_mut(&vertex) {
            Some(v) => v.link_edge(edge),
            None => false,
        }
    }

    /// Get a vertex by identity
    pub fn get_vertex(&self, id: VertexId) -> Option<Vertex> {
        self.inner.lock().unwrap().vertices.get(&id).cloned()
    }

    /// Get an edge by identity
    pub fn get_edge(&self, id: EdgeId) -> Option<Edge> {
        self.inner.lock().unwrap().edges.get(&id).cloned()
    }

    /// Resolve a vertex unique name to its identity
    pub fn vertex_id_by_name(&self, unique_name: &str) -> Option<VertexId> {
        self.inner
            .lock()
            .unwrap()
            .vertex_names
            .get(unique_name)
            .copied()
    }

    /// Resolve an edge unique name to its identity
    pub fn edge_id_by_name(&self, unique_name: &str) -> Option<EdgeId> {
        self.inner
            .lock()
            .unwrap()
            .edge_names
            .get(unique_name)
            .copied()
    }

    /// Get a vertex by unique name
    pub fn vertex_by_name(&self, unique_name: &str) -> Option<Vertex> {
        let inner = self.inner.lock().unwrap();
        let id = inner.vertex_names.get(unique_name)?;
        inner.vertices.get(id).cloned()
    }

    /// Get an edge by unique name
    pub fn edge_by_name(&self, unique_name: &str) -> Option<Edge> {
        let inner = self.inner.lock().unwrap();
        let id = inner.edge_names.get(unique_name)?;
        inner.edges.get(id).cloned()
    }

    /// Edges linked into a vertex's adjacency set, resolved to records
    pub fn incident_edges(&self, id: VertexId) -> Vec<Edge> {
        let inner = self.inner.lock().unwrap();
        inner
            .vertices
            .get(&id)
            .map(|vertex| {
                vertex
                    .edges
                    .iter()
                    .filter_map(|eid| inner.edges.get(eid))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Snapshot of the aggregate totals
    pub fn stats(&self) -> GraphStats {
        self.inner.lock().unwrap().stats
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
