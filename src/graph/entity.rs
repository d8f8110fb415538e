//! Entity records shared by vertices and edges
//!
//! An [`Entity`] is the common identity + counter + property bag. A
//! [`Vertex`] adds an adjacency set of incident edge identities, an
//! [`Edge`] adds endpoint identities and a directionality tag. Candidates
//! ([`VertexCandidate`], [`EdgeCandidate`]) are what callers hand to the
//! store; identity, counter and adjacency are assigned by the store.

use super::property::{PropertyMap, PropertyValue};
use super::types::{EdgeId, VertexId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Common record underlying both vertices and edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Generated once at creation, immutable thereafter
    pub id: Uuid,

    /// Human-readable name, not used for deduplication
    pub name: String,

    /// Sole deduplication key; treated as immutable once stored
    pub unique_name: String,

    /// Free-form classification label
    pub label: String,

    /// Observation counter: 1.0 on creation, +1.0 per resolving upsert
    pub count: f64,

    /// Open-ended attribute bag, mutated only through the merge rule
    pub properties: PropertyMap,
}

impl Entity {
    pub(crate) fn new(
        id: Uuid,
        name: String,
        unique_name: String,
        label: String,
        properties: PropertyMap,
    ) -> Self {
        Entity {
            id,
            name,
            unique_name,
            label,
            count: 1.0,
            properties,
        }
    }

    /// Merge newly observed attributes and count the observation.
    ///
    /// Three passes, in order:
    /// 1. keys of `new_props` absent from the bag are inserted (existing
    ///    keys win),
    /// 2. keys of `overwrite_props` already present are overwritten (absent
    ///    keys are ignored),
    /// 3. the bag is then replaced wholesale by `new_props`.
    ///
    /// Step 3 makes the first two passes unobservable to callers that do
    /// not reconcile separately. The sequence is kept as-is; replacement is
    /// the behavior existing callers see.
    pub fn update_properties(&mut self, new_props: PropertyMap, overwrite_props: PropertyMap) {
        // favor already existing properties
        for (key, value) in &new_props {
            if !self.properties.contains_key(key) {
                self.properties.insert(key.clone(), value.clone());
            }
        }

        // overwrite any explicitly overwritten properties
        for (key, value) in overwrite_props {
            if self.properties.contains_key(&key) {
                self.properties.insert(key, value);
            }
        }

        self.properties = new_props;
        self.increment();
    }

    /// Record one more observation of this entity
    pub fn increment(&mut self) {
        self.count += 1.0;
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

/// A vertex: entity plus the identities of its incident edges
///
/// The adjacency set references edges by identity; edges are shared across
/// their two endpoints and owned only by the graph's edge store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub entity: Entity,

    /// Identities of edges touching this vertex
    pub edges: FxHashSet<EdgeId>,
}

impl Vertex {
    pub(crate) fn new(entity: Entity) -> Self {
        Vertex {
            entity,
            edges: FxHashSet::default(),
        }
    }

    pub fn id(&self) -> VertexId {
        VertexId::new(self.entity.id)
    }

    /// Insert an edge into the adjacency set if not already present.
    ///
    /// Idempotent, pure set membership: repeated links have no effect and
    /// no counters move. Returns true if the edge was newly linked.
    pub(crate) fn link_edge(&mut self, edge: EdgeId) -> bool {
        self.edges.insert(edge)
    }

    /// Check whether an edge is linked into this vertex
    pub fn touches(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }

    /// Number of distinct incident edges
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.entity.id == other.entity.id
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.entity.id.hash(state);
    }
}

/// An edge: entity plus endpoint identities and a directionality tag
///
/// Endpoints are identity references into the vertex store, never direct
/// references; the edge does not own its vertices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub entity: Entity,

    /// First endpoint
    pub vertex_a: VertexId,

    /// Second endpoint
    pub vertex_b: VertexId,

    /// Free-form tag (e.g. "directed", "undirected"); never interpreted
    pub directionality: String,
}

impl Edge {
    pub fn id(&self) -> EdgeId {
        EdgeId::new(self.entity.id)
    }

    /// Check if this edge connects two specific vertices, in either order
    pub fn connects(&self, v1: VertexId, v2: VertexId) -> bool {
        (self.vertex_a == v1 && self.vertex_b == v2)
            || (self.vertex_a == v2 && self.vertex_b == v1)
    }

    /// The endpoint opposite `vertex`, if `vertex` is one of the two
    pub fn other_endpoint(&self, vertex: VertexId) -> Option<VertexId> {
        if self.vertex_a == vertex {
            Some(self.vertex_b)
        } else if self.vertex_b == vertex {
            Some(self.vertex_a)
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.entity.id == other.entity.id
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.entity.id.hash(state);
    }
}

/// Candidate vertex handed to the store for upsert
#[derive(Debug, Clone, Default)]
pub struct VertexCandidate {
    pub name: String,
    pub unique_name: String,
    pub label: String,
    pub properties: PropertyMap,
}

impl VertexCandidate {
    pub fn new(unique_name: impl Into<String>) -> Self {
        VertexCandidate {
            unique_name: unique_name.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Candidate edge handed to the store for upsert
///
/// Endpoint identities should reference vertices already upserted; the
/// store does not check (calling-protocol contract, dangling endpoints are
/// the caller's responsibility).
#[derive(Debug, Clone)]
pub struct EdgeCandidate {
    pub name: String,
    pub unique_name: String,
    pub label: String,
    pub properties: PropertyMap,
    pub vertex_a: VertexId,
    pub vertex_b: VertexId,
    pub directionality: String,
}

impl EdgeCandidate {
    pub fn new(unique_name: impl Into<String>, vertex_a: VertexId, vertex_b: VertexId) -> Self {
        EdgeCandidate {
            name: String::new(),
            unique_name: unique_name.into(),
            label: String::new(),
            properties: PropertyMap::new(),
            vertex_a,
            vertex_b,
            directionality: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_directionality(mut self, tag: impl Into<String>) -> Self {
        self.directionality = tag.into();
        self
    }

    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(props: PropertyMap) -> Entity {
        Entity::new(
            Uuid::from_u128(1),
            String::new(),
            "what".to_string(),
            String::new(),
            props,
        )
    }

    #[test]
    fn test_entity_starts_at_one() {
        let e = entity(PropertyMap::new());
        assert_eq!(e.count, 1.0);
    }

    #[test]
    fn test_increment() {
        let mut e = entity(PropertyMap::new());
        e.increment();
        e.increment();
        assert_eq!(e.count, 3.0);
    }

    #[test]
    fn test_update_properties_replaces_wholesale() {
        // The final pass replaces the bag with new_props, regardless of the
        // favor-existing and explicit-overwrite passes before it.
        let mut stored = PropertyMap::new();
        stored.insert("x".to_string(), 0i64.into());
        stored.insert("y".to_string(), 2i64.into());
        let mut e = entity(stored);

        let mut new_props = PropertyMap::new();
        new_props.insert("x".to_string(), 1i64.into());
        e.update_properties(new_props, PropertyMap::new());

        assert_eq!(e.property_count(), 1);
        assert_eq!(e.get_property("x").unwrap().as_integer(), Some(1));
        assert!(!e.has_property("y"));
        assert_eq!(e.count, 2.0);
    }

    #[test]
    fn test_update_properties_overwrite_pass_is_discarded() {
        let mut stored = PropertyMap::new();
        stored.insert("x".to_string(), 0i64.into());
        let mut e = entity(stored);

        let mut new_props = PropertyMap::new();
        new_props.insert("x".to_string(), 5i64.into());
        let mut overwrite = PropertyMap::new();
        overwrite.insert("x".to_string(), 9i64.into());

        // Pass 2 sets x=9, pass 3 replaces the bag with new_props.
        e.update_properties(new_props, overwrite);
        assert_eq!(e.get_property("x").unwrap().as_integer(), Some(5));
    }

    #[test]
    fn test_update_properties_always_increments() {
        let mut e = entity(PropertyMap::new());
        e.update_properties(PropertyMap::new(), PropertyMap::new());
        e.update_properties(PropertyMap::new(), PropertyMap::new());
        assert_eq!(e.count, 3.0);
    }

    #[test]
    fn test_vertex_link_edge_is_idempotent() {
        let mut v = Vertex::new(entity(PropertyMap::new()));
        let eid = EdgeId::new(Uuid::from_u128(7));

        assert!(v.link_edge(eid));
        assert!(!v.link_edge(eid));
        assert_eq!(v.degree(), 1);
        assert!(v.touches(eid));

        // Linking does not count as an observation.
        assert_eq!(v.entity.count, 1.0);
    }

    #[test]
    fn test_edge_connects_either_orientation() {
        let a = VertexId::new(Uuid::from_u128(10));
        let b = VertexId::new(Uuid::from_u128(20));
        let c = VertexId::new(Uuid::from_u128(30));
        let edge = Edge {
            entity: Entity::new(
                Uuid::from_u128(2),
                String::new(),
                "a_b".to_string(),
                String::new(),
                PropertyMap::new(),
            ),
            vertex_a: a,
            vertex_b: b,
            directionality: "directed".to_string(),
        };

        assert!(edge.connects(a, b));
        assert!(edge.connects(b, a));
        assert!(!edge.connects(a, c));
        assert_eq!(edge.other_endpoint(a), Some(b));
        assert_eq!(edge.other_endpoint(c), None);
    }

    #[test]
    fn test_candidate_builders() {
        let v = VertexCandidate::new("what")
            .with_name("What")
            .with_label("word")
            .with_property("seen_in", "question");
        assert_eq!(v.unique_name, "what");
        assert_eq!(v.name, "What");
        assert_eq!(v.label, "word");
        assert_eq!(
            v.properties.get("seen_in").unwrap().as_string(),
            Some("question")
        );

        let a = VertexId::new(Uuid::from_u128(1));
        let b = VertexId::new(Uuid::from_u128(2));
        let e = EdgeCandidate::new("what_is", a, b).with_directionality("directed");
        assert_eq!(e.unique_name, "what_is");
        assert_eq!(e.vertex_a, a);
        assert_eq!(e.vertex_b, b);
        assert_eq!(e.directionality, "directed");
    }
}
