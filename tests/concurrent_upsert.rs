//! Concurrency tests for the upsert/dedup engine
//!
//! Racing upserts on one unique name must produce exactly one identity,
//! with the counter equal to the number of callers and every caller
//! observing the same canonical record.

use pgm::graph::{EdgeCandidate, Graph, SequentialIds, VertexCandidate, VertexId};
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

const CALLERS: usize = 32;

#[test]
fn concurrent_vertex_upserts_dedup_to_one_identity() {
    let graph = Arc::new(Graph::new());

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                graph
                    .upsert_vertex(VertexCandidate::new("what"))
                    .expect("upsert failed")
                    .id()
            })
        })
        .collect();

    let ids: Vec<VertexId> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Exactly one winner; every caller observed its identity.
    assert!(ids.iter().all(|id| *id == ids[0]));

    let stored = graph.vertex_by_name("what").unwrap();
    assert_eq!(stored.id(), ids[0]);
    assert_eq!(stored.entity.count, CALLERS as f64);

    let stats = graph.stats();
    assert_eq!(stats.total_vertex_count, 1.0);
    assert_eq!(stats.total_entity_count, 1.0);
}

#[test]
fn concurrent_edge_upserts_dedup_to_one_identity() {
    let graph = Arc::new(Graph::new());
    let a = graph.upsert_vertex(VertexCandidate::new("what")).unwrap();
    let b = graph.upsert_vertex(VertexCandidate::new("is")).unwrap();

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let graph = Arc::clone(&graph);
            let (a, b) = (a.id(), b.id());
            thread::spawn(move || {
                graph
                    .upsert_edge(EdgeCandidate::new("what_is", a, b))
                    .expect("upsert failed")
                    .id()
            })
        })
        .collect();

    let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));

    let stored = graph.edge_by_name("what_is").unwrap();
    assert_eq!(stored.entity.count, CALLERS as f64);
    assert_eq!(stored.vertex_a, a.id());
    assert_eq!(stored.vertex_b, b.id());

    let stats = graph.stats();
    assert_eq!(stats.total_edge_count, 1.0);
    assert_eq!(stats.total_entity_count, 3.0);
}

#[test]
fn concurrent_mixed_names_keep_aggregates_consistent() {
    let graph = Arc::new(Graph::new());
    let names = ["what", "is", "thought", "eric", "baum"];
    let rounds = 10;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for _ in 0..rounds {
                    for name in names {
                        graph
                            .upsert_vertex(VertexCandidate::new(name))
                            .expect("upsert failed");
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // One record per distinct name, each counting every resolving upsert.
    let stats = graph.stats();
    assert_eq!(stats.total_vertex_count, names.len() as f64);
    assert_eq!(stats.total_entity_count, names.len() as f64);

    for name in names {
        let vertex = graph.vertex_by_name(name).unwrap();
        assert_eq!(vertex.entity.count, (8 * rounds) as f64);
    }
}

#[test]
fn concurrent_adjacency_links_stay_idempotent() {
    let graph = Arc::new(Graph::with_id_generator(Box::new(SequentialIds::new())));
    let a = graph.upsert_vertex(VertexCandidate::new("what")).unwrap();
    let b = graph.upsert_vertex(VertexCandidate::new("is")).unwrap();
    let edge = graph
        .upsert_edge(EdgeCandidate::new("what_is", a.id(), b.id()))
        .unwrap();

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let graph = Arc::clone(&graph);
            let (a, b, e) = (a.id(), b.id(), edge.id());
            thread::spawn(move || {
                graph.link_edge(a, e);
                graph.link_edge(b, e);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // Membership is a set insert: one entry per endpoint no matter how many
    // threads raced the link.
    assert_eq!(graph.get_vertex(a.id()).unwrap().degree(), 1);
    assert_eq!(graph.get_vertex(b.id()).unwrap().degree(), 1);
}

#[test]
fn independent_graphs_do_not_share_state() {
    let g1 = Graph::new();
    let g2 = Graph::new();

    g1.upsert_vertex(VertexCandidate::new("what")).unwrap();

    assert!(g2.vertex_by_name("what").is_none());
    assert_eq!(g2.stats().total_vertex_count, 0.0);
    assert!(g2
        .get_vertex(VertexId::new(Uuid::from_u128(1)))
        .is_none());
}
