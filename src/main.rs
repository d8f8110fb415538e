//! Demo driver: builds a word-transition graph from a small sentence
//! corpus and prints the empirical probabilities the counters encode.
//!
//! This is a thin client of the core, not part of it: tokenization, the
//! calling protocol (vertices before edges, explicit adjacency links) and
//! all probability math live here.

use anyhow::Result;
use pgm::graph::{EdgeCandidate, Graph, VertexCandidate};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("PGM v{}", pgm::version());
    println!("==========================================");
    println!();

    let corpus: Vec<Vec<&str>> = vec![
        vec!["what", "is", "thought", "eric", "baum"],
        vec!["what", "is", "happiness", "eric", "whitegate"],
        vec!["what", "do", "happiness", "and", "fear", "have", "in", "common"],
        vec!["on", "the", "nature", "of", "things", "whitegate"],
        vec!["what", "is", "the", "meaning", "of", "this"],
    ];

    let graph = Graph::new();
    ingest(&graph, &corpus)?;

    report(&graph, "what");

    let stats = graph.stats();
    println!("\nGraph totals: {}", serde_json::to_string(&stats)?);

    Ok(())
}

/// Upsert every consecutive word pair of every sentence: both words as
/// vertices, the transition as an edge, then link the edge into both
/// endpoints.
fn ingest(graph: &Graph, corpus: &[Vec<&str>]) -> Result<()> {
    for sentence in corpus {
        let mut idx = 0;
        while idx + 1 < sentence.len() {
            let (word_a, word_b) = (sentence[idx], sentence[idx + 1]);

            let vertex_a = graph.upsert_vertex(VertexCandidate::new(word_a))?;
            let vertex_b = graph.upsert_vertex(VertexCandidate::new(word_b))?;

            let edge = graph.upsert_edge(
                EdgeCandidate::new(format!("{}_{}", word_a, word_b), vertex_a.id(), vertex_b.id())
                    .with_directionality("directed"),
            )?;

            graph.link_edge(vertex_a.id(), edge.id());
            graph.link_edge(vertex_b.id(), edge.id());

            idx += 2;
        }
    }
    Ok(())
}

/// Print global and conditional probabilities around one vertex.
fn report(graph: &Graph, word: &str) {
    let Some(vertex) = graph.vertex_by_name(word) else {
        println!("vertex {:?} was never observed", word);
        return;
    };
    let stats = graph.stats();

    println!(
        "probability of global {}: {}",
        vertex.entity.unique_name,
        global_probability(vertex.entity.count, stats.total_vertex_count)
    );

    let incident = graph.incident_edges(vertex.id());
    let edge_count_sum: f64 = incident.iter().map(|e| e.entity.count).sum();

    for edge in &incident {
        println!(
            "probability of global {}: {}",
            edge.entity.unique_name,
            global_probability(edge.entity.count, stats.total_edge_count)
        );

        let from = graph
            .get_vertex(edge.vertex_a)
            .map(|v| v.entity.unique_name)
            .unwrap_or_default();
        let to = graph
            .get_vertex(edge.vertex_b)
            .map(|v| v.entity.unique_name)
            .unwrap_or_default();
        println!(
            "probability of {} coming after {}: {}",
            to,
            from,
            global_probability(edge.entity.count, edge_count_sum)
        );
    }
}

/// Count over total, guarding the empty-graph case; the core leaves this
/// division to its callers.
fn global_probability(count: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        count / total
    }
}
