//! Dependency ordering of chunks.
//!
//! Produces the sequence in which chunk assets are referenced from the HTML:
//! every chunk after the chunks it depends on, so base libraries load before
//! the code that uses them.
//!
//! # Algorithm
//!
//! 1. Every input chunk becomes a node, added in input order.
//! 2. Each parent reference is resolved against the input set by id. Parents
//!    outside the set are dropped: they do not constrain the order.
//! 3. Kahn's algorithm, always taking the ready node that came first in the
//!    input. Identical inputs give identical output, and chunks that do not
//!    depend on each other keep their input order wherever the edges allow.
//! 4. Nodes left over after step 3 sit on a cycle, reported as an error.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap as HashMap;
use thiserror::Error;

use crate::chunk::{Chunk, ChunkId, ParentRef};

/// The parent graph of the chunks contains a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cyclic dependency between chunks: {}", format_cycle(.cycle))]
pub struct CyclicDependencyError {
    /// Ids of the chunks forming one cycle, in input order.
    pub cycle: Vec<ChunkId>,
}

fn format_cycle(cycle: &[ChunkId]) -> String {
    cycle
        .iter()
        .map(ChunkId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Parent-to-child graph over a chunk set. Node weights are input positions.
struct ChunkGraph {
    graph: DiGraph<usize, ()>,
}

impl ChunkGraph {
    fn build(chunks: &[Chunk]) -> Self {
        let mut graph = DiGraph::with_capacity(chunks.len(), chunks.len());
        let mut by_id: HashMap<&ChunkId, NodeIndex> = HashMap::default();

        for (position, chunk) in chunks.iter().enumerate() {
            let node = graph.add_node(position);
            by_id.insert(&chunk.id, node);
        }

        for (position, chunk) in chunks.iter().enumerate() {
            let child = NodeIndex::new(position);
            for parent in &chunk.parents {
                match by_id.get(parent.id()) {
                    Some(&parent_node) => {
                        graph.update_edge(parent_node, child, ());
                    }
                    None => {
                        tracing::trace!(
                            chunk = %chunk.id,
                            parent = %parent.id(),
                            inline = matches!(parent, ParentRef::Inline(_)),
                            "parent outside chunk set, ignoring edge"
                        );
                    }
                }
            }
        }

        Self { graph }
    }

    fn linearize(&self) -> Result<Vec<usize>, Vec<usize>> {
        let graph = &self.graph;
        let mut in_degree: Vec<usize> = graph
            .node_indices()
            .map(|node| graph.neighbors_directed(node, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(position, _)| Reverse(position))
            .collect();

        let mut order = Vec::with_capacity(in_degree.len());
        while let Some(Reverse(position)) = ready.pop() {
            order.push(position);
            for child in graph.neighbors_directed(NodeIndex::new(position), Direction::Outgoing) {
                let degree = &mut in_degree[child.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(child.index()));
                }
            }
        }

        if order.len() == in_degree.len() {
            Ok(order)
        } else {
            Err(self.find_cycle())
        }
    }

    fn find_cycle(&self) -> Vec<usize> {
        let mut cycle = tarjan_scc(&self.graph)
            .into_iter()
            .find(|component| {
                component.len() > 1
                    || self.graph.contains_edge(component[0], component[0])
            })
            .map(|component| component.into_iter().map(|n| n.index()).collect::<Vec<_>>())
            .unwrap_or_default();
        cycle.sort_unstable();
        cycle
    }
}

/// Order `chunks` so that every chunk follows all of its parents.
///
/// The result contains every input chunk exactly once.
///
/// # Errors
///
/// Returns [`CyclicDependencyError`] if the parent references among `chunks`
/// form a cycle (including a chunk listing itself as parent).
///
/// # Example
///
/// ```
/// use fob_html::{Chunk, sort_chunks};
///
/// let chunks = vec![
///     Chunk::new("app", "app", "h1").with_parent("vendor"),
///     Chunk::new("vendor", "vendor", "h2"),
/// ];
/// let sorted = sort_chunks(&chunks).unwrap();
/// let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
/// assert_eq!(names, ["vendor", "app"]);
/// ```
pub fn sort_chunks(chunks: &[Chunk]) -> Result<Vec<&Chunk>, CyclicDependencyError> {
    let graph = ChunkGraph::build(chunks);

    match graph.linearize() {
        Ok(order) => {
            let sorted: Vec<&Chunk> = order.into_iter().map(|position| &chunks[position]).collect();
            tracing::debug!(
                order = ?sorted.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
                "sorted chunks"
            );
            Ok(sorted)
        }
        Err(cycle) => Err(CyclicDependencyError {
            cycle: cycle.into_iter().map(|position| chunks[position].id.clone()).collect(),
        }),
    }
}
