//! The transport network the game is played on.
//!
//! The game only ever queries the network through the [`Network`] trait.
//! [`Graph`] is an in-memory undirected implementation suitable for tests
//! and small boards.

use crate::ticket::Transport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node identifier on the transport network
pub type Location = u32;

/// An outgoing edge from some node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub destination: Location,
    pub transport: Transport,
}

/// Read-only query interface over a transport network
pub trait Network: Send + Sync {
    /// All edges leaving `node`. Unknown nodes have no edges.
    fn edges_from(&self, node: Location) -> Vec<Edge>;

    /// Whether `node` is part of the network
    fn contains(&self, node: Location) -> bool;

    /// Number of nodes
    fn node_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }
}

/// Undirected multigraph keyed by location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    adjacency: BTreeMap<Location, Vec<Edge>>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with no edges
    pub fn add_node(&mut self, node: Location) -> &mut Self {
        self.adjacency.entry(node).or_default();
        self
    }

    /// Add an undirected edge between `a` and `b`
    pub fn add_edge(&mut self, a: Location, b: Location, transport: Transport) -> &mut Self {
        self.adjacency.entry(a).or_default().push(Edge {
            destination: b,
            transport,
        });
        if a != b {
            self.adjacency.entry(b).or_default().push(Edge {
                destination: a,
                transport,
            });
        }
        self
    }

    /// Build a graph from `(a, b, transport)` triples
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Location, Location, Transport)>,
    {
        let mut graph = Self::new();
        for (a, b, transport) in edges {
            graph.add_edge(a, b, transport);
        }
        graph
    }

    /// All nodes in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = Location> + '_ {
        self.adjacency.keys().copied()
    }
}

impl Network for Graph {
    fn edges_from(&self, node: Location) -> Vec<Edge> {
        self.adjacency.get(&node).cloned().unwrap_or_default()
    }

    fn contains(&self, node: Location) -> bool {
        self.adjacency.contains_key(&node)
    }

    fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}
