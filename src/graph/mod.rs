//! Graph views over a template's elements and connections.
//!
//! [`FlowGraph`] wraps a petgraph `DiGraph` holding the stored connection
//! directions. It answers distance queries by walking edges in both
//! directions and serves as the input for cycle detection.
//! [`incoming_edges`] builds the dependency view used by the date scheduler.

pub mod cycles;

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use crate::template::{Connection, Element, ElementId, Relation, RelationType};

/// BFS hop count from the starting element. Unreached elements are absent.
pub type DistanceMap = HashMap<ElementId, usize>;

/// A logical predecessor of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingEdge {
    pub from_element_id: ElementId,
    pub relation_type: RelationType,
}

/// `to_element_id -> predecessors`, in logical dependency direction.
pub type IncomingMap = HashMap<ElementId, Vec<IncomingEdge>>;

/// Directed graph of elements connected in their stored direction.
///
/// Artefact markers (`in`/`out`) and connections with an endpoint that is
/// not a known element are left out.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    graph: DiGraph<ElementId, RelationType>,
    nodes: HashMap<ElementId, NodeIndex>,
}

impl FlowGraph {
    pub fn build<'a, I>(
        elements: &[Element],
        relations: I,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Relation>,
    {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for element in elements.iter() {
            if !nodes.contains_key(&element.id) {
                let idx = graph.add_node(element.id.clone());
                nodes.insert(element.id.clone(), idx);
            }
        }

        for relation in relations.into_iter().filter(|r| !r.relation_type.is_artefact_marker()) {
            for conn in relation.connections.iter() {
                let (Some(from), Some(to)) = (nodes.get(&conn.from_element_id), nodes.get(&conn.to_element_id)) else {
                    continue;
                };
                graph.add_edge(*from, *to, relation.relation_type);
            }
        }

        Self { graph, nodes }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(
        &self,
        id: &str,
    ) -> bool {
        self.nodes.contains_key(id)
    }

    /// Element ids in insertion order.
    pub fn element_ids(&self) -> impl Iterator<Item = &ElementId> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// Direct successors of `id`, in the order their connections were added.
    pub fn successors(
        &self,
        id: &str,
    ) -> Vec<&ElementId> {
        let Some(idx) = self.nodes.get(id) else {
            return Vec::new();
        };
        // petgraph yields the newest edge first
        let mut targets: Vec<&ElementId> = self.graph.edges_directed(*idx, Direction::Outgoing).map(|e| &self.graph[e.target()]).collect();
        targets.reverse();
        targets
    }

    /// Number of distinct elements with a connection into `id`.
    pub fn distinct_source_count(
        &self,
        id: &str,
    ) -> usize {
        let Some(idx) = self.nodes.get(id) else {
            return 0;
        };
        self.graph.neighbors_directed(*idx, Direction::Incoming).filter(|src| src != idx).collect::<HashSet<_>>().len()
    }

    /// Breadth-first hop counts from `start`, ignoring edge direction.
    pub fn distances_from(
        &self,
        start: &str,
    ) -> DistanceMap {
        let mut distances = DistanceMap::new();
        let Some(start_idx) = self.nodes.get(start) else {
            return distances;
        };

        let mut queue = VecDeque::new();
        distances.insert(self.graph[*start_idx].clone(), 0);
        queue.push_back((*start_idx, 0));

        while let Some((idx, dist)) = queue.pop_front() {
            for next in self.graph.neighbors_undirected(idx) {
                let id = &self.graph[next];
                if distances.contains_key(id) {
                    continue;
                }
                distances.insert(id.clone(), dist + 1);
                queue.push_back((next, dist + 1));
            }
        }

        distances
    }

    /// Human-readable adjacency listing, used in trace output.
    pub fn schema(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("elements: {}, connections: {}", self.node_count(), self.edge_count()));

        for id in self.element_ids() {
            let successors = self.successors(id);
            if successors.is_empty() {
                lines.push(format!("{} -> (end)", id));
            } else {
                let successors: Vec<&str> = successors.iter().map(|s| s.as_str()).collect();
                lines.push(format!("{} -> {}", id, successors.join(", ")));
            }
        }

        lines.join("\n")
    }
}

/// Logical predecessors of every element, honouring upward-drawn edges.
///
/// Artefact markers and dangling connections are skipped. Every element gets
/// an entry, empty when it has no predecessors.
pub fn incoming_edges(
    elements: &[Element],
    relations: &[Relation],
) -> IncomingMap {
    let mut incoming: IncomingMap = elements.iter().map(|e| (e.id.clone(), Vec::new())).collect();

    for relation in relations.iter().filter(|r| !r.relation_type.is_artefact_marker()) {
        for conn in relation.connections.iter() {
            let (from, to) = conn.logical_endpoints();
            if from == to || !incoming.contains_key(from) {
                continue;
            }
            if let Some(preds) = incoming.get_mut(to) {
                preds.push(IncomingEdge {
                    from_element_id: from.clone(),
                    relation_type: relation.relation_type,
                });
            }
        }
    }

    incoming
}

/// Whether both endpoints of `conn` are known elements.
pub fn is_attached(
    conn: &Connection,
    known: &HashSet<&str>,
) -> bool {
    known.contains(conn.from_element_id.as_str()) && known.contains(conn.to_element_id.as_str())
}
