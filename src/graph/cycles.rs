//! Depth-first cycle detection over a [`FlowGraph`].
//!
//! Cycles are reported for diagnostics only; nothing here rejects or
//! rewrites the graph.

use std::collections::HashSet;

use crate::{graph::FlowGraph, template::ElementId};

/// Every cycle found, each as the element path from the first occurrence of
/// the repeated element through to the repeat (`[a, b, c, a]`).
pub fn detect_cycles(graph: &FlowGraph) -> Vec<Vec<ElementId>> {
    let mut search = CycleSearch {
        graph,
        visited: HashSet::new(),
        on_stack: HashSet::new(),
        path: Vec::new(),
        cycles: Vec::new(),
    };

    for id in graph.element_ids() {
        if !search.visited.contains(id.as_str()) {
            search.visit(id);
        }
    }

    search.cycles
}

struct CycleSearch<'a> {
    graph: &'a FlowGraph,
    visited: HashSet<&'a str>,
    on_stack: HashSet<&'a str>,
    path: Vec<&'a str>,
    cycles: Vec<Vec<ElementId>>,
}

impl<'a> CycleSearch<'a> {
    fn visit(
        &mut self,
        id: &'a str,
    ) {
        self.visited.insert(id);
        self.on_stack.insert(id);
        self.path.push(id);

        for next in self.graph.successors(id) {
            let next = next.as_str();
            if self.on_stack.contains(next) {
                self.record(next);
            } else if !self.visited.contains(next) {
                self.visit(next);
            }
        }

        self.path.pop();
        self.on_stack.remove(id);
    }

    fn record(
        &mut self,
        repeat: &str,
    ) {
        let Some(start) = self.path.iter().position(|id| *id == repeat) else {
            return;
        };
        let mut cycle: Vec<ElementId> = self.path[start..].iter().map(|id| id.to_string()).collect();
        cycle.push(repeat.to_string());
        if !self.cycles.contains(&cycle) {
            self.cycles.push(cycle);
        }
    }
}
