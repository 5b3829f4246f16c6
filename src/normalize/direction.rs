//! Direction correction: make every connection point away from the
//! starting element.
//!
//! The distance rule compares BFS hop counts from the start (computed with
//! edge direction ignored) and reverses a connection whose target is closer
//! to the start than its source. Connections touching an unreached element
//! are left alone.
//!
//! With convergence enforcement enabled, elements that join several branches
//! (more than one distinct source, or a name containing one of the configured
//! keywords) must never be a connection's source. That rule wins over the
//! distance rule.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::{
    graph::{DistanceMap, FlowGraph},
    normalize::hint::{NoHint, OrderingHint},
    template::{Connection, Element, ElementId, Relation},
};

/// Output of a correction pass.
#[derive(Debug, Clone)]
pub struct Correction {
    pub relations: Vec<Relation>,
    /// Number of connection reversals performed.
    pub reversed: usize,
}

pub struct DirectionCorrector<'a> {
    hint: &'a dyn OrderingHint,
    convergence_keywords: &'a [String],
    enforce_convergence: bool,
    max_passes: usize,
}

impl<'a> DirectionCorrector<'a> {
    /// Distance rule only.
    pub fn distance_only() -> Self {
        Self {
            hint: &NoHint,
            convergence_keywords: &[],
            enforce_convergence: false,
            max_passes: 1,
        }
    }

    /// Distance rule plus convergence enforcement and the ordering tiebreak.
    pub fn enhanced(
        hint: &'a dyn OrderingHint,
        convergence_keywords: &'a [String],
        max_passes: usize,
    ) -> Self {
        Self {
            hint,
            convergence_keywords,
            enforce_convergence: true,
            max_passes: max_passes.max(1),
        }
    }

    pub fn with_convergence(
        mut self,
        enforce: bool,
    ) -> Self {
        self.enforce_convergence = enforce;
        self
    }

    pub fn correct(
        &self,
        relations: &[Relation],
        starting_element_id: Option<&str>,
        elements: &[Element],
    ) -> Correction {
        let mut corrected = relations.to_vec();
        let Some(start) = starting_element_id else {
            trace!("direction: no starting element, skipped");
            return Correction {
                relations: corrected,
                reversed: 0,
            };
        };

        let by_id: HashMap<&str, &Element> = elements.iter().map(|e| (e.id.as_str(), e)).collect();
        let distances = FlowGraph::build(elements, relations.iter()).distances_from(start);

        let mut reversed = 0;
        for pass in 0..self.max_passes {
            let convergence = if self.enforce_convergence {
                convergence_nodes(elements, &corrected, self.convergence_keywords)
            } else {
                HashSet::new()
            };

            let mut changed = 0;
            for relation in corrected.iter_mut().filter(|r| !r.relation_type.is_artefact_marker()) {
                for conn in relation.connections.iter_mut() {
                    if self.should_reverse(conn, &distances, &convergence, &by_id) {
                        trace!("direction: reversing {} -> {} in relation {}", conn.from_element_id, conn.to_element_id, relation.id);
                        conn.reverse();
                        changed += 1;
                    }
                }
            }

            reversed += changed;
            if changed == 0 || !self.enforce_convergence {
                break;
            }
            trace!("direction: pass {} reversed {} connections", pass, changed);
        }

        Correction {
            relations: corrected,
            reversed,
        }
    }

    fn should_reverse(
        &self,
        conn: &Connection,
        distances: &DistanceMap,
        convergence: &HashSet<ElementId>,
        by_id: &HashMap<&str, &Element>,
    ) -> bool {
        let from_joins = convergence.contains(&conn.from_element_id);
        let to_joins = convergence.contains(&conn.to_element_id);
        if from_joins && !to_joins {
            return true;
        }
        if to_joins && !from_joins {
            return false;
        }

        let (Some(from_dist), Some(to_dist)) = (distances.get(&conn.from_element_id), distances.get(&conn.to_element_id)) else {
            return false;
        };
        if to_dist < from_dist {
            return true;
        }
        if to_dist > from_dist {
            return false;
        }

        match (by_id.get(conn.from_element_id.as_str()), by_id.get(conn.to_element_id.as_str())) {
            (Some(from), Some(to)) => self.hint.precedes(to, from) && !self.hint.precedes(from, to),
            _ => false,
        }
    }
}

/// Elements that join branches: named like a join, or fed by more than one
/// distinct source.
pub fn convergence_nodes(
    elements: &[Element],
    relations: &[Relation],
    keywords: &[String],
) -> HashSet<ElementId> {
    let graph = FlowGraph::build(elements, relations.iter());
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    elements
        .iter()
        .filter(|e| {
            let name = e.name.to_lowercase();
            keywords.iter().any(|k| !k.is_empty() && name.contains(k.as_str())) || graph.distinct_source_count(&e.id) > 1
        })
        .map(|e| e.id.clone())
        .collect()
}
