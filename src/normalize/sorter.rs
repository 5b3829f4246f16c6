//! Order relations along the flow, starting from the starting element.
//!
//! Relations are emitted in waves: every relation with a source already
//! reached is emitted (keeping input order within the wave), then its
//! targets count as reached. When no relation is reachable the first
//! remaining one is forced out, so nothing is ever dropped.

use std::collections::HashSet;

use tracing::trace;

use crate::template::{ElementId, Relation};

pub fn sort_relations(
    relations: Vec<Relation>,
    starting_element_id: Option<&str>,
) -> Vec<Relation> {
    let Some(start) = starting_element_id else {
        return relations;
    };

    let mut reached: HashSet<ElementId> = HashSet::from([start.to_string()]);
    let mut sorted = Vec::with_capacity(relations.len());
    let mut remaining = relations;

    while !remaining.is_empty() {
        let (ready, rest): (Vec<Relation>, Vec<Relation>) =
            remaining.into_iter().partition(|r| r.connections.iter().any(|c| reached.contains(&c.from_element_id)));
        remaining = rest;

        let wave = if ready.is_empty() {
            trace!("sort: forcing unreachable relation {}", remaining[0].id);
            vec![remaining.remove(0)]
        } else {
            ready
        };

        for relation in wave {
            reached.extend(relation.connections.iter().map(|c| c.to_element_id.clone()));
            sorted.push(relation);
        }
    }

    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Connection, RelationType};

    fn flow(
        id: &str,
        from: &str,
        to: &str,
    ) -> Relation {
        Relation::new(id, RelationType::Flow, vec![Connection::new(from, to)])
    }

    fn ids(relations: &[Relation]) -> Vec<&str> {
        relations.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_sort_follows_flow() {
        let relations = vec![flow("r3", "b", "c"), flow("r1", "s", "a"), flow("r2", "a", "b")];
        let sorted = sort_relations(relations, Some("s"));
        assert_eq!(ids(&sorted), vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_sort_waves_keep_input_order() {
        let relations = vec![flow("r4", "a", "x"), flow("r2", "s", "b"), flow("r3", "b", "y"), flow("r1", "s", "a")];
        let sorted = sort_relations(relations, Some("s"));
        assert_eq!(ids(&sorted), vec!["r2", "r1", "r4", "r3"]);
    }

    #[test]
    fn test_sort_without_start_is_noop() {
        let relations = vec![flow("r2", "a", "b"), flow("r1", "s", "a")];
        let sorted = sort_relations(relations.clone(), None);
        assert_eq!(sorted, relations);
    }

    #[test]
    fn test_orphans_appended() {
        let relations = vec![flow("o1", "x", "y"), flow("r1", "s", "a"), flow("o2", "y", "z"), Relation::new("e", RelationType::Or, vec![])];
        let sorted = sort_relations(relations, Some("s"));

        assert_eq!(sorted.len(), 4);
        // o1 forced, which unlocks o2
        assert_eq!(ids(&sorted), vec!["r1", "o1", "o2", "e"]);
    }

    #[test]
    fn test_unknown_start_keeps_everything() {
        let relations = vec![flow("r1", "a", "b"), flow("r2", "b", "c")];
        let sorted = sort_relations(relations, Some("missing"));
        assert_eq!(ids(&sorted), vec!["r1", "r2"]);
    }
}
