//! Merge `or`/`and` relations that describe the same branch point.
//!
//! Two relations of the same type belong together when they share exactly
//! the same set of targets (a convergence) or exactly the same set of
//! sources (a divergence). Target matches are merged before source matches.
//! A merge is refused when the result would leave several sources and reach
//! several targets. The first relation of a group, in input order, absorbs
//! the others and keeps its id. Passes repeat until nothing merges, since a
//! merged relation can match relations its parts did not.

use std::collections::BTreeSet;

use tracing::trace;

use crate::template::{Connection, ElementId, Relation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Targets,
    Sources,
}

pub fn group_relations(
    relations: Vec<Relation>,
    max_passes: usize,
) -> Vec<Relation> {
    let mut current = relations;
    for pass in 0..max_passes.max(1) {
        let (next, by_target) = group_pass(current, Side::Targets);
        let (next, by_source) = group_pass(next, Side::Sources);
        current = next;
        if by_target + by_source == 0 {
            break;
        }
        trace!("group: pass {} merged {} by target, {} by source", pass, by_target, by_source);
    }
    current
}

fn group_pass(
    relations: Vec<Relation>,
    side: Side,
) -> (Vec<Relation>, usize) {
    let mut slots: Vec<Option<Relation>> = relations.into_iter().map(Some).collect();
    let mut result = Vec::with_capacity(slots.len());
    let mut merged = 0;

    for i in 0..slots.len() {
        let Some(mut representative) = slots[i].take() else {
            continue;
        };

        if representative.relation_type.is_groupable() && !representative.connections.is_empty() {
            for slot in slots.iter_mut().skip(i + 1) {
                let groupable = slot.as_ref().is_some_and(|other| can_merge(&representative, other, side));
                if !groupable {
                    continue;
                }
                if let Some(other) = slot.take() {
                    trace!("group: merging relation {} into {}", other.id, representative.id);
                    append_unique(&mut representative.connections, other.connections);
                    merged += 1;
                }
            }
        }

        result.push(representative);
    }

    (result, merged)
}

fn can_merge(
    representative: &Relation,
    other: &Relation,
    side: Side,
) -> bool {
    if other.relation_type != representative.relation_type || other.connections.is_empty() {
        return false;
    }

    let (sources, targets) = endpoint_sets(representative);
    let (other_sources, other_targets) = endpoint_sets(other);
    let matches = match side {
        Side::Targets => other_targets == targets,
        Side::Sources => other_sources == sources,
    };

    // the merged relation must still fan out of one source or into one target
    matches && (sources.union(&other_sources).count() == 1 || targets.union(&other_targets).count() == 1)
}

fn endpoint_sets(relation: &Relation) -> (BTreeSet<ElementId>, BTreeSet<ElementId>) {
    let sources = relation.connections.iter().map(|c| c.from_element_id.clone()).collect();
    let targets = relation.connections.iter().map(|c| c.to_element_id.clone()).collect();
    (sources, targets)
}

fn append_unique(
    connections: &mut Vec<Connection>,
    others: Vec<Connection>,
) {
    for conn in others {
        if !connections.contains(&conn) {
            connections.push(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::RelationType;

    fn rel(
        id: &str,
        relation_type: RelationType,
        edges: &[(&str, &str)],
    ) -> Relation {
        Relation::new(id, relation_type, edges.iter().map(|(f, t)| Connection::new(*f, *t)).collect())
    }

    #[test]
    fn test_groups_common_target() {
        let relations = vec![
            Relation::new("r1", RelationType::Or, vec![Connection::new("a", "c").with_handles("bottom", "top-target")]),
            Relation::new("r2", RelationType::Or, vec![Connection::new("b", "c").with_handles("bottom", "top-target")]),
        ];
        let result = group_relations(relations, 10);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "r1");
        assert_eq!(result[0].relation_type, RelationType::Or);
        assert_eq!(result[0].connections.len(), 2);
    }

    #[test]
    fn test_groups_common_source() {
        let relations = vec![rel("r1", RelationType::And, &[("a", "x")]), rel("r2", RelationType::And, &[("a", "y")]), rel("r3", RelationType::And, &[("a", "z")])];
        let result = group_relations(relations, 10);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].targets(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_does_not_group_across_types() {
        let relations = vec![rel("r1", RelationType::Or, &[("a", "c")]), rel("r2", RelationType::And, &[("b", "c")])];
        assert_eq!(group_relations(relations, 10).len(), 2);
    }

    #[test]
    fn test_never_groups_flow_and_markers() {
        let relations = vec![
            rel("r1", RelationType::Flow, &[("a", "c")]),
            rel("r2", RelationType::Flow, &[("b", "c")]),
            rel("r3", RelationType::In, &[("doc", "c")]),
            rel("r4", RelationType::In, &[("doc", "c")]),
        ];
        assert_eq!(group_relations(relations.clone(), 10), relations);
    }

    #[test]
    fn test_partial_overlap_not_grouped() {
        // targets {c, d} vs {c}: not an exact match
        let relations = vec![rel("r1", RelationType::Or, &[("a", "c"), ("a", "d")]), rel("r2", RelationType::Or, &[("b", "c")])];
        assert_eq!(group_relations(relations, 10).len(), 2);
    }

    #[test]
    fn test_unrelated_relation_between_group_members() {
        let relations = vec![rel("r1", RelationType::Or, &[("a", "x")]), rel("r3", RelationType::Or, &[("b", "y")]), rel("r2", RelationType::Or, &[("c", "y")])];
        let result = group_relations(relations, 10);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "r1");
        assert_eq!(result[1].id, "r3");
        assert_eq!(result[1].sources(), vec!["b", "c"]);
    }

    #[test]
    fn test_refuses_many_to_many_merge() {
        // r1 and r2 share source a; once merged they share targets {x, y}
        // with r3, but a {a, b} x {x, y} relation could never be split back
        let relations = vec![rel("r1", RelationType::Or, &[("a", "x")]), rel("r3", RelationType::Or, &[("b", "x"), ("b", "y")]), rel("r2", RelationType::Or, &[("a", "y")])];
        let result = group_relations(relations, 10);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "r1");
        assert_eq!(result[0].targets(), vec!["x", "y"]);
        assert_eq!(result[1].id, "r3");
    }

    #[test]
    fn test_target_match_wins_over_source_match() {
        // o3 shares source a with o1, but o1 first absorbs o2 by target
        // and then cannot also take o3
        let relations = vec![rel("o1", RelationType::Or, &[("a", "c")]), rel("o3", RelationType::Or, &[("a", "d")]), rel("o2", RelationType::Or, &[("b", "c")])];
        let result = group_relations(relations, 10);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].connections, vec![Connection::new("a", "c"), Connection::new("b", "c")]);
        assert_eq!(result[1].connections, vec![Connection::new("a", "d")]);
    }

    #[test]
    fn test_grouped_relations_stay_fans() {
        let relations = vec![
            rel("r1", RelationType::And, &[("a", "x")]),
            rel("r2", RelationType::And, &[("a", "y")]),
            rel("r3", RelationType::And, &[("b", "x")]),
            rel("r4", RelationType::And, &[("b", "y")]),
            rel("r5", RelationType::And, &[("c", "x")]),
        ];
        let result = group_relations(relations, 10);

        for relation in result.iter() {
            assert!(relation.sources().len() == 1 || relation.targets().len() == 1, "{:?}", relation);
        }
        assert_eq!(result.iter().map(|r| r.connections.len()).sum::<usize>(), 5);
    }

    #[test]
    fn test_duplicate_connections_collapsed() {
        let relations = vec![rel("r1", RelationType::And, &[("a", "x")]), rel("r2", RelationType::And, &[("a", "x")])];
        let result = group_relations(relations, 10);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].connections.len(), 1);
    }

    #[test]
    fn test_empty_relations_left_alone() {
        let relations = vec![rel("r1", RelationType::Or, &[]), rel("r2", RelationType::Or, &[])];
        assert_eq!(group_relations(relations, 10).len(), 2);
    }

    #[test]
    fn test_grouping_is_stable() {
        let relations = vec![rel("r1", RelationType::Or, &[("a", "c")]), rel("r2", RelationType::Or, &[("b", "c")]), rel("r3", RelationType::Flow, &[("c", "d")])];
        let once = group_relations(relations, 10);
        let twice = group_relations(once.clone(), 10);
        assert_eq!(once, twice);
    }
}
