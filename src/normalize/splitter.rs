//! Split relations whose connections leave more than one source element.
//!
//! Such relations appear when upstream merges went wrong. Each distinct
//! source gets its own relation of the same type. The piece for the first
//! source keeps the original id so repeated runs stay stable; the others get
//! fresh ids. Relations without connections are dropped.

use tracing::trace;

use crate::{
    template::{Connection, ElementId, Relation},
    utils,
};

pub fn split_relations(relations: Vec<Relation>) -> Vec<Relation> {
    let mut result = Vec::with_capacity(relations.len());

    for relation in relations {
        if relation.connections.is_empty() {
            trace!("split: dropping empty relation {}", relation.id);
            continue;
        }

        let mut by_source: Vec<(ElementId, Vec<Connection>)> = Vec::new();
        for conn in relation.connections.iter() {
            match by_source.iter_mut().find(|(source, _)| *source == conn.from_element_id) {
                Some((_, conns)) => conns.push(conn.clone()),
                None => by_source.push((conn.from_element_id.clone(), vec![conn.clone()])),
            }
        }

        if by_source.len() == 1 {
            result.push(relation);
            continue;
        }

        trace!("split: relation {} has {} sources", relation.id, by_source.len());
        for (i, (_, connections)) in by_source.into_iter().enumerate() {
            let id = if i == 0 { relation.id.clone() } else { utils::shortid() };
            result.push(Relation::new(id, relation.relation_type, connections));
        }
    }

    result
}
