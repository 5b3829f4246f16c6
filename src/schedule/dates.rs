//! Expected completion date per element.
//!
//! An element finishes `duration` workdays after the latest of its
//! predecessors finishes; start elements count from the flow start date.
//! Dependencies follow the logical direction of each connection, so
//! upward-drawn edges count backwards. Predecessors found on the current
//! recursion stack are skipped, which breaks cycles.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::trace;

use crate::{
    graph::{IncomingMap, incoming_edges},
    template::{Element, ElementId, FlowTemplate, Relation},
    utils::workday::add_workdays,
};

pub type ElementDateMap = HashMap<ElementId, NaiveDate>;

pub fn calculate_element_dates(
    template: &FlowTemplate,
    flow_start: NaiveDate,
) -> ElementDateMap {
    calculate_element_dates_from(&template.elements, &template.relations, template.starting_element_id.as_deref(), flow_start)
}

pub fn calculate_element_dates_from(
    elements: &[Element],
    relations: &[Relation],
    starting_element_id: Option<&str>,
    flow_start: NaiveDate,
) -> ElementDateMap {
    let incoming = incoming_edges(elements, relations);

    let mut starts: HashSet<ElementId> = elements.iter().filter(|e| incoming.get(&e.id).is_none_or(|preds| preds.is_empty())).map(|e| e.id.clone()).collect();
    if let Some(start) = starting_element_id.filter(|id| incoming.contains_key(*id)) {
        starts.insert(start.to_string());
    }

    let ordered_starts: Vec<&ElementId> = elements.iter().map(|e| &e.id).filter(|id| starts.contains(*id)).collect();
    let mut scheduler = DateScheduler {
        durations: elements.iter().map(|e| (e.id.clone(), e.effective_duration())).collect(),
        incoming,
        starts,
        flow_start,
        dates: ElementDateMap::new(),
        visit_stack: HashSet::new(),
    };

    for id in ordered_starts {
        scheduler.schedule(id);
    }
    // disconnected components and elements only reachable through cycles
    for element in elements.iter() {
        scheduler.schedule(&element.id);
    }

    trace!("dates: scheduled {} elements from {}", scheduler.dates.len(), flow_start);
    scheduler.dates
}

struct DateScheduler {
    durations: HashMap<ElementId, u32>,
    incoming: IncomingMap,
    starts: HashSet<ElementId>,
    flow_start: NaiveDate,
    dates: ElementDateMap,
    visit_stack: HashSet<ElementId>,
}

impl DateScheduler {
    fn schedule(
        &mut self,
        id: &str,
    ) -> Option<NaiveDate> {
        if let Some(date) = self.dates.get(id) {
            return Some(*date);
        }
        if self.visit_stack.contains(id) {
            trace!("dates: cycle through {}, predecessor skipped", id);
            return None;
        }

        self.visit_stack.insert(id.to_string());
        let duration = i64::from(self.durations.get(id).copied().unwrap_or(0));

        let latest = if self.starts.contains(id) {
            None
        } else {
            let preds: Vec<ElementId> = self.incoming.get(id).map(|preds| preds.iter().map(|p| p.from_element_id.clone()).collect()).unwrap_or_default();
            preds.iter().filter_map(|pred| self.schedule(pred)).max()
        };
        let date = add_workdays(latest.unwrap_or(self.flow_start), duration);

        self.visit_stack.remove(id);
        self.dates.insert(id.to_string(), date);
        Some(date)
    }
}
