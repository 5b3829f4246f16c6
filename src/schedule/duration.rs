//! Aggregate duration range of a flow.
//!
//! The range comes from the mix of branching relations, not from path
//! enumeration:
//! - only `flow` (or nothing): every action runs in sequence
//! - `or` without `and`: one alternative runs, so the shortest and longest
//!   single action bound the range
//! - any `and`: the longest parallel branch is the floor, and the ceiling
//!   adds twice the average action duration on top, capped at the full sum
//!
//! Sums saturate at `u32::MAX` days.

use tracing::trace;

use crate::{
    schedule::DurationRange,
    template::{Element, FlowTemplate, Relation, RelationType},
};

pub fn calculate_flow_duration(template: &FlowTemplate) -> DurationRange {
    calculate_flow_duration_from(&template.elements, &template.relations)
}

pub fn calculate_flow_duration_from(
    elements: &[Element],
    relations: &[Relation],
) -> DurationRange {
    let durations = action_durations(elements);
    if durations.is_empty() {
        return DurationRange::default();
    }

    let total: u64 = durations.iter().copied().map(u64::from).sum();
    let shortest = durations.iter().copied().min().unwrap_or(0);
    let longest = durations.iter().copied().max().unwrap_or(0);

    let has = |relation_type: RelationType| relations.iter().any(|r| r.relation_type == relation_type);
    let range = if has(RelationType::And) {
        let spread = (2 * total) / durations.len() as u64;
        let ceiling = (u64::from(longest) + spread).min(total);
        DurationRange::new(longest, saturate(ceiling))
    } else if has(RelationType::Or) {
        DurationRange::new(shortest, longest)
    } else {
        DurationRange::fixed(saturate(total))
    };

    trace!("duration: {} actions, total {}, range {}..={}", durations.len(), total, range.min, range.max);
    range
}

/// Sum of all action durations, the fully sequential total.
pub fn calculate_total_duration(template: &FlowTemplate) -> u32 {
    saturate(action_durations(&template.elements).iter().copied().map(u64::from).sum())
}

fn saturate(days: u64) -> u32 {
    u32::try_from(days).unwrap_or(u32::MAX)
}

fn action_durations(elements: &[Element]) -> Vec<u32> {
    elements.iter().filter(|e| e.is_action() && e.duration_days > 0).map(|e| e.duration_days).collect()
}
