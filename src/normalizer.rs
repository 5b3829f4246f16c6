//! Relation normalizer - the main entry point for cleaning up relation sets.
//!
//! A normalization run chains the stages from [`crate::normalize`]:
//! - Dangling connection pruning (enhanced mode, when elements are known)
//! - Grouping of `or`/`and` branch points
//! - Direction correction against the starting element
//! - Cycle detection (diagnostic only)
//! - Splitting of multi-source relations
//! - Regrouping of the split pieces
//! - Sorting along the flow

use std::collections::HashSet;

use tracing::trace;

use crate::{
    NormalizeConfig, OrderingHintKind,
    graph::{FlowGraph, cycles::detect_cycles, is_attached},
    normalize::{DirectionCorrector, IdPatternHint, NoHint, NormalizeReport, OrderingHint, Stage, group_relations, sort_relations, split_relations},
    template::{Element, FlowTemplate, Relation},
};

/// Normalized relations together with the diagnostics of the run.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub relations: Vec<Relation>,
    pub report: NormalizeReport,
}

/// Runs the normalization pipeline.
///
/// A normalizer holds configuration only; every call works on its inputs
/// alone, so one instance can be shared across threads.
///
/// # Example
///
/// ```rust,ignore
/// let normalizer = NormalizerBuilder::new().max_passes(5).build();
/// let normalized = normalizer.normalize(&relations, Some("start"), &elements);
/// for stage in normalized.report.stages.iter() {
///     println!("{}: {} changes", stage.stage.as_ref(), stage.changes);
/// }
/// ```
pub struct Normalizer {
    /// Tiebreak for connections between equally distant elements.
    pub(crate) hint: Box<dyn OrderingHint>,
    /// Reverse connections that leave a convergence element.
    pub(crate) enforce_convergence: bool,
    /// Name fragments marking convergence elements.
    pub(crate) convergence_keywords: Vec<String>,
    /// Cap on fixpoint passes.
    pub(crate) max_passes: usize,
    /// Drop connections to unknown elements before anything else.
    pub(crate) prune_dangling: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new_with_config(&NormalizeConfig::default())
    }
}

impl Normalizer {
    /// Creates a normalizer from configuration.
    pub fn new_with_config(config: &NormalizeConfig) -> Self {
        let hint: Box<dyn OrderingHint> = match config.ordering_hint {
            OrderingHintKind::IdPattern => Box::new(IdPatternHint),
            OrderingHintKind::None => Box::new(NoHint),
        };

        Self {
            hint,
            enforce_convergence: config.enforce_convergence,
            convergence_keywords: config.convergence_keywords.clone(),
            max_passes: config.max_passes.max(1),
            prune_dangling: config.prune_dangling,
        }
    }

    /// Distance-based correction only: no convergence enforcement, no
    /// ordering hint, no pruning.
    pub fn basic() -> Self {
        Self {
            hint: Box::new(NoHint),
            enforce_convergence: false,
            convergence_keywords: Vec::new(),
            max_passes: crate::config::DEFAULT_MAX_PASSES,
            prune_dangling: false,
        }
    }

    /// Normalizes `relations` against `elements`, flowing from `starting_element_id`.
    pub fn normalize(
        &self,
        relations: &[Relation],
        starting_element_id: Option<&str>,
        elements: &[Element],
    ) -> Normalized {
        let mut report = NormalizeReport::default();
        let mut current = relations.to_vec();

        if self.prune_dangling && !elements.is_empty() {
            let count = current.len();
            let (pruned, removed) = prune_dangling(current, elements);
            current = pruned;
            report.record(Stage::PruneDangling, count, current.len(), removed);
        }

        let count = current.len();
        current = group_relations(current, self.max_passes);
        report.record(Stage::Group, count, current.len(), count - current.len());

        let correction = DirectionCorrector::enhanced(self.hint.as_ref(), &self.convergence_keywords, self.max_passes)
            .with_convergence(self.enforce_convergence)
            .correct(&current, starting_element_id, elements);
        current = correction.relations;
        report.record(Stage::CorrectDirection, current.len(), current.len(), correction.reversed);

        let graph = FlowGraph::build(elements, current.iter());
        trace!("normalize: corrected graph\n{}", graph.schema());
        report.record_cycles(current.len(), detect_cycles(&graph));

        let count = current.len();
        current = split_relations(current);
        report.record(Stage::Split, count, current.len(), current.len().abs_diff(count));

        let count = current.len();
        current = group_relations(current, self.max_passes);
        report.record(Stage::Regroup, count, current.len(), count - current.len());

        let before: Vec<String> = current.iter().map(|r| r.id.clone()).collect();
        current = sort_relations(current, starting_element_id);
        let moved = before.iter().zip(current.iter()).filter(|(id, r)| **id != r.id).count();
        report.record(Stage::Sort, current.len(), current.len(), moved);

        Normalized {
            relations: current,
            report,
        }
    }

    /// Normalizes a whole template, returning a copy with corrected relations.
    pub fn process_template(
        &self,
        template: &FlowTemplate,
    ) -> (FlowTemplate, NormalizeReport) {
        trace!("normalize: template {} ({} relations)", template.id, template.relations.len());
        let normalized = self.normalize(&template.relations, template.starting_element_id.as_deref(), &template.elements);

        let mut processed = template.clone();
        processed.relations = normalized.relations;
        (processed, normalized.report)
    }
}

/// Canonicalizes `relations` with the distance rule only.
///
/// Called on template and flow create/update before persisting.
pub fn normalize_relations(
    relations: &[Relation],
    starting_element_id: Option<&str>,
    elements: &[Element],
) -> Vec<Relation> {
    Normalizer::basic().normalize(relations, starting_element_id, elements).relations
}

/// Canonicalizes a template's relations with convergence enforcement,
/// ordering hints, dangling-connection pruning and cycle diagnostics.
pub fn process_template_relations(template: &FlowTemplate) -> FlowTemplate {
    Normalizer::default().process_template(template).0
}

fn prune_dangling(
    relations: Vec<Relation>,
    elements: &[Element],
) -> (Vec<Relation>, usize) {
    let known: HashSet<&str> = elements.iter().map(|e| e.id.as_str()).collect();
    let mut removed = 0;

    let relations = relations
        .into_iter()
        .map(|mut relation| {
            let before = relation.connections.len();
            relation.connections.retain(|c| is_attached(c, &known));
            removed += before - relation.connections.len();
            relation
        })
        .collect();

    (relations, removed)
}
