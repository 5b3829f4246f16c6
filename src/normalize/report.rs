//! Stage-by-stage diagnostics for a normalization run.

use serde::Serialize;
use tracing::{debug, trace};

use crate::template::ElementId;

/// Normalization pipeline stages, in execution order.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    PruneDangling,
    Group,
    CorrectDirection,
    DetectCycles,
    Split,
    Regroup,
    Sort,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub stage: Stage,
    pub relations_in: usize,
    pub relations_out: usize,
    /// Stage-specific change count: connections removed or reversed,
    /// relations merged, split or moved, cycles found.
    pub changes: usize,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub stages: Vec<StageSummary>,
    pub cycles: Vec<Vec<ElementId>>,
}

impl NormalizeReport {
    pub(crate) fn record(
        &mut self,
        stage: Stage,
        relations_in: usize,
        relations_out: usize,
        changes: usize,
    ) {
        trace!(stage = stage.as_ref(), relations_in, relations_out, changes, "normalize stage");
        self.stages.push(StageSummary {
            stage,
            relations_in,
            relations_out,
            changes,
        });
    }

    pub(crate) fn record_cycles(
        &mut self,
        relation_count: usize,
        cycles: Vec<Vec<ElementId>>,
    ) {
        for cycle in cycles.iter() {
            debug!("normalize: circular dependency {}", cycle.join(" -> "));
        }
        self.record(Stage::DetectCycles, relation_count, relation_count, cycles.len());
        self.cycles = cycles;
    }

    pub fn stage(
        &self,
        stage: Stage,
    ) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// True when no stage other than cycle detection changed anything.
    pub fn is_unchanged(&self) -> bool {
        self.stages.iter().filter(|s| s.stage != Stage::DetectCycles).all(|s| s.changes == 0)
    }
}
