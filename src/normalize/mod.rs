//! Relation normalization stages.
//!
//! Each stage is a plain function (or a small corrector type) over relation
//! lists. [`crate::Normalizer`] chains them into the full pipeline.

pub mod direction;
pub mod grouper;
pub mod hint;
pub mod report;
pub mod sorter;
pub mod splitter;

pub use direction::{Correction, DirectionCorrector, convergence_nodes};
pub use grouper::group_relations;
pub use hint::{IdPatternHint, NoHint, OrderingHint};
pub use report::{NormalizeReport, Stage, StageSummary};
pub use sorter::sort_relations;
pub use splitter::split_relations;
