//! # Flowtrack
//!
//! Flowtrack is the relation normalization and scheduling core of a workflow tracker.
//! It turns hand-drawn, often malformed element connections into a canonical relation set
//! and derives duration ranges and completion dates from it.
//!
//! ## Core Features
//!
//! - **Relation Normalization**: groups `or`/`and` branch points, corrects connection direction
//!   from the starting element, splits multi-source relations and sorts them along the flow
//! - **Convergence Enforcement**: elements joining several branches are never used as a source
//! - **Cycle Diagnostics**: circular dependencies are reported, never silently removed
//! - **Duration Ranges**: `{min, max}` workday estimates for sequential, alternative and parallel flows
//! - **Completion Dates**: per-element expected dates over a Monday to Friday calendar
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowtrack::{
//!     FlowTemplate, TemplateModel, calculate_element_dates, calculate_flow_duration, format_duration_range, get_duration_label, process_template_relations,
//! };
//!
//! let model = TemplateModel::from_json(json_str)?;
//! let template = process_template_relations(&FlowTemplate::try_from(&model)?);
//!
//! let range = calculate_flow_duration(&template);
//! println!("{} {}", format_duration_range(&range), get_duration_label(&range));
//!
//! let dates = calculate_element_dates(&template, flow_start);
//! ```

mod builder;
mod config;
mod error;
mod graph;
mod model;
mod normalize;
mod normalizer;
mod schedule;
mod template;
mod utils;

pub use builder::NormalizerBuilder;
pub use config::{Config, NormalizeConfig, OrderingHintKind};
pub use error::FlowtrackError;
pub use graph::{DistanceMap, FlowGraph, IncomingEdge, IncomingMap, cycles::detect_cycles, incoming_edges};
pub use model::*;
pub use normalize::{
    Correction, DirectionCorrector, IdPatternHint, NoHint, NormalizeReport, OrderingHint, Stage, StageSummary, convergence_nodes, group_relations, sort_relations,
    split_relations,
};
pub use normalizer::{Normalized, Normalizer, normalize_relations, process_template_relations};
pub use schedule::{
    DurationRange, ElementDateMap, calculate_element_dates, calculate_element_dates_from, calculate_flow_duration, calculate_flow_duration_from,
    calculate_total_duration, format_duration_range, get_duration_label,
};
pub use template::{Connection, Element, ElementId, ElementType, FlowTemplate, MAX_DURATION_DAYS, Relation, RelationId, RelationType};
pub use utils::workday::{add_workdays, is_workday, next_workday, previous_workday, workdays_between};

/// Result type alias for Flowtrack operations.
pub type Result<T> = std::result::Result<T, FlowtrackError>;
