//! Scheduling artifacts derived from a template: aggregate duration ranges
//! and per-element completion dates.

mod dates;
mod duration;

use serde::{Deserialize, Serialize};

pub use dates::{ElementDateMap, calculate_element_dates, calculate_element_dates_from};
pub use duration::{calculate_flow_duration, calculate_flow_duration_from, calculate_total_duration};

/// Spread of possible total completion times, in workdays.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationRange {
    pub min: u32,
    pub max: u32,
}

impl DurationRange {
    pub fn new(
        min: u32,
        max: u32,
    ) -> Self {
        Self { min, max }
    }

    pub fn fixed(days: u32) -> Self {
        Self::new(days, days)
    }

    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}

/// Renders `"3"` for a fixed range and `"3 - 7"` otherwise.
pub fn format_duration_range(range: &DurationRange) -> String {
    if range.is_fixed() {
        range.min.to_string()
    } else {
        format!("{} - {}", range.min, range.max)
    }
}

/// Unit label to print after [`format_duration_range`].
pub fn get_duration_label(range: &DurationRange) -> &'static str {
    if range.is_fixed() && range.min == 1 { "day" } else { "days" }
}
