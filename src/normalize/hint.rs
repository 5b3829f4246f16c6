//! Ordering hints: best-effort tiebreaks for connections whose endpoints sit
//! at the same distance from the starting element.
//!
//! Hints only look at ids and names, so they are fragile by nature. The
//! distance-based correction never depends on them.

use std::sync::LazyLock;

use regex::Regex;

use crate::template::Element;

/// Regex pattern for numbered ids and names.
/// Format: `<prefix><number>`, e.g. `step-3`, `Review 12`, `elem2`
const NUMBERED_PATTERN: &str = r"^(.*?)[\s_-]*(\d+)$";

static NUMBERED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(NUMBERED_PATTERN).ok());

/// Words marking the beginning of a flow.
const OPENING_WORDS: [&str; 3] = ["start", "begin", "initial"];
/// Words marking the end of a flow.
const CLOSING_WORDS: [&str; 4] = ["end", "finish", "done", "final"];

pub trait OrderingHint: Send + Sync {
    /// Returns true when `a` should come before `b` in the flow.
    ///
    /// Implementations must never report both `precedes(a, b)` and
    /// `precedes(b, a)`.
    fn precedes(
        &self,
        a: &Element,
        b: &Element,
    ) -> bool;
}

/// Disables the tiebreak.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHint;

impl OrderingHint for NoHint {
    fn precedes(
        &self,
        _a: &Element,
        _b: &Element,
    ) -> bool {
        false
    }
}

/// Orders by opening/closing words in names, then by numeric suffix of ids
/// (or names) that share a prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdPatternHint;

impl OrderingHint for IdPatternHint {
    fn precedes(
        &self,
        a: &Element,
        b: &Element,
    ) -> bool {
        let (rank_a, rank_b) = (position_rank(&a.name), position_rank(&b.name));
        if rank_a != rank_b {
            return rank_a < rank_b;
        }

        for (left, right) in [(a.id.as_str(), b.id.as_str()), (a.name.as_str(), b.name.as_str())] {
            if let (Some((prefix_l, num_l)), Some((prefix_r, num_r))) = (numbered(left), numbered(right)) {
                if prefix_l.eq_ignore_ascii_case(prefix_r) && num_l != num_r {
                    return num_l < num_r;
                }
            }
        }

        false
    }
}

/// 0 for opening names, 2 for closing names, 1 otherwise.
fn position_rank(name: &str) -> u8 {
    let words: Vec<String> = name.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).map(|w| w.to_lowercase()).collect();

    if words.iter().any(|w| OPENING_WORDS.contains(&w.as_str())) {
        0
    } else if words.iter().any(|w| CLOSING_WORDS.contains(&w.as_str())) {
        2
    } else {
        1
    }
}

fn numbered(s: &str) -> Option<(&str, u64)> {
    let re = NUMBERED.as_ref()?;
    let caps = re.captures(s)?;
    let prefix = caps.get(1)?.as_str();
    let number = caps.get(2)?.as_str().parse().ok()?;
    Some((prefix, number))
}
