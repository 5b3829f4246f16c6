use std::{fs, path::Path};

use serde::Deserialize;

use crate::{FlowtrackError, Result};

/// Default element name fragments marking a convergence node.
pub const DEFAULT_CONVERGENCE_KEYWORDS: [&str; 3] = ["join", "merge", "converge"];
/// Default cap on fixpoint passes (grouping, convergence enforcement).
pub const DEFAULT_MAX_PASSES: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// relation normalization config
    #[serde(default)]
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// reverse connections leaving a convergence node
    pub enforce_convergence: bool,
    /// element name fragments (case-insensitive) that mark a convergence node
    pub convergence_keywords: Vec<String>,
    /// tiebreak used when both endpoints sit at the same distance from start
    pub ordering_hint: OrderingHintKind,
    /// cap on fixpoint passes, defaults to 10
    pub max_passes: usize,
    /// drop connections whose endpoints are not known elements
    pub prune_dangling: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderingHintKind {
    #[default]
    IdPattern,
    None,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            enforce_convergence: true,
            convergence_keywords: DEFAULT_CONVERGENCE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            ordering_hint: OrderingHintKind::default(),
            max_passes: DEFAULT_MAX_PASSES,
            prune_dangling: true,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())
            .map_err(|e| FlowtrackError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        Ok(config)
    }
}
