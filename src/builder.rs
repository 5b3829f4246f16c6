use crate::{Config, NormalizeConfig, Normalizer, OrderingHintKind, normalize::OrderingHint};

pub struct NormalizerBuilder {
    config: NormalizeConfig,
    hint: Option<Box<dyn OrderingHint>>,
}

impl Default for NormalizerBuilder {
    fn default() -> Self {
        Self {
            config: NormalizeConfig::default(),
            hint: None,
        }
    }
}

impl NormalizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the `[normalize]` section of a loaded config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            config: config.normalize.clone(),
            hint: None,
        }
    }

    pub fn enforce_convergence(
        mut self,
        enforce: bool,
    ) -> Self {
        self.config.enforce_convergence = enforce;
        self
    }

    pub fn convergence_keywords<I, S>(
        mut self,
        keywords: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.convergence_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn ordering_hint_kind(
        mut self,
        kind: OrderingHintKind,
    ) -> Self {
        self.config.ordering_hint = kind;
        self.hint = None;
        self
    }

    /// Uses a custom tiebreak instead of the configured one.
    pub fn ordering_hint(
        mut self,
        hint: Box<dyn OrderingHint>,
    ) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn max_passes(
        mut self,
        n: usize,
    ) -> Self {
        self.config.max_passes = n;
        self
    }

    pub fn prune_dangling(
        mut self,
        prune: bool,
    ) -> Self {
        self.config.prune_dangling = prune;
        self
    }

    pub fn build(self) -> Normalizer {
        let mut normalizer = Normalizer::new_with_config(&self.config);
        if let Some(hint) = self.hint {
            normalizer.hint = hint;
        }
        normalizer
    }
}
