use std::collections::HashSet;

use tracing::{debug, info};

use common::{Error, Result};

use crate::config::StrategyFileConfig;
use crate::kind::StrategyKind;

/// Fixed, read-only table of the selectable strategies keyed by display name.
///
/// Built once at startup and shared behind an `Arc`; there is exactly one
/// entry per strategy type, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRegistry {
    strategies: Vec<StrategyKind>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self {
            strategies: StrategyKind::defaults().to_vec(),
        }
    }
}

impl StrategyRegistry {
    /// Build the registry from config, rejecting unknown types and bad parameters.
    pub fn from_config(file_cfg: &StrategyFileConfig) -> Result<Self> {
        let mut registry = Self::default();
        let mut seen = HashSet::new();

        for cfg in &file_cfg.strategies {
            if !seen.insert(cfg.strategy_type.as_str()) {
                return Err(Error::Config(format!(
                    "Strategy type '{}' is configured more than once",
                    cfg.strategy_type
                )));
            }
            let kind = cfg.build()?;
            if let Some(slot) = registry
                .strategies
                .iter_mut()
                .find(|k| k.type_name() == kind.type_name())
            {
                *slot = kind;
            }
            info!(name = kind.display_name(), ?kind, "Configured strategy parameters");
        }

        Ok(registry)
    }

    /// Display names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(StrategyKind::display_name)
    }

    pub fn strategies(&self) -> &[StrategyKind] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Exact lookup by display name.
    pub fn get(&self, name: &str) -> Option<&StrategyKind> {
        self.strategies.iter().find(|k| k.display_name() == name)
    }

    /// Look up a strategy by display name. Unknown names fall back to Buy and
    /// Hold; a bad selection never aborts a run.
    pub fn resolve(&self, name: &str) -> StrategyKind {
        match self.get(name) {
            Some(kind) => *kind,
            None => {
                debug!(requested = name, "Unknown strategy, using Buy and Hold");
                StrategyKind::BuyAndHold
            }
        }
    }
}
