//! Heuristics over the incoming transfer list

use crate::config::{DustActivityConfig, ManyUniqueSendersConfig};
use crate::core::Heuristic;
use crate::models::{flags, EvaluationContext};

/// Many tiny incoming transfers (address poisoning, dusting)
pub struct DustActivity {
    config: DustActivityConfig,
}

impl DustActivity {
    pub fn new(config: DustActivityConfig) -> Self {
        Self { config }
    }

    fn dust_count(&self, ctx: &EvaluationContext) -> usize {
        ctx.incoming_transfers
            .iter()
            .filter(|t| t.amount < self.config.dust_limit)
            .count()
    }
}

impl Heuristic for DustActivity {
    fn name(&self) -> &'static str {
        flags::DUST_ACTIVITY
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn triggered(&self, ctx: &EvaluationContext) -> bool {
        self.dust_count(ctx) >= self.config.min_count
    }
}

/// Funds arriving from an unusually wide set of addresses
pub struct ManyUniqueSenders {
    config: ManyUniqueSendersConfig,
}

impl ManyUniqueSenders {
    pub fn new(config: ManyUniqueSendersConfig) -> Self {
        Self { config }
    }
}

impl Heuristic for ManyUniqueSenders {
    fn name(&self) -> &'static str {
        flags::MANY_UNIQUE_SENDERS
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn triggered(&self, ctx: &EvaluationContext) -> bool {
        ctx.distinct_senders(usize::MAX).len() > self.config.min_count
    }
}
