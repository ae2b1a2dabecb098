//! Heuristics over the account summary: activity volume, balance and age

use crate::config::{HighTxVolumeConfig, LargeBalanceConfig, NewlyCreatedConfig, TxBurstConfig};
use crate::core::Heuristic;
use crate::models::{flags, EvaluationContext};

const MS_PER_DAY: f64 = 1000.0 * 60.0 * 60.0 * 24.0;

/// Total transaction count above a threshold
pub struct HighTxVolume {
    config: HighTxVolumeConfig,
}

impl HighTxVolume {
    pub fn new(config: HighTxVolumeConfig) -> Self {
        Self { config }
    }
}

impl Heuristic for HighTxVolume {
    fn name(&self) -> &'static str {
        flags::HIGH_TX_VOLUME
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn triggered(&self, ctx: &EvaluationContext) -> bool {
        ctx.account_summary.total_transaction_count > self.config.threshold
    }
}

/// Native balance above a threshold
pub struct LargeBalance {
    config: LargeBalanceConfig,
}

impl LargeBalance {
    pub fn new(config: LargeBalanceConfig) -> Self {
        Self { config }
    }
}

impl Heuristic for LargeBalance {
    fn name(&self) -> &'static str {
        flags::LARGE_BALANCE
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn triggered(&self, ctx: &EvaluationContext) -> bool {
        ctx.account_summary.balance > self.config.threshold
    }
}

/// Account younger than `max_age_ms`
pub struct NewlyCreated {
    config: NewlyCreatedConfig,
}

impl NewlyCreated {
    pub fn new(config: NewlyCreatedConfig) -> Self {
        Self { config }
    }
}

impl Heuristic for NewlyCreated {
    fn name(&self) -> &'static str {
        flags::NEWLY_CREATED
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn triggered(&self, ctx: &EvaluationContext) -> bool {
        ctx.account_summary
            .age_ms(ctx.now_ms)
            .is_some_and(|age| age < self.config.max_age_ms)
    }
}

/// Young account that already has many transactions
pub struct TxBurstActivity {
    config: TxBurstConfig,
}

impl TxBurstActivity {
    pub fn new(config: TxBurstConfig) -> Self {
        Self { config }
    }
}

impl Heuristic for TxBurstActivity {
    fn name(&self) -> &'static str {
        flags::TX_BURST_ACTIVITY
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn triggered(&self, ctx: &EvaluationContext) -> bool {
        let Some(age_ms) = ctx.account_summary.age_ms(ctx.now_ms) else {
            return false;
        };
        let age_days = age_ms as f64 / MS_PER_DAY;

        age_days < self.config.max_age_days
            && ctx.account_summary.total_transaction_count > self.config.min_tx
    }
}
