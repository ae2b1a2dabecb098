pub mod account;
pub mod transfers;
pub mod reputation;
pub mod sender_chain;

pub use account::{HighTxVolume, LargeBalance, NewlyCreated, TxBurstActivity};
pub use transfers::{DustActivity, ManyUniqueSenders};
pub use reputation::ReputationReported;
pub use sender_chain::{SenderChainAnalyzer, SenderTally};

use std::sync::Arc;
use crate::config::HeuristicConfig;
use crate::core::Heuristic;
use crate::models::{EvaluationContext, Finding};

/// The fixed, ordered set of evidence-only heuristics.
///
/// Order only affects the order of flags on the verdict; the score is a sum.
/// Sender-chain analysis runs after these and lives on the evaluator because
/// it re-enters the pipeline.
pub struct HeuristicSet {
    heuristics: Vec<Arc<dyn Heuristic>>,
}

impl HeuristicSet {
    pub fn new() -> Self {
        Self {
            heuristics: Vec::new(),
        }
    }

    pub fn from_config(config: &HeuristicConfig) -> Self {
        Self::new()
            .add_heuristic(Arc::new(HighTxVolume::new(config.high_tx_volume.clone())))
            .add_heuristic(Arc::new(LargeBalance::new(config.large_balance.clone())))
            .add_heuristic(Arc::new(NewlyCreated::new(config.newly_created.clone())))
            .add_heuristic(Arc::new(DustActivity::new(config.dust_activity.clone())))
            .add_heuristic(Arc::new(ManyUniqueSenders::new(config.many_unique_senders.clone())))
            .add_heuristic(Arc::new(TxBurstActivity::new(config.tx_burst_activity.clone())))
            .add_heuristic(Arc::new(ReputationReported::new(config.reputation_reported.clone())))
    }

    pub fn add_heuristic(mut self, heuristic: Arc<dyn Heuristic>) -> Self {
        self.heuristics.push(heuristic);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.heuristics.iter().map(|h| h.name()).collect()
    }

    /// One entry per heuristic, `None` where it did not fire
    pub fn run(&self, ctx: &EvaluationContext) -> Vec<Option<Finding>> {
        self.heuristics.iter().map(|h| h.evaluate(ctx)).collect()
    }
}

impl Default for HeuristicSet {
    fn default() -> Self {
        Self::from_config(&HeuristicConfig::default())
    }
}
