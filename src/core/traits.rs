use async_trait::async_trait;
use crate::core::SharedEvaluationCache;
use crate::models::{
    AccountSummary, EvaluationContext, Finding, ReputationReport, TransferRecord, VerdictRecord,
};
use crate::utils::Result;

/// Core abstraction: one independent risk signal over an address's evidence
pub trait Heuristic: Send + Sync {
    /// Flag raised when this heuristic fires
    fn name(&self) -> &'static str;

    /// Contribution to the aggregate score when triggered
    fn weight(&self) -> f64;

    fn enabled(&self) -> bool {
        true
    }

    /// Does the evidence trip this heuristic?
    fn triggered(&self, ctx: &EvaluationContext) -> bool;

    /// `Some(finding)` when enabled and triggered, otherwise nothing
    fn evaluate(&self, ctx: &EvaluationContext) -> Option<Finding> {
        if self.enabled() && self.triggered(ctx) {
            Some(Finding::new(self.name(), self.weight()))
        } else {
            None
        }
    }
}

/// External source of evidence for one address
#[async_trait]
pub trait EvidenceGateway: Send + Sync {
    async fn fetch_account_summary(&self, address: &str) -> Result<AccountSummary>;

    /// Most recent first, at most `limit` entries
    async fn fetch_incoming_transfers(&self, address: &str, limit: usize) -> Result<Vec<TransferRecord>>;

    async fn fetch_reputation_reports(&self, address: &str, network: &str) -> Result<Vec<ReputationReport>>;
}

/// Re-entry point used by the sender-chain analysis to evaluate a sender
/// inside the same call tree
#[async_trait]
pub trait SenderResolver: Send + Sync {
    async fn resolve_sender(
        &self,
        address: &str,
        cache: &mut SharedEvaluationCache,
        depth: usize,
    ) -> VerdictRecord;
}
