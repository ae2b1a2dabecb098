use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::blocklist::Blocklist;
use crate::config::EngineConfig;
use crate::core::{EvidenceGateway, ScoreAggregator, SenderResolver, SharedEvaluationCache};
use crate::heuristics::{HeuristicSet, SenderChainAnalyzer};
use crate::models::{EvaluationContext, VerdictRecord};
use crate::storage::VerdictStore;
use crate::utils::{unix_now, unix_now_ms, AmlError, Result};

/// Address risk evaluator.
///
/// Per address: block list → verdict store → evidence preload → heuristics
/// (including the recursive sender-chain pass) → aggregate → persist. Every
/// call returns a well-formed verdict; failures become an `error` verdict
/// that is never persisted.
pub struct Evaluator {
    config: EngineConfig,
    store: Arc<dyn VerdictStore>,
    gateway: Arc<dyn EvidenceGateway>,
    blocklist: Arc<Blocklist>,
    heuristics: HeuristicSet,
    sender_chain: SenderChainAnalyzer,
    aggregator: ScoreAggregator,
}

impl Evaluator {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn VerdictStore>,
        gateway: Arc<dyn EvidenceGateway>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            heuristics: HeuristicSet::from_config(&config.heuristics),
            sender_chain: SenderChainAnalyzer::new(config.heuristics.sender_chain_risk.clone()),
            aggregator: ScoreAggregator::new(config.scoring.clone()),
            blocklist: Arc::new(Blocklist::new()),
            config,
            store,
            gateway,
        })
    }

    pub fn with_blocklist(mut self, blocklist: Arc<Blocklist>) -> Self {
        self.blocklist = blocklist;
        self
    }

    pub fn network(&self) -> &str {
        &self.config.network
    }

    pub fn blocklist(&self) -> &Arc<Blocklist> {
        &self.blocklist
    }

    /// Evaluate one address with a fresh call-tree cache
    pub async fn check(&self, address: &str, force_refresh: bool) -> VerdictRecord {
        let mut cache = SharedEvaluationCache::new();
        self.evaluate(address, force_refresh, &mut cache, 0).await
    }

    /// Evaluate `address` as part of the call tree owning `cache`.
    /// `depth` is 0 for the top-level call.
    pub async fn evaluate(
        &self,
        address: &str,
        force_refresh: bool,
        cache: &mut SharedEvaluationCache,
        depth: usize,
    ) -> VerdictRecord {
        if let Some(record) = cache.resolved(address) {
            return record.clone();
        }

        if self.blocklist.is_blocked_address(address) {
            tracing::info!("{} is on the local block list", address);
            return VerdictRecord::blocked_locally(unix_now());
        }

        if !force_refresh {
            if let Some(record) = self.cached_verdict(address) {
                tracing::debug!("Serving cached verdict for {}", address);
                return record;
            }
        }

        cache.claim(address);

        tracing::info!("Evaluating {} on {} (depth {})", address, self.config.network, depth);

        let ctx = match self.preload(address).await {
            Ok(ctx) => ctx,
            Err(e) => {
                tracing::warn!("Evidence preload failed for {}: {}", address, e);
                let record = VerdictRecord::evidence_error(e.to_string(), unix_now());
                cache.resolve(address, record.clone());
                return record;
            }
        };

        let mut results = self.heuristics.run(&ctx);
        results.push(self.sender_chain.evaluate(self, &ctx, cache, depth).await);

        let aggregate = self.aggregator.aggregate(results);
        let record = VerdictRecord::auto(aggregate.status, aggregate.score, aggregate.flags, unix_now());

        tracing::info!(
            "Verdict for {}: {} (score {:.3}, flags {:?})",
            address,
            record.status.as_str(),
            record.score,
            record.flags
        );

        if let Err(e) = self.store.put(&self.config.network, address, record.clone()) {
            tracing::warn!("Failed to persist verdict for {}: {}", address, e);
        }
        cache.resolve(address, record.clone());

        record
    }

    /// Manual administrative override; not used by evaluation itself
    pub fn mark_manual_block(&self, address: &str) -> Result<VerdictRecord> {
        self.store.mark_manual_block(&self.config.network, address)
    }

    /// Fresh stored verdict, if any. Store failures count as a miss.
    fn cached_verdict(&self, address: &str) -> Option<VerdictRecord> {
        let network = &self.config.network;
        let stale = self
            .store
            .is_stale(network, address, self.config.cache_ttl_secs)
            .unwrap_or_else(|e| {
                tracing::warn!("Verdict store staleness check failed for {}: {}", address, e);
                true
            });
        if stale {
            return None;
        }

        self.store.get(network, address).unwrap_or_else(|e| {
            tracing::warn!("Verdict store read failed for {}: {}", address, e);
            None
        })
    }

    async fn preload(&self, address: &str) -> Result<EvaluationContext> {
        let network = self.config.network.as_str();

        let summary = self
            .with_timeout("account summary fetch", self.gateway.fetch_account_summary(address))
            .await?;
        let transfers = self
            .with_timeout(
                "incoming transfers fetch",
                self.gateway
                    .fetch_incoming_transfers(address, self.config.transfer_fetch_limit),
            )
            .await?;
        let reports = self
            .with_timeout(
                "reputation reports fetch",
                self.gateway.fetch_reputation_reports(address, network),
            )
            .await?;

        tracing::debug!(
            "Preloaded {}: {} transfers, {} reports",
            address,
            transfers.len(),
            reports.len()
        );

        Ok(EvaluationContext::new(network, address, unix_now_ms())
            .with_account_summary(summary)
            .with_transfers(transfers)
            .with_reports(reports))
    }

    async fn with_timeout<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let after_ms = self.config.fetch_timeout_ms;
        match tokio::time::timeout(Duration::from_millis(after_ms), fut).await {
            Ok(result) => result,
            Err(_) => Err(AmlError::Timeout { operation, after_ms }),
        }
    }
}

#[async_trait]
impl SenderResolver for Evaluator {
    async fn resolve_sender(
        &self,
        address: &str,
        cache: &mut SharedEvaluationCache,
        depth: usize,
    ) -> VerdictRecord {
        self.evaluate(address, false, cache, depth).await
    }
}
