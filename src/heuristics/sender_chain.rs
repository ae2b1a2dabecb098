//! Sender-chain analysis
//!
//! Flags an address that receives funds from several addresses which are
//! themselves risky. Each sender is evaluated through the full pipeline one
//! level deeper, sharing the call tree's evaluation cache. The depth bound
//! guarantees termination; the cache guarantees each address is evaluated at
//! most once per call tree, and an ancestor that is still being evaluated is
//! never re-entered.

use crate::config::SenderChainConfig;
use crate::core::{CacheSlot, SenderResolver, SharedEvaluationCache};
use crate::models::{flags, EvaluationContext, Finding};

pub struct SenderChainAnalyzer {
    config: SenderChainConfig,
}

/// Tally of one sender-chain pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenderTally {
    pub inspected: usize,
    pub suspicious: usize,
}

impl SenderChainAnalyzer {
    pub fn new(config: SenderChainConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &'static str {
        flags::SENDERS_WITH_RISK
    }

    pub fn weight(&self) -> f64 {
        self.config.weight
    }

    pub async fn evaluate(
        &self,
        resolver: &dyn SenderResolver,
        ctx: &EvaluationContext,
        cache: &mut SharedEvaluationCache,
        depth: usize,
    ) -> Option<Finding> {
        if !self.config.enabled || depth >= self.config.max_depth {
            return None;
        }

        let tally = self.inspect_senders(resolver, ctx, cache, depth).await;

        tracing::debug!(
            "Sender chain for {} at depth {}: {}/{} risky senders",
            ctx.address,
            depth,
            tally.suspicious,
            tally.inspected
        );

        if tally.suspicious >= self.config.min_suspicious_senders {
            Some(Finding::new(self.name(), self.config.weight))
        } else {
            None
        }
    }

    async fn inspect_senders(
        &self,
        resolver: &dyn SenderResolver,
        ctx: &EvaluationContext,
        cache: &mut SharedEvaluationCache,
        depth: usize,
    ) -> SenderTally {
        let mut tally = SenderTally::default();

        for sender in ctx.distinct_senders(self.config.max_incoming) {
            if tally.inspected >= self.config.max_senders_checked {
                break;
            }

            let risky = match cache.slot(sender) {
                Some(CacheSlot::Resolved(record)) => record.is_risky(),
                // Ancestor still being evaluated in this tree
                Some(CacheSlot::InFlight) => false,
                None => {
                    let record = resolver.resolve_sender(sender, cache, depth + 1).await;
                    let risky = record.is_risky();
                    cache.resolve(sender, record);
                    risky
                }
            };

            tally.inspected += 1;
            if risky {
                tally.suspicious += 1;
            }
        }

        tally
    }
}
