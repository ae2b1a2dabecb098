use async_trait::async_trait;

use super::{ChainabuseClient, ChainabuseConfig, TronscanClient, TronscanConfig};
use crate::core::EvidenceGateway;
use crate::models::{AccountSummary, ReputationReport, TransferRecord};
use crate::utils::Result;

/// Evidence over HTTP: Tronscan for on-chain data, Chainabuse for reports.
/// Errors are returned as-is; the evaluator owns the failure policy.
pub struct HttpEvidenceGateway {
    tronscan: TronscanClient,
    chainabuse: ChainabuseClient,
}

impl HttpEvidenceGateway {
    pub fn new(tronscan: TronscanConfig, chainabuse: ChainabuseConfig) -> Result<Self> {
        let gateway = Self {
            tronscan: TronscanClient::new(tronscan)?,
            chainabuse: ChainabuseClient::new(chainabuse)?,
        };

        if !gateway.chainabuse.is_enabled() {
            tracing::info!("No Chainabuse API key configured, reputation lookups disabled");
        }

        Ok(gateway)
    }
}

#[async_trait]
impl EvidenceGateway for HttpEvidenceGateway {
    async fn fetch_account_summary(&self, address: &str) -> Result<AccountSummary> {
        self.tronscan.account_summary(address).await
    }

    async fn fetch_incoming_transfers(&self, address: &str, limit: usize) -> Result<Vec<TransferRecord>> {
        self.tronscan.incoming_transfers(address, limit).await
    }

    async fn fetch_reputation_reports(&self, address: &str, network: &str) -> Result<Vec<ReputationReport>> {
        self.chainabuse.reports(address, network).await
    }
}
