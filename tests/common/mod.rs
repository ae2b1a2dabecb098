use aml_checker::models::{AccountSummary, ReputationReport, TransferRecord};
use aml_checker::{AmlError, EngineConfig, Evaluator, EvidenceGateway, Result, SqliteVerdictStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned evidence for one address
#[derive(Debug, Clone, Default)]
pub struct Evidence {
    pub summary: AccountSummary,
    pub transfers: Vec<TransferRecord>,
    pub reports: Vec<ReputationReport>,
    pub fail: bool,
    pub delay: Option<Duration>,
}

impl Evidence {
    pub fn with_tx_count(count: u64) -> Self {
        Self {
            summary: AccountSummary {
                total_transaction_count: count,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn funded_by(senders: &[&str]) -> Self {
        Self {
            transfers: senders
                .iter()
                .map(|s| TransferRecord::new(*s, 5_000_000))
                .collect(),
            ..Default::default()
        }
    }
}

/// In-memory gateway that counts every call per address
#[derive(Default)]
pub struct FakeGateway {
    evidence: Mutex<HashMap<String, Evidence>>,
    account_calls: AtomicUsize,
    transfer_calls: AtomicUsize,
    report_calls: AtomicUsize,
    per_address: Mutex<HashMap<String, usize>>,
    report_networks: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, address: &str, evidence: Evidence) {
        self.evidence.lock().unwrap().insert(address.to_string(), evidence);
    }

    pub fn total_calls(&self) -> usize {
        self.account_calls.load(Ordering::SeqCst)
            + self.transfer_calls.load(Ordering::SeqCst)
            + self.report_calls.load(Ordering::SeqCst)
    }

    /// Account-summary fetches for one address
    pub fn fetches_for(&self, address: &str) -> usize {
        self.per_address.lock().unwrap().get(address).copied().unwrap_or(0)
    }

    /// Networks passed to reputation lookups, in call order
    pub fn report_networks(&self) -> Vec<String> {
        self.report_networks.lock().unwrap().clone()
    }

    fn lookup(&self, address: &str) -> Evidence {
        self.evidence.lock().unwrap().get(address).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl EvidenceGateway for FakeGateway {
    async fn fetch_account_summary(&self, address: &str) -> Result<AccountSummary> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        *self.per_address.lock().unwrap().entry(address.to_string()).or_default() += 1;

        let evidence = self.lookup(address);
        if let Some(delay) = evidence.delay {
            tokio::time::sleep(delay).await;
        }
        if evidence.fail {
            return Err(AmlError::EvidenceFetch(format!("upstream refused {}", address)));
        }
        Ok(evidence.summary)
    }

    async fn fetch_incoming_transfers(&self, address: &str, limit: usize) -> Result<Vec<TransferRecord>> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        let mut transfers = self.lookup(address).transfers;
        transfers.truncate(limit);
        Ok(transfers)
    }

    async fn fetch_reputation_reports(&self, address: &str, network: &str) -> Result<Vec<ReputationReport>> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        self.report_networks.lock().unwrap().push(network.to_string());
        Ok(self.lookup(address).reports)
    }
}

pub struct Harness {
    pub evaluator: Evaluator,
    pub gateway: Arc<FakeGateway>,
    pub store: Arc<SqliteVerdictStore>,
}

pub fn harness() -> Harness {
    harness_with(EngineConfig::default())
}

pub fn harness_with(config: EngineConfig) -> Harness {
    let gateway = Arc::new(FakeGateway::new());
    let store = Arc::new(SqliteVerdictStore::open_in_memory().unwrap());
    let evaluator = Evaluator::new(config, store.clone(), gateway.clone()).unwrap();

    Harness {
        evaluator,
        gateway,
        store,
    }
}
