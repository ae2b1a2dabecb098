use serde::{Deserialize, Serialize};

/// Account-level evidence: activity counters, balance and creation time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub total_transaction_count: u64,
    /// Balance in native minimal units (SUN on TRON)
    pub balance: f64,
    /// Account creation time in milliseconds since the epoch, when known
    pub create_time_ms: Option<i64>,
}

impl AccountSummary {
    /// Account age in milliseconds relative to `now_ms`.
    /// `None` when the creation time is unknown.
    pub fn age_ms(&self, now_ms: i64) -> Option<i64> {
        self.create_time_ms
            .filter(|created| *created > 0)
            .map(|created| now_ms - created)
    }
}

/// One incoming transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from_address: Option<String>,
    /// Amount in the token's minimal units
    pub amount: u128,
    pub timestamp_ms: Option<i64>,
}

impl TransferRecord {
    pub fn new(from_address: impl Into<String>, amount: u128) -> Self {
        Self {
            from_address: Some(from_address.into()),
            amount,
            timestamp_ms: None,
        }
    }
}

/// Third-party abuse report for an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationReport {
    pub category: String,
    /// Raw ISO-8601 creation timestamp as returned by the provider
    pub created_at: Option<String>,
}

impl ReputationReport {
    pub fn new(category: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            created_at: Some(created_at.into()),
        }
    }
}

/// Evidence snapshot for one address, built once per evaluation
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    pub network: String,
    pub address: String,
    /// Reference time for every age computation in this evaluation
    pub now_ms: i64,
    pub account_summary: AccountSummary,
    /// Most recent first
    pub incoming_transfers: Vec<TransferRecord>,
    pub reputation_reports: Vec<ReputationReport>,
}

impl EvaluationContext {
    pub fn new(network: impl Into<String>, address: impl Into<String>, now_ms: i64) -> Self {
        Self {
            network: network.into(),
            address: address.into(),
            now_ms,
            account_summary: AccountSummary::default(),
            incoming_transfers: Vec::new(),
            reputation_reports: Vec::new(),
        }
    }

    pub fn with_account_summary(mut self, summary: AccountSummary) -> Self {
        self.account_summary = summary;
        self
    }

    pub fn with_transfers(mut self, transfers: Vec<TransferRecord>) -> Self {
        self.incoming_transfers = transfers;
        self
    }

    pub fn with_reports(mut self, reports: Vec<ReputationReport>) -> Self {
        self.reputation_reports = reports;
        self
    }

    /// Distinct senders among the first `limit` transfers, in order of first appearance
    pub fn distinct_senders(&self, limit: usize) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.incoming_transfers
            .iter()
            .take(limit)
            .filter_map(|t| t.from_address.as_deref())
            .filter(|addr| seen.insert(*addr))
            .collect()
    }
}
