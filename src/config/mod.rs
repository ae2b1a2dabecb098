//! Risk policy configuration
//!
//! Every heuristic gets its own section with an `enabled` switch, its
//! thresholds and a weight. Weights may sum past 1.0; the aggregator caps
//! the total. Defaults reproduce the TRON policy.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::{AmlError, Result};

/// Upper bound on the reputation report window (one hundred years)
pub const MAX_REPORT_AGE_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighTxVolumeConfig {
    pub enabled: bool,
    pub threshold: u64,
    pub weight: f64,
}

impl Default for HighTxVolumeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 5000,
            weight: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LargeBalanceConfig {
    pub enabled: bool,
    /// Native minimal units (SUN)
    pub threshold: f64,
    pub weight: f64,
}

impl Default for LargeBalanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 1_000_000_000.0,
            weight: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewlyCreatedConfig {
    pub enabled: bool,
    pub max_age_ms: i64,
    pub weight: f64,
}

impl Default for NewlyCreatedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_ms: 86_400_000,
            weight: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DustActivityConfig {
    pub enabled: bool,
    /// Transfers strictly below this amount count as dust (0.1 USDT)
    pub dust_limit: u128,
    pub min_count: usize,
    pub weight: f64,
}

impl Default for DustActivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dust_limit: 100_000,
            min_count: 10,
            weight: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManyUniqueSendersConfig {
    pub enabled: bool,
    pub min_count: usize,
    pub weight: f64,
}

impl Default for ManyUniqueSendersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_count: 20,
            weight: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxBurstConfig {
    pub enabled: bool,
    pub min_tx: u64,
    pub max_age_days: f64,
    pub weight: f64,
}

impl Default for TxBurstConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_tx: 100,
            max_age_days: 3.0,
            weight: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    pub enabled: bool,
    /// Report categories that count; anything else is ignored
    pub categories: Vec<String>,
    pub max_age_days: i64,
    pub weight: f64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            categories: vec!["Scam".into(), "Rug Pull".into(), "Phishing".into()],
            max_age_days: 30,
            weight: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderChainConfig {
    pub enabled: bool,
    pub max_incoming: usize,
    pub max_senders_checked: usize,
    pub min_suspicious_senders: usize,
    pub max_depth: usize,
    pub weight: f64,
}

impl Default for SenderChainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_incoming: 50,
            max_senders_checked: 10,
            min_suspicious_senders: 2,
            max_depth: 2,
            weight: 0.25,
        }
    }
}

/// Thresholds and weights for the full heuristic set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub high_tx_volume: HighTxVolumeConfig,
    pub large_balance: LargeBalanceConfig,
    pub newly_created: NewlyCreatedConfig,
    pub dust_activity: DustActivityConfig,
    pub many_unique_senders: ManyUniqueSendersConfig,
    pub tx_burst_activity: TxBurstConfig,
    pub reputation_reported: ReputationConfig,
    pub sender_chain_risk: SenderChainConfig,
}

impl HeuristicConfig {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("high_tx_volume", self.high_tx_volume.weight),
            ("large_balance", self.large_balance.weight),
            ("newly_created", self.newly_created.weight),
            ("dust_activity", self.dust_activity.weight),
            ("many_unique_senders", self.many_unique_senders.weight),
            ("tx_burst_activity", self.tx_burst_activity.weight),
            ("reputation_reported", self.reputation_reported.weight),
            ("sender_chain_risk", self.sender_chain_risk.weight),
        ];

        for (name, weight) in weights {
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(AmlError::Config(format!(
                    "{}: weight must be in (0, 1], got {}",
                    name, weight
                )));
            }
        }

        if self.newly_created.max_age_ms < 0 {
            return Err(AmlError::Config("newly_created: max_age_ms must not be negative".into()));
        }
        if self.tx_burst_activity.max_age_days < 0.0 {
            return Err(AmlError::Config("tx_burst_activity: max_age_days must not be negative".into()));
        }
        if self.reputation_reported.max_age_days < 0 {
            return Err(AmlError::Config("reputation_reported: max_age_days must not be negative".into()));
        }
        if self.reputation_reported.max_age_days > MAX_REPORT_AGE_DAYS {
            return Err(AmlError::Config(format!(
                "reputation_reported: max_age_days must be at most {}, got {}",
                MAX_REPORT_AGE_DAYS, self.reputation_reported.max_age_days
            )));
        }

        let chain = &self.sender_chain_risk;
        if chain.max_incoming == 0 || chain.max_senders_checked == 0 {
            return Err(AmlError::Config(
                "sender_chain_risk: max_incoming and max_senders_checked must be positive".into(),
            ));
        }
        if chain.min_suspicious_senders == 0 {
            return Err(AmlError::Config(
                "sender_chain_risk: min_suspicious_senders must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Score-to-status thresholds, both inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub blocked_threshold: f64,
    pub warning_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            blocked_threshold: 0.7,
            warning_threshold: 0.3,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<()> {
        let in_range = |t: f64| (0.0..=1.0).contains(&t);
        if !in_range(self.blocked_threshold) || !in_range(self.warning_threshold) {
            return Err(AmlError::Config("status thresholds must lie in [0, 1]".into()));
        }
        if self.warning_threshold > self.blocked_threshold {
            return Err(AmlError::Config(format!(
                "warning threshold {} exceeds blocked threshold {}",
                self.warning_threshold, self.blocked_threshold
            )));
        }
        Ok(())
    }
}

/// Everything one evaluator needs besides its collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub network: String,
    pub heuristics: HeuristicConfig,
    pub scoring: ScoringPolicy,
    /// Stored verdicts older than this are re-evaluated
    pub cache_ttl_secs: u64,
    /// How many incoming transfers to fetch per address
    pub transfer_fetch_limit: usize,
    /// Upper bound for each individual evidence fetch
    pub fetch_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network: "tron".to_string(),
            heuristics: HeuristicConfig::default(),
            scoring: ScoringPolicy::default(),
            cache_ttl_secs: 86_400,
            transfer_fetch_limit: 100,
            fetch_timeout_ms: 10_000,
        }
    }
}

impl EngineConfig {
    pub fn for_network(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON file; omitted fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.network.trim().is_empty() {
            return Err(AmlError::Config("network must not be empty".into()));
        }
        if self.transfer_fetch_limit == 0 {
            return Err(AmlError::Config("transfer_fetch_limit must be positive".into()));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(AmlError::Config("fetch_timeout_ms must be positive".into()));
        }
        self.heuristics.validate()?;
        self.scoring.validate()
    }
}
