use serde::{Deserialize, Serialize};

/// Flag identifiers recorded on verdicts
pub mod flags {
    pub const HIGH_TX_VOLUME: &str = "high_tx_volume";
    pub const LARGE_BALANCE: &str = "large_balance";
    pub const NEWLY_CREATED: &str = "newly_created";
    pub const DUST_ACTIVITY: &str = "dust_activity";
    pub const MANY_UNIQUE_SENDERS: &str = "many_unique_senders";
    pub const TX_BURST_ACTIVITY: &str = "tx_burst_activity";
    pub const REPUTATION_REPORTED: &str = "reputation_reported";
    pub const SENDERS_WITH_RISK: &str = "senders_with_risk";

    pub const BLOCKED_LOCALLY: &str = "blocked_locally";
    pub const MANUAL_BLOCK: &str = "manual_block";
    pub const CHECK_ERROR: &str = "check_error";
}

/// A triggered heuristic: the flag it raises and the weight it adds to the score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub flag: String,
    pub weight: f64,
}

impl Finding {
    pub fn new(flag: impl Into<String>, weight: f64) -> Self {
        Self {
            flag: flag.into(),
            weight,
        }
    }
}
