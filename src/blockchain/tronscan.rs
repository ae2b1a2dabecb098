use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::json::{field_f64, field_i64, field_str, field_u128, field_u64};
use crate::models::{AccountSummary, TransferRecord};
use crate::utils::{AmlError, Result};

pub const TRONSCAN_API: &str = "https://apilist.tronscanapi.com/api";
const USER_AGENT: &str = "aml-checker";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TronscanConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TronscanConfig {
    fn default() -> Self {
        Self {
            base_url: TRONSCAN_API.to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// Tronscan REST client for account data and incoming TRC-20 transfers
pub struct TronscanClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TronscanClient {
    pub fn new(config: TronscanConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.filter(|k| !k.is_empty()),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header(header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("TRON-PRO-API-KEY", key);
        }

        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn account_summary(&self, address: &str) -> Result<AccountSummary> {
        tracing::debug!("Fetching Tronscan account for {}", address);
        let body = self
            .get_json("account", &[("address", address.to_string())])
            .await?;
        parse_account_summary(&body)
    }

    pub async fn incoming_transfers(&self, address: &str, limit: usize) -> Result<Vec<TransferRecord>> {
        tracing::debug!("Fetching up to {} incoming transfers for {}", limit, address);
        let body = self
            .get_json(
                "token_trc20/transfers",
                &[
                    ("toAddress", address.to_string()),
                    ("limit", limit.to_string()),
                    ("sort", "-timestamp".to_string()),
                ],
            )
            .await?;
        let mut transfers = parse_transfers(&body)?;
        transfers.truncate(limit);
        Ok(transfers)
    }
}

/// `totalTransactionCount`, `balance` (SUN) and `createTime` (ms)
pub fn parse_account_summary(body: &Value) -> Result<AccountSummary> {
    if !body.is_object() {
        return Err(AmlError::MalformedResponse("account response is not an object".into()));
    }

    Ok(AccountSummary {
        total_transaction_count: field_u64(body, "totalTransactionCount")?.unwrap_or(0),
        balance: field_f64(body, "balance")?.unwrap_or(0.0),
        create_time_ms: match field_i64(body, "createTime")? {
            Some(ts) => Some(ts),
            None => field_i64(body, "date_created")?,
        },
    })
}

/// `token_transfers[*]` with `from_address`, `amount` (or `quant`) and `block_ts`
pub fn parse_transfers(body: &Value) -> Result<Vec<TransferRecord>> {
    let Some(items) = body.get("token_transfers") else {
        return Ok(Vec::new());
    };
    let items = items
        .as_array()
        .ok_or_else(|| AmlError::MalformedResponse("token_transfers is not a list".into()))?;

    items
        .iter()
        .map(|item| {
            let amount = match field_u128(item, "amount")? {
                Some(amount) => amount,
                None => field_u128(item, "quant")?.unwrap_or(0),
            };
            Ok(TransferRecord {
                from_address: field_str(item, "from_address").map(str::to_string),
                amount,
                timestamp_ms: field_i64(item, "block_ts")?,
            })
        })
        .collect()
}
