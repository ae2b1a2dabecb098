use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use super::json::field_str;
use crate::models::ReputationReport;
use crate::utils::{AmlError, Result};

pub const CHAINABUSE_API: &str = "https://api.chainabuse.com/api/v1";
const USER_AGENT: &str = "aml-checker";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainabuseConfig {
    pub base_url: String,
    /// Lookups are skipped entirely without a key
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ChainabuseConfig {
    fn default() -> Self {
        Self {
            base_url: CHAINABUSE_API.to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

/// Chainabuse abuse-report lookups
pub struct ChainabuseClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ChainabuseClient {
    pub fn new(config: ChainabuseConfig) -> Result<Self> {
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

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn reports(&self, address: &str, network: &str) -> Result<Vec<ReputationReport>> {
        let Some(api_key) = &self.api_key else {
            return Ok(Vec::new());
        };

        let url = format!("{}/reports/address/{}/{}", self.base_url, network, address);
        tracing::debug!("Fetching Chainabuse reports for {} on {}", address, network);

        let body: Value = self
            .client
            .get(&url)
            .header("X-API-Key", api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        parse_reports(&body)
    }
}

/// `reports[*]` with `category` and `created_at` (or `createdAt`)
pub fn parse_reports(body: &Value) -> Result<Vec<ReputationReport>> {
    let Some(items) = body.get("reports") else {
        return Ok(Vec::new());
    };
    let items = items
        .as_array()
        .ok_or_else(|| AmlError::MalformedResponse("reports is not a list".into()))?;

    Ok(items
        .iter()
        .map(|item| ReputationReport {
            category: field_str(item, "category").unwrap_or_default().to_string(),
            created_at: field_str(item, "created_at")
                .or_else(|| field_str(item, "createdAt"))
                .map(str::to_string),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reports() {
        let body = json!({
            "reports": [
                { "category": "Scam", "created_at": "2024-06-01T00:00:00Z" },
                { "category": "Phishing", "createdAt": "2024-06-02T00:00:00Z" },
                { "description": "no category" }
            ]
        });

        let reports = parse_reports(&body).unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0], ReputationReport::new("Scam", "2024-06-01T00:00:00Z"));
        assert_eq!(reports[1].created_at.as_deref(), Some("2024-06-02T00:00:00Z"));
        assert_eq!(reports[2].category, "");
        assert_eq!(reports[2].created_at, None);
    }

    #[tokio::test]
    async fn test_disabled_without_key() {
        let client = ChainabuseClient::new(ChainabuseConfig::default()).unwrap();
        assert!(!client.is_enabled());
        assert!(client.reports("TXYZ", "tron").await.unwrap().is_empty());
    }
}
