//! Third-party abuse reports

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use std::collections::HashSet;

use crate::config::ReputationConfig;
use crate::core::Heuristic;
use crate::models::{flags, EvaluationContext, ReputationReport};

/// Fires on any recent report in one of the configured categories
pub struct ReputationReported {
    config: ReputationConfig,
    categories: HashSet<String>,
}

impl ReputationReported {
    pub fn new(config: ReputationConfig) -> Self {
        let categories = config.categories.iter().cloned().collect();
        Self { config, categories }
    }

    fn is_recent(&self, report: &ReputationReport, cutoff: DateTime<Utc>) -> bool {
        if report.category.is_empty() || !self.categories.contains(&report.category) {
            return false;
        }
        match report.created_at.as_deref().and_then(parse_report_time) {
            Some(created) => created >= cutoff,
            None => {
                tracing::debug!("Skipping report with unreadable timestamp: {:?}", report.created_at);
                false
            }
        }
    }
}

/// RFC 3339 first, then a naive ISO-8601 timestamp taken as UTC
fn parse_report_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl Heuristic for ReputationReported {
    fn name(&self) -> &'static str {
        flags::REPUTATION_REPORTED
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    fn enabled(&self) -> bool {
        self.config.enabled
    }

    fn triggered(&self, ctx: &EvaluationContext) -> bool {
        let Some(now) = Utc.timestamp_millis_opt(ctx.now_ms).single() else {
            return false;
        };
        // A window reaching past the representable range covers every report
        let cutoff = Duration::try_days(self.config.max_age_days)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        ctx.reputation_reports
            .iter()
            .any(|report| self.is_recent(report, cutoff))
    }
}
