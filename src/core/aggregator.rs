use crate::config::ScoringPolicy;
use crate::models::{flags, Finding, Status};

/// Result of combining heuristic findings
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub flags: Vec<String>,
    pub score: f64,
    pub status: Status,
}

/// Sums triggered weights, caps at 1.0 and maps the score to a status
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    policy: ScoringPolicy,
}

impl ScoreAggregator {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn aggregate<I>(&self, results: I) -> Aggregate
    where
        I: IntoIterator<Item = Option<Finding>>,
    {
        let mut raised = Vec::new();
        let mut total = 0.0;

        for finding in results.into_iter().flatten() {
            total += finding.weight;
            raised.push(finding.flag);
        }

        let score = round_score(total.min(1.0));
        let status = self.status_for(score, &raised);

        Aggregate {
            flags: raised,
            score,
            status,
        }
    }

    /// Local block-list flag wins; otherwise inclusive thresholds on the score
    pub fn status_for(&self, score: f64, raised: &[String]) -> Status {
        if raised.iter().any(|f| f == flags::BLOCKED_LOCALLY) {
            Status::Blocked
        } else if score >= self.policy.blocked_threshold {
            Status::Blocked
        } else if score >= self.policy.warning_threshold {
            Status::Warning
        } else {
            Status::Safe
        }
    }
}

/// Three decimal places
fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
