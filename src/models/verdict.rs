use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::finding::flags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Safe,
    Warning,
    Blocked,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Safe => "safe",
            Status::Warning => "warning",
            Status::Blocked => "blocked",
            Status::Error => "error",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Status::Safe => "🟢",
            Status::Warning => "🟡",
            Status::Blocked => "🔴",
            Status::Error => "⚪",
        }
    }
}

/// Provenance of a stored verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Auto,
    Manual,
    Error,
}

/// The persisted outcome of evaluating one (network, address) pair.
///
/// Unknown fields found in a stored record are kept in `extra` and written
/// back untouched, so other tools can annotate records without losing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub status: Status,
    pub score: f64,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerdictRecord {
    /// Record produced by a completed automatic evaluation
    pub fn auto(status: Status, score: f64, flags: Vec<String>, checked_at: i64) -> Self {
        Self {
            status,
            score,
            flags,
            source: Source::Auto,
            checked_at: Some(checked_at),
            extra: Map::new(),
        }
    }

    /// Synthetic verdict for an address on the local block list
    pub fn blocked_locally(checked_at: i64) -> Self {
        Self::auto(
            Status::Blocked,
            1.0,
            vec![flags::BLOCKED_LOCALLY.to_string()],
            checked_at,
        )
    }

    /// Fail-closed verdict for an address whose evidence could not be gathered
    pub fn evidence_error(detail: impl Into<String>, checked_at: i64) -> Self {
        Self {
            status: Status::Error,
            score: 1.0,
            flags: vec![flags::CHECK_ERROR.to_string(), detail.into()],
            source: Source::Error,
            checked_at: Some(checked_at),
            extra: Map::new(),
        }
    }

    /// Apply a manual block on top of whatever was stored before.
    /// Existing flags are kept (deduplicated, sorted) and `manual_block` is added.
    pub fn manual_block(previous: Option<VerdictRecord>, checked_at: i64) -> Self {
        let (previous_flags, extra) = match previous {
            Some(record) => (record.flags, record.extra),
            None => (Vec::new(), Map::new()),
        };

        let mut merged: BTreeSet<String> = previous_flags.into_iter().collect();
        merged.insert(flags::MANUAL_BLOCK.to_string());

        Self {
            status: Status::Blocked,
            score: 1.0,
            flags: merged.into_iter().collect(),
            source: Source::Manual,
            checked_at: Some(checked_at),
            extra,
        }
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Counts toward `senders_with_risk`
    pub fn is_risky(&self) -> bool {
        matches!(self.status, Status::Blocked | Status::Warning)
    }

    /// Same assessment, ignoring when it was produced
    pub fn same_assessment(&self, other: &VerdictRecord) -> bool {
        self.status == other.status
            && self.score == other.score
            && self.flags == other.flags
            && self.source == other.source
    }
}

impl std::fmt::Display for VerdictRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "═══════════════════════════════════════════════════════════")?;
        writeln!(f, "                 ADDRESS RISK REPORT")?;
        writeln!(f, "═══════════════════════════════════════════════════════════")?;
        writeln!(f)?;
        writeln!(f, "═══ VERDICT ═══")?;
        writeln!(f, "{} {}", self.status.emoji(), self.status.as_str().to_uppercase())?;
        writeln!(f, "Risk Score: {:.3}", self.score)?;
        writeln!(f, "Source: {:?}", self.source)?;
        if let Some(checked_at) = self.checked_at {
            writeln!(f, "Checked at: {}", checked_at)?;
        }

        if !self.flags.is_empty() {
            writeln!(f)?;
            writeln!(f, "═══ FLAGS ═══")?;
            for flag in &self.flags {
                writeln!(f, "• {}", flag)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "═══════════════════════════════════════════════════════════")?;

        Ok(())
    }
}
