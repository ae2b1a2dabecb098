pub mod blocklist;      // Local administrative block lists
pub mod config;         // Heuristic weights, thresholds and engine settings

pub mod core;
pub mod models;
pub mod heuristics;
pub mod storage;
pub mod blockchain;
pub mod utils;

pub use blocklist::Blocklist;
pub use config::{EngineConfig, HeuristicConfig, ScoringPolicy};
pub use core::{Evaluator, EvidenceGateway, Heuristic, ScoreAggregator, SharedEvaluationCache};
pub use models::{EvaluationContext, Finding, Source, Status, VerdictRecord};
pub use storage::{SqliteVerdictStore, VerdictStore};
pub use utils::{AmlError, Result};
