pub mod traits;
pub mod shared_cache;
pub mod aggregator;
pub mod evaluator;

pub use traits::{EvidenceGateway, Heuristic, SenderResolver};
pub use shared_cache::{CacheSlot, SharedEvaluationCache};
pub use aggregator::{Aggregate, ScoreAggregator};
pub use evaluator::Evaluator;
