pub mod finding;
pub mod verdict;
pub mod evidence;

pub use finding::{flags, Finding};
pub use verdict::{Source, Status, VerdictRecord};
pub use evidence::{AccountSummary, EvaluationContext, ReputationReport, TransferRecord};
