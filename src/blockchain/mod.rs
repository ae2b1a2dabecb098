//! External evidence sources

mod json;
pub mod tronscan;
pub mod chainabuse;
pub mod gateway;

pub use tronscan::{TronscanClient, TronscanConfig};
pub use chainabuse::{ChainabuseClient, ChainabuseConfig};
pub use gateway::HttpEvidenceGateway;
