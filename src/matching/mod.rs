pub mod provider;
pub mod service;

pub use provider::{MatchCandidate, MatchProvider};
pub use service::run_matching_analysis;
