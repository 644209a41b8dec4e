//! Friend Recommendations
//!
//! Ranks "people you may want to follow" for a user from three signals,
//! each normalized to [0, 1] across the call's candidate pool:
//!
//! | Signal | Weight | Measures |
//! |---|---|---|
//! | mutual friends | 0.5 | length-2 paths in the friendship graph |
//! | popularity | 0.2 | the candidate's own friend count |
//! | geo-activity | 0.3 | proximity of mean post location × posts in the last 30 days |
//!
//! The largest weighted contribution picks the displayed reason. Candidates
//! scoring exactly zero are dropped.
//!
//! The candidate pool excludes the user, their friends, and anyone with a
//! pending friend request in either direction.

mod engine;
pub mod signals;

pub use engine::{RecommendConfig, RecommendationEngine, Sources};
pub use signals::{CandidateSignals, Contributions, SignalWeights};
