//! Signal normalization, weighted combination and reason selection
//!
//! Everything here is synchronous and deterministic; fetching lives in the
//! engine. Each signal is normalized to [0, 1] across the candidate pool of a
//! single call:
//!
//! - mutual friends: count / max count over every friend-of-friend
//! - popularity: friend count / max friend count among candidates
//! - geo-activity: proximity × recent activity

use serde::{Deserialize, Serialize};

use crate::model::{PublicProfile, RecommendationResult, Signal, User};

/// Weight applied to each normalized signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalWeights {
    pub mutual: f64,
    pub popularity: f64,
    pub geo_activity: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            mutual: 0.5,
            popularity: 0.2,
            geo_activity: 0.3,
        }
    }
}

/// Raw measurements for one candidate
#[derive(Debug, Clone)]
pub struct CandidateSignals {
    pub user: User,
    /// Distinct length-2 paths from the current user
    pub mutual_friends: usize,
    pub friend_count: usize,
    /// Euclidean degree distance between mean post locations
    pub distance: f64,
    pub recent_posts: usize,
}

/// Weighted contribution of each signal to the final score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contributions {
    pub mutual: f64,
    pub popularity: f64,
    pub geo_activity: f64,
}

impl Contributions {
    pub fn total(&self) -> f64 {
        self.mutual + self.popularity + self.geo_activity
    }

    /// Largest contribution; on exact ties mutual beats popularity beats
    /// geo-activity.
    pub fn winner(&self) -> Signal {
        let max = self.mutual.max(self.popularity).max(self.geo_activity);
        if self.mutual == max {
            Signal::MutualFriends
        } else if self.popularity == max {
            Signal::Popularity
        } else {
            Signal::GeoActivity
        }
    }
}

fn ratio(value: usize, max: usize) -> f64 {
    if max == 0 {
        return 0.0;
    }
    value as f64 / max as f64
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Human-readable reason for the winning signal
pub fn reason_text(signal: Signal, candidate: &CandidateSignals) -> String {
    match signal {
        Signal::MutualFriends => format!(
            "shares {} common friend{} with you",
            candidate.mutual_friends,
            plural(candidate.mutual_friends)
        ),
        Signal::Popularity => format!("is popular in {}", candidate.user.country),
        Signal::GeoActivity => format!(
            "recently posted {} time{} near you",
            candidate.recent_posts,
            plural(candidate.recent_posts)
        ),
    }
}

/// Score every candidate, drop those scoring exactly zero, and order the
/// rest best first. Equal scores keep candidate order.
///
/// `max_mutual` is the largest mutual-friend count over every
/// friend-of-friend, candidate or not.
pub fn score_candidates(
    candidates: Vec<CandidateSignals>,
    max_mutual: usize,
    weights: &SignalWeights,
) -> Vec<RecommendationResult> {
    let max_friends = candidates.iter().map(|c| c.friend_count).max().unwrap_or(0);
    let max_recent = candidates.iter().map(|c| c.recent_posts).max().unwrap_or(0);
    let max_distance = candidates
        .iter()
        .map(|c| c.distance)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_distance = candidates
        .iter()
        .map(|c| c.distance)
        .fold(f64::INFINITY, f64::min);

    let mut results: Vec<RecommendationResult> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let proximity = if max_distance == min_distance {
                1.0
            } else {
                (max_distance - candidate.distance) / max_distance
            };
            let activity = ratio(candidate.recent_posts, max_recent);

            let contributions = Contributions {
                mutual: weights.mutual * ratio(candidate.mutual_friends, max_mutual),
                popularity: weights.popularity * ratio(candidate.friend_count, max_friends),
                geo_activity: weights.geo_activity * proximity * activity,
            };

            let score = contributions.total();
            if score == 0.0 {
                return None;
            }

            let signal = contributions.winner();
            Some(RecommendationResult {
                reason: reason_text(signal, &candidate),
                user: PublicProfile::from(&candidate.user),
                signal,
                score,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results
}
