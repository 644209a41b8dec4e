//! RecommendationEngine - candidate pool construction and signal fetching

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use super::signals::{score_candidates, CandidateSignals, SignalWeights};
use crate::error::{DiscoveryError, Result};
use crate::model::{GeoPoint, Post, RecommendationResult, User, UserId};
use crate::store::{FriendGraph, PostStore, RelationshipStore, UserStore};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Recommendation configuration
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    pub weights: SignalWeights,
    /// Posts newer than this count as recent (default: 30 days)
    pub recent_window_ms: i64,
    /// Upper bound on concurrent collaborator fetches per call
    pub fetch_concurrency: usize,
    /// Limit used when the caller does not supply one
    pub default_limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            recent_window_ms: 30 * DAY_MS,
            fetch_concurrency: 8,
            default_limit: 10,
        }
    }
}

/// The collaborators a recommendation reads from.
#[derive(Clone)]
pub struct Sources {
    pub users: Arc<dyn UserStore>,
    pub friends: Arc<dyn FriendGraph>,
    pub posts: Arc<dyn PostStore>,
    pub relationships: Arc<dyn RelationshipStore>,
}

impl Sources {
    /// Use one backend for every collaborator.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserStore + FriendGraph + PostStore + RelationshipStore + 'static,
    {
        Self {
            users: store.clone(),
            friends: store.clone(),
            posts: store.clone(),
            relationships: store,
        }
    }
}

/// Computes "people you may want to follow" for a user.
///
/// Stateless between calls: every call refetches and rescores from scratch.
pub struct RecommendationEngine {
    sources: Sources,
    config: RecommendConfig,
}

impl RecommendationEngine {
    pub fn new(sources: Sources) -> Self {
        Self::with_config(sources, RecommendConfig::default())
    }

    pub fn with_config(sources: Sources, config: RecommendConfig) -> Self {
        Self { sources, config }
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Recommendations for `current_id` as of now.
    pub async fn recommended_users(
        &self,
        current_id: &str,
        limit: usize,
    ) -> Result<Vec<RecommendationResult>> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.recommended_users_at(current_id, limit, now_ms).await
    }

    /// Recommendations for `current_id`, treating `now_ms` as the current time.
    ///
    /// Never returns the current user, an existing friend, or anyone with a
    /// pending request in either direction. Any collaborator failure aborts
    /// the call and drops outstanding fetches.
    pub async fn recommended_users_at(
        &self,
        current_id: &str,
        limit: usize,
        now_ms: i64,
    ) -> Result<Vec<RecommendationResult>> {
        let start = Instant::now();

        let (all_users, friends, sent, received) = futures::try_join!(
            self.sources.users.all_users(),
            self.sources.friends.friends_of(current_id),
            self.sources.relationships.pending_sent_by(current_id),
            self.sources.relationships.pending_received_by(current_id)
        )?;

        if !all_users.iter().any(|u| u.id == current_id) {
            return Err(DiscoveryError::NotFound(current_id.to_string()));
        }

        let mut excluded: HashSet<&str> = HashSet::new();
        excluded.insert(current_id);
        excluded.extend(friends.iter().map(String::as_str));
        excluded.extend(sent.iter().map(|r| r.receiver_id.as_str()));
        excluded.extend(received.iter().map(|r| r.sender_id.as_str()));

        let candidates: Vec<User> = all_users
            .iter()
            .filter(|u| !excluded.contains(u.id.as_str()))
            .cloned()
            .collect();

        if candidates.is_empty() || limit == 0 {
            debug!(user = current_id, "No recommendation candidates");
            return Ok(Vec::new());
        }

        let mutual = self.mutual_friend_counts(current_id, &friends).await?;
        let max_mutual = mutual.values().copied().max().unwrap_or(0);

        let own_posts = self.sources.posts.posts_by_author(current_id).await?;
        let home = mean_location(&own_posts);

        let pool_size = candidates.len();
        let fetched = self.fetch_candidate_activity(candidates).await?;

        let cutoff_ms = now_ms - self.config.recent_window_ms;
        let signals: Vec<CandidateSignals> = fetched
            .into_iter()
            .map(|(user, friend_count, posts)| CandidateSignals {
                mutual_friends: mutual.get(&user.id).copied().unwrap_or(0),
                friend_count,
                distance: home.distance_to(&mean_location(&posts)),
                recent_posts: posts.iter().filter(|p| p.created_at_ms > cutoff_ms).count(),
                user,
            })
            .collect();

        let mut results = score_candidates(signals, max_mutual, &self.config.weights);
        let scored = results.len();
        results.truncate(limit);

        debug!(
            user = current_id,
            friends = friends.len(),
            pending = sent.len() + received.len(),
            candidates = pool_size,
            friends_of_friends = mutual.len(),
            scored,
            returned = results.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations computed"
        );

        Ok(results)
    }

    /// Number of distinct length-2 paths to every user at graph distance 2.
    async fn mutual_friend_counts(
        &self,
        current_id: &str,
        friends: &HashSet<UserId>,
    ) -> Result<HashMap<UserId, usize>> {
        let graph = Arc::clone(&self.sources.friends);
        let friend_lists: Vec<HashSet<UserId>> = stream::iter(friends.iter().cloned())
            .map(move |friend| {
                let graph = Arc::clone(&graph);
                async move { graph.friends_of(&friend).await }
            })
            .buffer_unordered(self.fetch_concurrency())
            .try_collect()
            .await?;

        let mut counts: HashMap<UserId, usize> = HashMap::new();
        for list in friend_lists {
            for fof in list {
                if fof != current_id && !friends.contains(&fof) {
                    *counts.entry(fof).or_default() += 1;
                }
            }
        }
        Ok(counts)
    }

    /// Friend count and posts of every candidate, in candidate order.
    async fn fetch_candidate_activity(
        &self,
        candidates: Vec<User>,
    ) -> Result<Vec<(User, usize, Vec<Post>)>> {
        let graph = Arc::clone(&self.sources.friends);
        let posts = Arc::clone(&self.sources.posts);

        stream::iter(candidates)
            .map(move |user| {
                let graph = Arc::clone(&graph);
                let posts = Arc::clone(&posts);
                async move {
                    let (friend_count, authored) = futures::try_join!(
                        graph.friends_count(&user.id),
                        posts.posts_by_author(&user.id)
                    )?;
                    Ok::<_, DiscoveryError>((user, friend_count, authored))
                }
            })
            .buffered(self.fetch_concurrency())
            .try_collect()
            .await
    }

    fn fetch_concurrency(&self) -> usize {
        self.config.fetch_concurrency.max(1)
    }
}

/// Mean location of geotagged posts, or the origin when there are none.
fn mean_location(posts: &[Post]) -> GeoPoint {
    GeoPoint::mean_of(posts.iter().filter_map(|p| p.location.as_ref())).unwrap_or(GeoPoint::ORIGIN)
}
