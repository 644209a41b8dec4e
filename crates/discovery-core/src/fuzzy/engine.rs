//! SearchIndex - token-based fuzzy user search

use std::collections::HashSet;
use std::time::Instant;

use futures::future::try_join_all;
use serde::Serialize;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::pattern::{score_span, SubQueryPattern};
use crate::error::Result;
use crate::model::{User, UserId};
use crate::store::{SearchCorpus, SearchCorpusProvider, UserStore};

/// A corpus string that matched every sub-query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredMatch {
    pub score: u64,
    pub matched: String,
    pub user_id: UserId,
}

/// Search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Corpus size at which scoring switches to rayon (with `parallel`)
    pub parallel_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 1000,
        }
    }
}

/// Ranks users against a query using the externally owned search corpus.
pub struct SearchIndex<P, U> {
    corpus: P,
    users: U,
    config: SearchConfig,
}

impl<P: SearchCorpusProvider, U: UserStore> SearchIndex<P, U> {
    pub fn new(corpus: P, users: U) -> Self {
        Self::with_config(corpus, users, SearchConfig::default())
    }

    pub fn with_config(corpus: P, users: U, config: SearchConfig) -> Self {
        Self {
            corpus,
            users,
            config,
        }
    }

    pub fn corpus(&self) -> &P {
        &self.corpus
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Users matching every whitespace-separated piece of `query`, best
    /// first, at most `limit` of them, each user at most once.
    ///
    /// Refreshes the corpus first when the provider reports it stale. Any
    /// collaborator failure, including a result id that no longer resolves,
    /// fails the whole call.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<User>> {
        let start = Instant::now();

        let patterns = SubQueryPattern::parse_query(query);
        if patterns.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        if self.corpus.needs_update() {
            debug!("Search corpus stale, invalidating before read");
            self.corpus.invalidate().await?;
        }
        let corpus = self.corpus.search_data().await?;

        let ranked = self.rank(&patterns, &corpus);
        let matched = ranked.len();
        let ids = top_user_ids(ranked, limit);

        let users = try_join_all(ids.iter().map(|id| self.users.user(id))).await?;

        debug!(
            query = query,
            sub_queries = patterns.len(),
            corpus_entries = corpus.len(),
            matched,
            returned = users.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Search complete"
        );

        Ok(users)
    }

    /// Every corpus string matching `query`, ranked, without resolving users.
    pub fn ranked_matches(&self, query: &str, corpus: &SearchCorpus) -> Vec<ScoredMatch> {
        self.rank(&SubQueryPattern::parse_query(query), corpus)
    }

    fn rank(&self, patterns: &[SubQueryPattern], corpus: &SearchCorpus) -> Vec<ScoredMatch> {
        if patterns.is_empty() {
            return Vec::new();
        }

        let mut matches = self.match_corpus(patterns, corpus);

        // Stable: equal scores keep corpus order
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches
    }

    #[cfg(feature = "parallel")]
    fn match_corpus(&self, patterns: &[SubQueryPattern], corpus: &SearchCorpus) -> Vec<ScoredMatch> {
        if corpus.len() >= self.config.parallel_threshold {
            let entries: Vec<(&String, &UserId)> = corpus.iter().collect();
            entries
                .par_iter()
                .filter_map(|(text, id)| score_entry(patterns, text, id))
                .collect()
        } else {
            match_sequential(patterns, corpus)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn match_corpus(&self, patterns: &[SubQueryPattern], corpus: &SearchCorpus) -> Vec<ScoredMatch> {
        match_sequential(patterns, corpus)
    }
}

fn match_sequential(patterns: &[SubQueryPattern], corpus: &SearchCorpus) -> Vec<ScoredMatch> {
    corpus
        .iter()
        .filter_map(|(text, id)| score_entry(patterns, text, id))
        .collect()
}

/// Sum of per-sub-query scores, or `None` if any sub-query misses.
fn score_entry(patterns: &[SubQueryPattern], text: &str, user_id: &str) -> Option<ScoredMatch> {
    let chars: Vec<char> = text.chars().collect();
    let mut total = 0u64;
    for pattern in patterns {
        let span = pattern.find(&chars)?;
        total += score_span(span, &chars);
    }
    Some(ScoredMatch {
        score: total,
        matched: text.to_string(),
        user_id: user_id.to_string(),
    })
}

/// First occurrence of each user in ranked order, truncated to `limit`.
fn top_user_ids(ranked: Vec<ScoredMatch>, limit: usize) -> Vec<UserId> {
    let mut seen = HashSet::new();
    ranked
        .into_iter()
        .filter(|m| seen.insert(m.user_id.clone()))
        .map(|m| m.user_id)
        .take(limit)
        .collect()
}
