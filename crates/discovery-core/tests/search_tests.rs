//! Search index tests against in-memory and scripted corpus providers

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use discovery_core::{
    DiscoveryError, MemoryCorpus, MemoryStore, Result, SearchCorpus, SearchCorpusProvider,
    SearchIndex, SubQueryPattern, User,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;

fn directory() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.add_user(User::new("1", "Élodie Durand", "elodie.d", "France"));
    store.add_user(User::new("2", "Elodie Martin", "emartin", "Belgium"));
    store.add_user(User::new("3", "François Côté", "fcote", "Canada"));
    store.add_user(User::new("4", "Ann Lee", "ann", "Canada"));
    store.add_user(User::new("5", "Annabelle Roy", "annabelle", "France"));
    store.add_user(User::new("6", "Joanna Dann", "jdann", "Ireland"));
    store.add_user(User::new("7", "Zoë Ünal", "zoe", "Turkey"));
    store
}

fn ids(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.id.as_str()).collect()
}

fn sorted_ids(users: &[User]) -> Vec<&str> {
    let mut v = ids(users);
    v.sort();
    v
}

fn memory_index(
    store: Arc<MemoryStore>,
) -> SearchIndex<Arc<MemoryCorpus<Arc<MemoryStore>>>, Arc<MemoryStore>> {
    let corpus = Arc::new(MemoryCorpus::new(store.clone()));
    SearchIndex::new(corpus, store)
}

#[tokio::test]
async fn test_accent_insensitive_lowercase_query() {
    let index = memory_index(directory());
    let users = index.search("elodie", 10).await.unwrap();
    assert_eq!(sorted_ids(&users), vec!["1", "2"]);

    let users = index.search("francois cote", 10).await.unwrap();
    assert_eq!(ids(&users), vec!["3"]);

    // Candidate characters are case-folded, so "Ü" is reached through "ü"
    let users = index.search("zoe unal", 10).await.unwrap();
    assert_eq!(ids(&users), vec!["7"]);

    let users = index.search("zoe", 10).await.unwrap();
    assert_eq!(ids(&users), vec!["7"]);
}

#[tokio::test]
async fn test_capitalized_query_is_case_sensitive() {
    let index = memory_index(directory());
    // "E" is literal, so only the unaccented capital matches
    let users = index.search("Elodie", 10).await.unwrap();
    assert_eq!(ids(&users), vec!["2"]);
}

#[tokio::test]
async fn test_closer_to_whole_word_ranks_higher() {
    let index = memory_index(directory());
    let users = index.search("ann", 10).await.unwrap();
    // "ann" (username) is an exact whole-string match
    assert_eq!(users[0].id, "4");
    assert_eq!(sorted_ids(&users), vec!["4", "5", "6"]);
}

#[tokio::test]
async fn test_users_sharing_a_name_are_all_found() {
    let store = directory();
    store.add_user(User::new("8", "Maria Garcia", "mg1", "Spain"));
    store.add_user(User::new("9", "Maria Garcia", "mg2", "Mexico"));
    let index = memory_index(store);

    let users = index.search("maria", 10).await.unwrap();
    assert_eq!(sorted_ids(&users), vec!["8", "9"]);

    let users = index.search("maria garcia", 1).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_results_bounded_distinct_and_matching() {
    let store = directory();
    let index = memory_index(store.clone());
    let corpus = SearchCorpus::from_users(&[
        User::new("1", "Élodie Durand", "elodie.d", "France"),
        User::new("2", "Elodie Martin", "emartin", "Belgium"),
        User::new("3", "François Côté", "fcote", "Canada"),
        User::new("4", "Ann Lee", "ann", "Canada"),
        User::new("5", "Annabelle Roy", "annabelle", "France"),
        User::new("6", "Joanna Dann", "jdann", "Ireland"),
        User::new("7", "Zoë Ünal", "zoe", "Turkey"),
    ]);

    for query in ["a", "an", "e", "o", "d", "ann", "an e", "o a", "zz", "é"] {
        for limit in [0usize, 1, 2, 3, 10] {
            let users = index.search(query, limit).await.unwrap();
            assert!(users.len() <= limit, "{:?} limit {}", query, limit);

            let distinct: HashSet<&str> = ids(&users).into_iter().collect();
            assert_eq!(distinct.len(), users.len(), "duplicate user for {:?}", query);

            let patterns = SubQueryPattern::parse_query(query);
            for user in &users {
                let matched = corpus.iter().any(|(text, id)| {
                    let chars: Vec<char> = text.chars().collect();
                    id == &user.id && patterns.iter().all(|p| p.find(&chars).is_some())
                });
                assert!(matched, "user {} does not match {:?}", user.id, query);
            }

            // Never fewer than the number of matching users, up to the limit
            let expected: HashSet<&String> = corpus
                .iter()
                .filter(|(text, _)| {
                    let chars: Vec<char> = text.chars().collect();
                    patterns.iter().all(|p| p.find(&chars).is_some())
                })
                .map(|(_, id)| id)
                .collect();
            assert_eq!(users.len(), expected.len().min(limit), "{:?}", query);
        }
    }
}

#[tokio::test]
async fn test_invalidate_round_trip_is_identical() {
    let store = directory();
    let corpus = Arc::new(MemoryCorpus::new(store.clone()));
    let index = SearchIndex::new(corpus.clone(), store);

    let first = index.search("an", 10).await.unwrap();
    corpus.mark_stale();
    corpus.invalidate().await.unwrap();
    let second = index.search("an", 10).await.unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_new_users_visible_after_mark_stale() {
    let store = directory();
    let corpus = Arc::new(MemoryCorpus::new(store.clone()));
    let index = SearchIndex::new(corpus.clone(), store.clone());

    assert!(index.search("mateo", 10).await.unwrap().is_empty());

    store.add_user(User::new("8", "Mateo Ruiz", "mateo", "Spain"));
    // Cached corpus still old
    assert!(index.search("mateo", 10).await.unwrap().is_empty());

    corpus.mark_stale();
    let users = index.search("mateo", 10).await.unwrap();
    assert_eq!(ids(&users), vec!["8"]);
}

/// Provider with a fixed corpus and scripted staleness
struct ScriptedCorpus {
    corpus: Arc<SearchCorpus>,
    stale: Mutex<bool>,
    fail_invalidate: bool,
    invalidations: AtomicUsize,
}

impl ScriptedCorpus {
    fn new(corpus: SearchCorpus, stale: bool) -> Self {
        Self {
            corpus: Arc::new(corpus),
            stale: Mutex::new(stale),
            fail_invalidate: false,
            invalidations: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SearchCorpusProvider for ScriptedCorpus {
    fn needs_update(&self) -> bool {
        *self.stale.lock()
    }

    async fn search_data(&self) -> Result<Arc<SearchCorpus>> {
        Ok(self.corpus.clone())
    }

    async fn invalidate(&self) -> Result<()> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        if self.fail_invalidate {
            return Err(DiscoveryError::unavailable("search corpus", "rebuild failed"));
        }
        *self.stale.lock() = false;
        Ok(())
    }
}

#[tokio::test]
async fn test_stale_corpus_invalidated_once() {
    let corpus: SearchCorpus = vec![("Ann Lee", "4")].into_iter().collect();
    let provider = Arc::new(ScriptedCorpus::new(corpus, true));
    let index = SearchIndex::new(provider.clone(), directory());

    index.search("ann", 5).await.unwrap();
    index.search("ann", 5).await.unwrap();

    assert_eq!(provider.invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fresh_corpus_not_invalidated() {
    let corpus: SearchCorpus = vec![("Ann Lee", "4")].into_iter().collect();
    let provider = Arc::new(ScriptedCorpus::new(corpus, false));
    let index = SearchIndex::new(provider.clone(), directory());

    let users = index.search("lee", 5).await.unwrap();
    assert_eq!(ids(&users), vec!["4"]);
    assert_eq!(provider.invalidations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalidation_failure_propagates() {
    let corpus: SearchCorpus = vec![("Ann Lee", "4")].into_iter().collect();
    let mut provider = ScriptedCorpus::new(corpus, true);
    provider.fail_invalidate = true;
    let index = SearchIndex::new(Arc::new(provider), directory());

    let err = index.search("ann", 5).await.unwrap_err();
    assert_eq!(err.kind(), "dependency_unavailable");
}

#[tokio::test]
async fn test_unresolvable_user_fails_whole_search() {
    let corpus: SearchCorpus = vec![("Ann Lee", "4"), ("Anna Ghost", "404")]
        .into_iter()
        .collect();
    let provider = Arc::new(ScriptedCorpus::new(corpus, false));
    let index = SearchIndex::new(provider, directory());

    let err = index.search("ann", 5).await.unwrap_err();
    assert_eq!(err, DiscoveryError::NotFound("404".to_string()));

    // Queries that never reach the dangling entry still succeed
    let users = index.search("lee", 5).await.unwrap();
    assert_eq!(ids(&users), vec!["4"]);
}

#[tokio::test]
async fn test_empty_query_skips_collaborators() {
    let corpus: SearchCorpus = vec![("Ann Lee", "4")].into_iter().collect();
    let provider = Arc::new(ScriptedCorpus::new(corpus, true));
    let index = SearchIndex::new(provider.clone(), directory());

    assert!(index.search("   ", 5).await.unwrap().is_empty());
    assert_eq!(provider.invalidations.load(Ordering::SeqCst), 0);
}
