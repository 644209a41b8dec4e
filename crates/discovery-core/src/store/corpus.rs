//! Search corpus snapshot and an in-memory provider

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ahash::AHasher;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

use crate::error::Result;
use crate::model::{User, UserId};
use crate::store::traits::{SearchCorpusProvider, UserStore};

/// Searchable strings and the users they belong to.
///
/// Several strings may point at the same user (name and username), and the
/// same string may point at several users (shared display names). Iteration
/// order is the lexical order of the strings, then of the user ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCorpus {
    entries: BTreeSet<(String, UserId)>,
}

impl SearchCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a user's display name and username.
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a User>) -> Self {
        let mut corpus = Self::new();
        for user in users {
            corpus.insert(user.name.clone(), user.id.clone());
            corpus.insert(user.username.clone(), user.id.clone());
        }
        corpus
    }

    /// Add a searchable string. Blank strings are not indexed.
    pub fn insert(&mut self, text: impl Into<String>, user_id: impl Into<UserId>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.entries.insert((text, user_id.into()));
    }

    /// Every user indexed under exactly `text`.
    pub fn users_for<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a UserId> + 'a {
        self.entries
            .range((text.to_string(), UserId::new())..)
            .take_while(move |(t, _)| t == text)
            .map(|(_, id)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UserId)> {
        self.entries.iter().map(|(text, id)| (text, id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Content hash used to tell corpus versions apart in logs
    pub fn fingerprint(&self) -> String {
        let mut hasher = AHasher::default();
        for (text, user_id) in &self.entries {
            text.hash(&mut hasher);
            user_id.hash(&mut hasher);
        }
        format!("{:016x}", hasher.finish())
    }
}

impl<S: Into<String>, U: Into<UserId>> FromIterator<(S, U)> for SearchCorpus {
    fn from_iter<I: IntoIterator<Item = (S, U)>>(iter: I) -> Self {
        let mut corpus = Self::new();
        for (text, user_id) in iter {
            corpus.insert(text, user_id);
        }
        corpus
    }
}

/// Corpus provider that derives its entries from a [`UserStore`].
///
/// Starts stale; `invalidate` rebuilds from the store and publishes a new
/// snapshot. Readers holding an older `Arc` keep a consistent view.
pub struct MemoryCorpus<U> {
    users: U,
    snapshot: RwLock<Arc<SearchCorpus>>,
    stale: AtomicBool,
}

impl<U: UserStore> MemoryCorpus<U> {
    pub fn new(users: U) -> Self {
        Self {
            users,
            snapshot: RwLock::new(Arc::new(SearchCorpus::new())),
            stale: AtomicBool::new(true),
        }
    }

    /// Signal that the underlying users changed.
    pub fn mark_stale(&self) {
        self.stale.store(true, Ordering::Release);
    }

    /// Entry count of the current snapshot
    pub fn len(&self) -> usize {
        self.snapshot.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<U: UserStore> SearchCorpusProvider for MemoryCorpus<U> {
    fn needs_update(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    async fn search_data(&self) -> Result<Arc<SearchCorpus>> {
        Ok(self.snapshot.read().clone())
    }

    async fn invalidate(&self) -> Result<()> {
        // Clear first so a change landing during the rebuild re-flags it.
        self.stale.store(false, Ordering::Release);

        let users = match self.users.all_users().await {
            Ok(users) => users,
            Err(e) => {
                self.stale.store(true, Ordering::Release);
                return Err(e);
            }
        };

        let corpus = SearchCorpus::from_users(&users);
        let fingerprint = corpus.fingerprint();
        let entries = corpus.len();
        *self.snapshot.write() = Arc::new(corpus);

        info!(users = users.len(), entries, fingerprint = %fingerprint, "Search corpus rebuilt");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_corpus_indexes_name_and_username() {
        let users = vec![User::new("u1", "Ann Lee", "annie", "Canada")];
        let corpus = SearchCorpus::from_users(&users);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.users_for("Ann Lee").collect::<Vec<_>>(), vec!["u1"]);
        assert_eq!(corpus.users_for("annie").collect::<Vec<_>>(), vec!["u1"]);
    }

    #[test]
    fn test_shared_name_keeps_every_user() {
        let users = vec![
            User::new("1", "Maria Garcia", "mg1", "Spain"),
            User::new("2", "Maria Garcia", "mg2", "Mexico"),
        ];
        let corpus = SearchCorpus::from_users(&users);
        assert_eq!(corpus.len(), 4);
        assert_eq!(
            corpus.users_for("Maria Garcia").collect::<Vec<_>>(),
            vec!["1", "2"]
        );
        assert!(corpus.users_for("Maria").next().is_none());
    }

    #[test]
    fn test_blank_strings_skipped() {
        let corpus: SearchCorpus = vec![("  ", "u1"), ("bob", "u2")].into_iter().collect();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a: SearchCorpus = vec![("ann", "u1")].into_iter().collect();
        let b: SearchCorpus = vec![("ann", "u1")].into_iter().collect();
        let c: SearchCorpus = vec![("ann", "u2")].into_iter().collect();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[tokio::test]
    async fn test_memory_corpus_rebuild() {
        let store = Arc::new(MemoryStore::new());
        store.add_user(User::new("u1", "Ann", "ann", "Canada"));
        let corpus = MemoryCorpus::new(store.clone());

        assert!(corpus.needs_update());
        assert!(corpus.search_data().await.unwrap().is_empty());

        corpus.invalidate().await.unwrap();
        assert!(!corpus.needs_update());
        let before = corpus.search_data().await.unwrap();
        assert_eq!(before.len(), 2);

        store.add_user(User::new("u2", "Bob", "bobby", "Chile"));
        corpus.mark_stale();
        assert!(corpus.needs_update());
        corpus.invalidate().await.unwrap();

        let after = corpus.search_data().await.unwrap();
        assert_eq!(after.len(), 4);
        // Old snapshot is untouched
        assert_eq!(before.len(), 2);
    }
}
