//! In-memory collaborator backend
//!
//! A HashMap-based implementation of every read interface the engine needs.
//! Used by the server when seeded from a dataset file, and by tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};
use crate::model::{PendingRelationship, Post, User, UserId};
use crate::store::traits::{FriendGraph, PostStore, RelationshipStore, UserStore};

/// Serialized snapshot of everything a [`MemoryStore`] holds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    /// Undirected friendship edges
    #[serde(default)]
    pub friendships: Vec<(UserId, UserId)>,
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub pending: Vec<PendingRelationship>,
}

#[derive(Debug, Default)]
struct Inner {
    // Insertion order of users; `all_users` preserves it.
    order: Vec<UserId>,
    users: HashMap<UserId, User>,
    friends: HashMap<UserId, HashSet<UserId>>,
    posts: HashMap<UserId, Vec<Post>>,
    pending: Vec<PendingRelationship>,
}

/// In-memory users, friendship graph, posts and pending requests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store seeded from a dataset.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let store = Self::new();
        for user in dataset.users {
            store.add_user(user);
        }
        for (a, b) in dataset.friendships {
            store.add_friendship(&a, &b);
        }
        for post in dataset.posts {
            store.add_post(post);
        }
        for request in dataset.pending {
            store.add_pending_request(&request.sender_id, &request.receiver_id);
        }
        store
    }

    /// Insert or replace a user.
    pub fn add_user(&self, user: User) {
        let mut inner = self.inner.write();
        if !inner.users.contains_key(&user.id) {
            inner.order.push(user.id.clone());
        }
        inner.users.insert(user.id.clone(), user);
    }

    /// Record an undirected friendship edge. Self-loops are ignored.
    pub fn add_friendship(&self, a: &str, b: &str) {
        if a == b {
            return;
        }
        let mut inner = self.inner.write();
        inner
            .friends
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string());
        inner
            .friends
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string());
    }

    pub fn add_post(&self, post: Post) {
        self.inner
            .write()
            .posts
            .entry(post.author_id.clone())
            .or_default()
            .push(post);
    }

    pub fn add_pending_request(&self, sender_id: &str, receiver_id: &str) {
        let request = PendingRelationship {
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
        };
        let mut inner = self.inner.write();
        if !inner.pending.contains(&request) {
            inner.pending.push(request);
        }
    }

    /// Number of users held.
    pub fn user_count(&self) -> usize {
        self.inner.read().users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn all_users(&self) -> Result<Vec<User>> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.users.get(id).cloned())
            .collect())
    }

    async fn user(&self, id: &str) -> Result<User> {
        self.inner
            .read()
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| DiscoveryError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl FriendGraph for MemoryStore {
    async fn friends_of(&self, id: &str) -> Result<HashSet<UserId>> {
        Ok(self
            .inner
            .read()
            .friends
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn friends_count(&self, id: &str) -> Result<usize> {
        Ok(self.inner.read().friends.get(id).map_or(0, HashSet::len))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn posts_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        Ok(self
            .inner
            .read()
            .posts
            .get(author_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn pending_sent_by(&self, id: &str) -> Result<Vec<PendingRelationship>> {
        Ok(self
            .inner
            .read()
            .pending
            .iter()
            .filter(|r| r.sender_id == id)
            .cloned()
            .collect())
    }

    async fn pending_received_by(&self, id: &str) -> Result<Vec<PendingRelationship>> {
        Ok(self
            .inner
            .read()
            .pending
            .iter()
            .filter(|r| r.receiver_id == id)
            .cloned()
            .collect())
    }
}
