//! Collaborator trait definitions
//!
//! Every method is a suspension point: implementations may block on a
//! database or network round-trip. The engine never mutates through these
//! traits except for [`SearchCorpusProvider::invalidate`].

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{PendingRelationship, Post, User, UserId};
use crate::store::corpus::SearchCorpus;

/// Read access to user profiles.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every known user.
    async fn all_users(&self) -> Result<Vec<User>>;

    /// Resolve a single user.
    ///
    /// Returns `DiscoveryError::NotFound` if the id does not resolve.
    async fn user(&self, id: &str) -> Result<User>;
}

/// Read access to the undirected friendship graph.
#[async_trait]
pub trait FriendGraph: Send + Sync {
    /// Adjacency list of `id`.
    async fn friends_of(&self, id: &str) -> Result<HashSet<UserId>>;

    /// Degree of `id` in the friendship graph.
    async fn friends_count(&self, id: &str) -> Result<usize> {
        Ok(self.friends_of(id).await?.len())
    }
}

/// Read access to posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts authored by `author_id`, with or without location.
    async fn posts_by_author(&self, author_id: &str) -> Result<Vec<Post>>;
}

/// Read access to pending friend requests.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Pending requests where `id` is the sender.
    async fn pending_sent_by(&self, id: &str) -> Result<Vec<PendingRelationship>>;

    /// Pending requests where `id` is the receiver.
    async fn pending_received_by(&self, id: &str) -> Result<Vec<PendingRelationship>>;
}

/// Externally owned search corpus with a staleness flag.
///
/// The provider is responsible for its own consistency: `search_data` returns
/// a snapshot that is at least as new as the last completed `invalidate`.
#[async_trait]
pub trait SearchCorpusProvider: Send + Sync {
    /// Whether the corpus must be rebuilt before the next read.
    fn needs_update(&self) -> bool;

    /// Current corpus snapshot.
    async fn search_data(&self) -> Result<Arc<SearchCorpus>>;

    /// Force a rebuild before the next read.
    async fn invalidate(&self) -> Result<()>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for Arc<T> {
    async fn all_users(&self) -> Result<Vec<User>> {
        (**self).all_users().await
    }

    async fn user(&self, id: &str) -> Result<User> {
        (**self).user(id).await
    }
}

#[async_trait]
impl<T: FriendGraph + ?Sized> FriendGraph for Arc<T> {
    async fn friends_of(&self, id: &str) -> Result<HashSet<UserId>> {
        (**self).friends_of(id).await
    }

    async fn friends_count(&self, id: &str) -> Result<usize> {
        (**self).friends_count(id).await
    }
}

#[async_trait]
impl<T: PostStore + ?Sized> PostStore for Arc<T> {
    async fn posts_by_author(&self, author_id: &str) -> Result<Vec<Post>> {
        (**self).posts_by_author(author_id).await
    }
}

#[async_trait]
impl<T: RelationshipStore + ?Sized> RelationshipStore for Arc<T> {
    async fn pending_sent_by(&self, id: &str) -> Result<Vec<PendingRelationship>> {
        (**self).pending_sent_by(id).await
    }

    async fn pending_received_by(&self, id: &str) -> Result<Vec<PendingRelationship>> {
        (**self).pending_received_by(id).await
    }
}

#[async_trait]
impl<T: SearchCorpusProvider + ?Sized> SearchCorpusProvider for Arc<T> {
    fn needs_update(&self) -> bool {
        (**self).needs_update()
    }

    async fn search_data(&self) -> Result<Arc<SearchCorpus>> {
        (**self).search_data().await
    }

    async fn invalidate(&self) -> Result<()> {
        (**self).invalidate().await
    }
}
