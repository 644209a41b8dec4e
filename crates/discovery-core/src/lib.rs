//! Discovery Core Engine
//!
//! This crate ranks which users should be shown to a given user. It is a pure
//! computation over data pulled from read-only collaborators, so the same
//! engine runs behind the HTTP server and inside tests with in-memory stores.
//!
//! # Components
//!
//! - [`fuzzy`] - accent-insensitive, token-based user search ([`SearchIndex`])
//! - [`recommend`] - "people you may want to follow" ([`RecommendationEngine`])
//! - [`store`] - collaborator traits plus in-memory implementations
//!
//! # Features
//!
//! - `parallel` - Score large search corpora in parallel via rayon
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use discovery_core::{MemoryCorpus, MemoryStore, SearchIndex, User};
//!
//! # tokio_test_block(async {
//! let store = Arc::new(MemoryStore::new());
//! store.add_user(User::new("u1", "Zoë Martin", "zoe", "France"));
//!
//! let corpus = Arc::new(MemoryCorpus::new(store.clone()));
//! let index = SearchIndex::new(corpus, store);
//!
//! let users = index.search("zoe", 10).await.unwrap();
//! assert_eq!(users[0].id, "u1");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod error;
pub mod fuzzy;
pub mod model;
pub mod recommend;
pub mod store;

// Re-export main types at crate root
pub use error::{checked_limit, DiscoveryError, Result};
pub use fuzzy::{ScoredMatch, SearchConfig, SearchIndex, Span, SubQueryPattern};
pub use model::{
    GeoPoint, PendingRelationship, Post, PublicProfile, RecommendationResult, Signal, User, UserId,
};
pub use recommend::{RecommendConfig, RecommendationEngine, SignalWeights, Sources};
pub use store::{
    Dataset, FriendGraph, MemoryCorpus, MemoryStore, PostStore, RelationshipStore, SearchCorpus,
    SearchCorpusProvider, UserStore,
};
