//! Collaborator abstractions
//!
//! The engine reads users, the friendship graph, posts, pending friend
//! requests and the search corpus through the traits in this module. It owns
//! none of that data. Implementations exist for:
//!
//! - **Memory**: `MemoryStore` and `MemoryCorpus`, for the server's seeded
//!   dataset and for tests
//!
//! Any other backend (a document database, an HTTP client) implements the
//! same traits and maps its own failures onto `DiscoveryError`.
//!
//! # Example
//!
//! ```rust
//! use discovery_core::store::MemoryStore;
//! use discovery_core::User;
//!
//! let store = MemoryStore::new();
//! store.add_user(User::new("u1", "Ann Lee", "ann", "Canada"));
//! store.add_user(User::new("u2", "Bo Kim", "bo", "Korea"));
//! store.add_friendship("u1", "u2");
//! assert_eq!(store.user_count(), 2);
//! ```

mod corpus;
mod memory;
mod traits;

pub use corpus::{MemoryCorpus, SearchCorpus};
pub use memory::{Dataset, MemoryStore};
pub use traits::{FriendGraph, PostStore, RelationshipStore, SearchCorpusProvider, UserStore};
