//! Shared application state

use std::sync::Arc;

use discovery_core::recommend::Sources;
use discovery_core::{Dataset, MemoryCorpus, MemoryStore, RecommendationEngine, SearchIndex};

use crate::config::ServerConfig;

/// Search corpus cached over the in-memory store
pub type StoreCorpus = MemoryCorpus<Arc<MemoryStore>>;

/// Search index reading from [`StoreCorpus`]
pub type StoreSearch = SearchIndex<Arc<StoreCorpus>, Arc<MemoryStore>>;

/// Everything a request handler needs, shared behind an `Arc`.
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub corpus: Arc<StoreCorpus>,
    pub search: StoreSearch,
    pub recommender: RecommendationEngine,
    pub default_search_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<MemoryStore>, config: &ServerConfig) -> Self {
        let corpus = Arc::new(MemoryCorpus::new(store.clone()));
        let search = SearchIndex::new(corpus.clone(), store.clone());
        let recommender = RecommendationEngine::with_config(
            Sources::from_store(store.clone()),
            config.recommend.clone(),
        );

        Self {
            store,
            corpus,
            search,
            recommender,
            default_search_limit: config.default_search_limit,
        }
    }

    pub fn from_dataset(dataset: Dataset, config: &ServerConfig) -> Self {
        Self::new(Arc::new(MemoryStore::from_dataset(dataset)), config)
    }
}
