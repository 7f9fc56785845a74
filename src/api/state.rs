use std::sync::Arc;

use crate::services::{ActivityFeed, FilmAggregator, PopularityRanker, Recommender};
use crate::store::CatalogStore;

/// Shared application state: the store plus the engine components built on
/// top of it. Everything here is read-only after startup, so handlers clone
/// the `Arc` and nothing else.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub aggregator: Arc<FilmAggregator>,
    pub ranker: Arc<PopularityRanker>,
    pub recommender: Arc<Recommender>,
    pub feed: Arc<ActivityFeed>,
}

impl AppState {
    /// Wires the engine components around one store implementation.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            aggregator: Arc::new(FilmAggregator::new(store.clone())),
            ranker: Arc::new(PopularityRanker::new(store.clone())),
            recommender: Arc::new(Recommender::new(store.clone())),
            feed: Arc::new(ActivityFeed::new(store.clone())),
            store,
        }
    }
}
