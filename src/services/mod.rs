//! Film aggregation and recommendation engine.
//!
//! `RelationIndex` and `FilmAggregator` turn normalized relational rows into
//! complete `Film` aggregates; `PopularityRanker` and `Recommender` sit on
//! top of them; `ActivityFeed` records user actions as a side channel.

pub mod aggregator;
pub mod feed;
pub mod popularity;
pub mod recommender;
pub mod relation_index;

pub use aggregator::FilmAggregator;
pub use feed::{ActivityFeed, FeedOrder};
pub use popularity::PopularityRanker;
pub use recommender::Recommender;
pub use relation_index::RelationIndex;
