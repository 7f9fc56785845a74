use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::Film;
use crate::store::CatalogStore;

use super::FilmAggregator;

/// Ranks films by descending like count with optional genre and year filters.
///
/// Ties are broken by ascending film id: the store offers no secondary
/// ranking signal, so id order keeps the output deterministic. Films with
/// zero likes are valid candidates and land after all liked films.
pub struct PopularityRanker {
    store: Arc<dyn CatalogStore>,
    aggregator: FilmAggregator,
}

impl PopularityRanker {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            aggregator: FilmAggregator::new(store.clone()),
            store,
        }
    }

    /// Top `limit` films under the given filters, hydrated in one batch.
    ///
    /// A non-positive `limit` is a caller contract violation and is rejected
    /// before any query runs. `None` filters mean "all genres" / "any year".
    pub async fn rank(
        &self,
        limit: i64,
        genre_id: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<Film>> {
        if limit <= 0 {
            return Err(AppError::InvalidInput(format!(
                "count must be a positive integer, got {limit}"
            )));
        }

        let rows = self.store.popular_film_rows(limit, genre_id, year).await?;
        tracing::debug!(
            returned = rows.len(),
            limit,
            genre_id,
            year,
            "Popularity ranking computed"
        );
        self.aggregator.hydrate_all(rows).await
    }
}
