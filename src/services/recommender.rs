use std::sync::Arc;

use crate::error::AppResult;
use crate::models::Film;
use crate::store::CatalogStore;

use super::FilmAggregator;

/// Single-neighbor collaborative filtering over like overlap.
///
/// Picks the one other user whose like set overlaps the target's the most
/// (ties broken by smallest user id) and returns the films that user liked
/// which the target has not. Deliberately k = 1 and unweighted; a richer
/// scoring function would be an extension, not a fix.
pub struct Recommender {
    store: Arc<dyn CatalogStore>,
    aggregator: FilmAggregator,
}

impl Recommender {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            aggregator: FilmAggregator::new(store.clone()),
            store,
        }
    }

    /// Film suggestions for one user. A user with no likes, or with no
    /// overlapping neighbor, gets an empty list rather than an error.
    pub async fn recommend(&self, user_id: i64) -> AppResult<Vec<Film>> {
        let liked = self.store.liked_film_ids(user_id).await?;
        if liked.is_empty() {
            tracing::debug!(user_id, "No likes on record, nothing to compare");
            return Ok(Vec::new());
        }

        let Some(neighbor) = self.store.closest_taste_neighbor(user_id, &liked).await? else {
            tracing::debug!(user_id, "No overlapping neighbor found");
            return Ok(Vec::new());
        };

        let rows = self.store.liked_rows_excluding(neighbor, &liked).await?;
        tracing::debug!(
            user_id,
            neighbor,
            suggested = rows.len(),
            "Recommendations computed"
        );
        self.aggregator.hydrate_all(rows).await
    }
}
