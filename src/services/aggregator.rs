use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Film, FilmRow};
use crate::store::CatalogStore;

use super::RelationIndex;

/// Assembles complete `Film` aggregates from flat rows.
///
/// `hydrate_all` issues exactly one genre query and one director query for
/// the whole batch, never one per row. Rows without relations get empty
/// vectors; the relation ordering comes from `RelationIndex`, so a film
/// hydrated alone is identical to the same film hydrated in a batch.
pub struct FilmAggregator {
    index: RelationIndex,
}

impl FilmAggregator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            index: RelationIndex::new(store),
        }
    }

    /// Hydrates a single row. Delegates to `hydrate_all` so singleton and
    /// batch loads share one code path.
    pub async fn hydrate(&self, row: FilmRow) -> AppResult<Film> {
        let mut films = self.hydrate_all(vec![row]).await?;
        films
            .pop()
            .ok_or_else(|| AppError::Internal("hydration dropped its only row".to_string()))
    }

    /// Hydrates a batch of rows, preserving their order.
    pub async fn hydrate_all(&self, rows: Vec<FilmRow>) -> AppResult<Vec<Film>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let genres = self.index.genres_for(&ids).await?;
        let directors = self.index.directors_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let film_genres = genres.get(&row.id).cloned().unwrap_or_default();
                let film_directors = directors.get(&row.id).cloned().unwrap_or_default();
                Film::from_parts(row, film_genres, film_directors)
            })
            .collect())
    }
}
