use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{Director, Genre};
use crate::store::CatalogStore;

/// Batch loader for film many-to-many relations.
///
/// Given a set of film ids, loads all genre or director associations in one
/// query per relation type and groups them by film id. Films with no
/// associations are simply absent from the returned map; callers treat that
/// as an empty relation set.
pub struct RelationIndex {
    store: Arc<dyn CatalogStore>,
}

impl RelationIndex {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Genres per film id, each list sorted ascending by genre id.
    ///
    /// Duplicate input ids are collapsed before querying; an empty input
    /// returns an empty map without touching the store.
    pub async fn genres_for(&self, film_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Genre>>> {
        let ids = distinct(film_ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = self.store.film_genres(&ids).await?;
        let mut by_film: HashMap<i64, Vec<Genre>> = HashMap::new();
        for row in rows {
            by_film.entry(row.film_id).or_default().push(row.genre);
        }
        for genres in by_film.values_mut() {
            sort_by_id(genres, |genre| genre.id);
        }
        Ok(by_film)
    }

    /// Directors per film id, each list sorted ascending by director id.
    pub async fn directors_for(&self, film_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Director>>> {
        let ids = distinct(film_ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = self.store.film_directors(&ids).await?;
        let mut by_film: HashMap<i64, Vec<Director>> = HashMap::new();
        for row in rows {
            by_film.entry(row.film_id).or_default().push(row.director);
        }
        for directors in by_film.values_mut() {
            sort_by_id(directors, |director| director.id);
        }
        Ok(by_film)
    }
}

fn distinct(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<i64>>().into_iter().collect()
}

/// Canonical relation ordering: ascending by id, duplicates collapsed.
/// Two differently-hydrated films must compare equal, so this is a
/// correctness requirement rather than cosmetics.
fn sort_by_id<T>(entries: &mut Vec<T>, id: impl Fn(&T) -> i32) {
    entries.sort_by_key(&id);
    entries.dedup_by_key(|entry| id(entry));
}
