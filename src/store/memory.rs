use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use tokio::sync::RwLock;

use crate::error::AppResult;
use crate::models::{Director, Event, FilmRow, Genre, Mpa, NewEvent};

use super::{CatalogStore, FilmDirectorRow, FilmGenreRow};

/// In-memory catalog store.
///
/// Implements the same contract as the Postgres store over plain maps and
/// sets. Used as a test double and as a throwaway demo backend; the seeding
/// helpers stand in for the out-of-scope film/user write path.
#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    films: BTreeMap<i64, FilmRow>,
    genres: HashMap<i32, Genre>,
    directors: HashMap<i32, Director>,
    users: BTreeSet<i64>,
    film_genres: BTreeSet<(i64, i32)>,
    film_directors: BTreeSet<(i64, i32)>,
    /// (film_id, user_id) pairs, unique per pair
    likes: BTreeSet<(i64, i64)>,
    events: Vec<Event>,
    next_film_id: i64,
    next_user_id: i64,
    next_genre_id: i32,
    next_director_id: i32,
    next_event_id: i64,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns its id.
    pub async fn seed_user(&self) -> i64 {
        let mut inner = self.inner.write().await;
        inner.next_user_id += 1;
        let id = inner.next_user_id;
        inner.users.insert(id);
        id
    }

    /// Registers a genre in the lookup table and returns its id.
    pub async fn seed_genre(&self, name: &str) -> i32 {
        let mut inner = self.inner.write().await;
        inner.next_genre_id += 1;
        let id = inner.next_genre_id;
        inner.genres.insert(
            id,
            Genre {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    /// Registers a director in the lookup table and returns its id.
    pub async fn seed_director(&self, name: &str) -> i32 {
        let mut inner = self.inner.write().await;
        inner.next_director_id += 1;
        let id = inner.next_director_id;
        inner.directors.insert(
            id,
            Director {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    /// Inserts a film row and returns the store-assigned id.
    pub async fn seed_film(
        &self,
        title: &str,
        description: &str,
        release_date: NaiveDate,
        duration: i32,
        mpa: Option<Mpa>,
    ) -> i64 {
        let mut inner = self.inner.write().await;
        inner.next_film_id += 1;
        let id = inner.next_film_id;
        inner.films.insert(
            id,
            FilmRow {
                id,
                title: title.to_string(),
                description: description.to_string(),
                release_date,
                duration,
                mpa,
            },
        );
        id
    }

    /// Attaches a genre to a film. Attaching twice is a no-op.
    pub async fn tag_genre(&self, film_id: i64, genre_id: i32) {
        self.inner.write().await.film_genres.insert((film_id, genre_id));
    }

    /// Credits a director on a film. Crediting twice is a no-op.
    pub async fn credit_director(&self, film_id: i64, director_id: i32) {
        self.inner
            .write()
            .await
            .film_directors
            .insert((film_id, director_id));
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn film_row(&self, film_id: i64) -> AppResult<Option<FilmRow>> {
        Ok(self.inner.read().await.films.get(&film_id).cloned())
    }

    async fn film_genres(&self, film_ids: &[i64]) -> AppResult<Vec<FilmGenreRow>> {
        let inner = self.inner.read().await;
        let wanted: BTreeSet<i64> = film_ids.iter().copied().collect();
        Ok(inner
            .film_genres
            .iter()
            .filter(|(film_id, _)| wanted.contains(film_id))
            .filter_map(|&(film_id, genre_id)| {
                inner.genres.get(&genre_id).map(|genre| FilmGenreRow {
                    film_id,
                    genre: genre.clone(),
                })
            })
            .collect())
    }

    async fn film_directors(&self, film_ids: &[i64]) -> AppResult<Vec<FilmDirectorRow>> {
        let inner = self.inner.read().await;
        let wanted: BTreeSet<i64> = film_ids.iter().copied().collect();
        Ok(inner
            .film_directors
            .iter()
            .filter(|(film_id, _)| wanted.contains(film_id))
            .filter_map(|&(film_id, director_id)| {
                inner.directors.get(&director_id).map(|director| FilmDirectorRow {
                    film_id,
                    director: director.clone(),
                })
            })
            .collect())
    }

    async fn popular_film_rows(
        &self,
        limit: i64,
        genre_id: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<FilmRow>> {
        let inner = self.inner.read().await;

        let mut like_counts: HashMap<i64, usize> = HashMap::new();
        for &(film_id, _) in &inner.likes {
            *like_counts.entry(film_id).or_default() += 1;
        }

        let mut candidates: Vec<&FilmRow> = inner
            .films
            .values()
            .filter(|row| match genre_id {
                Some(genre_id) => inner.film_genres.contains(&(row.id, genre_id)),
                None => true,
            })
            .filter(|row| match year {
                Some(year) => row.release_date.year() == year,
                None => true,
            })
            .collect();

        candidates.sort_by_key(|row| {
            (
                std::cmp::Reverse(like_counts.get(&row.id).copied().unwrap_or(0)),
                row.id,
            )
        });
        candidates.truncate(limit.max(0) as usize);

        Ok(candidates.into_iter().cloned().collect())
    }

    async fn liked_film_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        let inner = self.inner.read().await;
        Ok(inner
            .likes
            .iter()
            .filter(|&&(_, liker)| liker == user_id)
            .map(|&(film_id, _)| film_id)
            .collect())
    }

    async fn closest_taste_neighbor(
        &self,
        user_id: i64,
        liked: &[i64],
    ) -> AppResult<Option<i64>> {
        let inner = self.inner.read().await;
        let target: BTreeSet<i64> = liked.iter().copied().collect();

        // BTreeMap iteration is ascending by user id, so keeping a strictly
        // greater overlap yields the smallest id among ties.
        let mut overlaps: BTreeMap<i64, usize> = BTreeMap::new();
        for &(film_id, liker) in &inner.likes {
            if liker != user_id && target.contains(&film_id) {
                *overlaps.entry(liker).or_default() += 1;
            }
        }

        let mut best: Option<(i64, usize)> = None;
        for (liker, overlap) in overlaps {
            if best.map_or(true, |(_, count)| overlap > count) {
                best = Some((liker, overlap));
            }
        }
        Ok(best.map(|(liker, _)| liker))
    }

    async fn liked_rows_excluding(
        &self,
        user_id: i64,
        excluded: &[i64],
    ) -> AppResult<Vec<FilmRow>> {
        let inner = self.inner.read().await;
        let excluded: BTreeSet<i64> = excluded.iter().copied().collect();
        Ok(inner
            .likes
            .iter()
            .filter(|&&(film_id, liker)| liker == user_id && !excluded.contains(&film_id))
            .filter_map(|&(film_id, _)| inner.films.get(&film_id).cloned())
            .collect())
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> AppResult<()> {
        self.inner.write().await.likes.insert((film_id, user_id));
        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> AppResult<()> {
        self.inner.write().await.likes.remove(&(film_id, user_id));
        Ok(())
    }

    async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
        let mut inner = self.inner.write().await;
        inner.next_event_id += 1;
        let event = Event {
            event_id: inner.next_event_id,
            event_type: event.event_type,
            operation: event.operation,
            user_id: event.user_id,
            entity_id: event.entity_id,
            timestamp: event.timestamp,
        };
        inner.events.push(event.clone());
        Ok(event)
    }

    async fn events_for_user(&self, user_id: i64) -> AppResult<Vec<Event>> {
        let inner = self.inner.read().await;
        let mut events: Vec<Event> = inner
            .events
            .iter()
            .filter(|event| event.user_id == user_id)
            .cloned()
            .collect();
        events.sort_by_key(|event| (event.timestamp, event.event_id));
        Ok(events)
    }

    async fn film_exists(&self, film_id: i64) -> AppResult<bool> {
        Ok(self.inner.read().await.films.contains_key(&film_id))
    }

    async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        Ok(self.inner.read().await.users.contains(&user_id))
    }
}
