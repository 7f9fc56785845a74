//! Storage abstraction for the catalog.
//!
//! A single `CatalogStore` contract with two implementations: the
//! Postgres-backed store used in production and an in-memory store used as a
//! test double. Both follow the same not-found rule: a missing single entity
//! is an error at the caller boundary, while batch and derived queries with
//! no rows yield empty collections.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Director, Event, FilmRow, Genre, NewEvent};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// One `film_genres` join row: which genre is attached to which film.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmGenreRow {
    pub film_id: i64,
    pub genre: Genre,
}

/// One `film_directors` join row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmDirectorRow {
    pub film_id: i64,
    pub director: Director,
}

/// Query interface the aggregation and recommendation engine runs against.
///
/// All reads are request-scoped and read-committed; the store is the only
/// shared mutable resource and no method here opens a multi-statement
/// transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetches the flat row for one film, `None` if the id does not exist.
    async fn film_row(&self, film_id: i64) -> AppResult<Option<FilmRow>>;

    /// Batch-fetches all genre associations for the given film ids in a
    /// single query. Films without genres simply produce no rows.
    async fn film_genres(&self, film_ids: &[i64]) -> AppResult<Vec<FilmGenreRow>>;

    /// Batch-fetches all director associations for the given film ids in a
    /// single query.
    async fn film_directors(&self, film_ids: &[i64]) -> AppResult<Vec<FilmDirectorRow>>;

    /// Films ordered by descending like count, ties broken by ascending film
    /// id, truncated to `limit`. `genre_id`/`year` restrict the candidate
    /// set; `None` means no filter. Films with zero likes are candidates.
    async fn popular_film_rows(
        &self,
        limit: i64,
        genre_id: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<FilmRow>>;

    /// Ids of all films the user has liked.
    async fn liked_film_ids(&self, user_id: i64) -> AppResult<Vec<i64>>;

    /// The other user whose like set overlaps `liked` the most, ties broken
    /// by smallest user id. `None` when nobody else liked any of the films.
    async fn closest_taste_neighbor(
        &self,
        user_id: i64,
        liked: &[i64],
    ) -> AppResult<Option<i64>>;

    /// Rows for films the user liked, minus the ones in `excluded`.
    async fn liked_rows_excluding(
        &self,
        user_id: i64,
        excluded: &[i64],
    ) -> AppResult<Vec<FilmRow>>;

    /// Records a like edge. Inserting an existing pair is a no-op.
    async fn add_like(&self, film_id: i64, user_id: i64) -> AppResult<()>;

    /// Removes a like edge if present.
    async fn remove_like(&self, film_id: i64, user_id: i64) -> AppResult<()>;

    /// Appends one feed event; the store assigns the event id.
    async fn insert_event(&self, event: NewEvent) -> AppResult<Event>;

    /// All events for a user, ascending by `(timestamp, event_id)`.
    async fn events_for_user(&self, user_id: i64) -> AppResult<Vec<Event>>;

    async fn film_exists(&self, film_id: i64) -> AppResult<bool>;

    async fn user_exists(&self, user_id: i64) -> AppResult<bool>;
}
