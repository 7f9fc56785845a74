use sqlx::postgres::PgRow;
use sqlx::{PgPool, QueryBuilder, Row};

use crate::error::{AppError, AppResult};
use crate::models::{Director, Event, EventOperation, EventType, FilmRow, Genre, Mpa, NewEvent};

use super::{CatalogStore, FilmDirectorRow, FilmGenreRow};

/// Shared select list for the flat film row with its joined MPA rating.
const FILM_COLUMNS: &str = "f.id, f.title, f.description, f.release_date, f.duration, \
                            m.id AS mpa_id, m.name AS mpa_name";

/// Postgres-backed catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_film_row(row: &PgRow) -> Result<FilmRow, sqlx::Error> {
        let mpa_id: Option<i32> = row.try_get("mpa_id")?;
        let mpa_name: Option<String> = row.try_get("mpa_name")?;
        Ok(FilmRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            release_date: row.try_get("release_date")?,
            duration: row.try_get("duration")?,
            mpa: mpa_id.zip(mpa_name).map(|(id, name)| Mpa { id, name }),
        })
    }

    fn map_event(row: &PgRow) -> AppResult<Event> {
        let type_text: String = row.try_get("event_type").map_err(AppError::Database)?;
        let op_text: String = row.try_get("operation").map_err(AppError::Database)?;
        let event_type = EventType::from_db(&type_text)
            .ok_or_else(|| AppError::Internal(format!("unknown event type: {type_text}")))?;
        let operation = EventOperation::from_db(&op_text)
            .ok_or_else(|| AppError::Internal(format!("unknown event operation: {op_text}")))?;
        Ok(Event {
            event_id: row.try_get("event_id").map_err(AppError::Database)?,
            event_type,
            operation,
            user_id: row.try_get("user_id").map_err(AppError::Database)?,
            entity_id: row.try_get("entity_id").map_err(AppError::Database)?,
            timestamp: row.try_get("event_timestamp").map_err(AppError::Database)?,
        })
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn film_row(&self, film_id: i64) -> AppResult<Option<FilmRow>> {
        let sql = format!(
            "SELECT {FILM_COLUMNS} \
             FROM films f \
             LEFT JOIN mpa_ratings m ON m.id = f.mpa_id \
             WHERE f.id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(film_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(Self::map_film_row).transpose().map_err(Into::into)
    }

    async fn film_genres(&self, film_ids: &[i64]) -> AppResult<Vec<FilmGenreRow>> {
        let rows = sqlx::query(
            "SELECT fg.film_id, g.id, g.name \
             FROM film_genres fg \
             JOIN genres g ON g.id = fg.genre_id \
             WHERE fg.film_id = ANY($1)",
        )
        .bind(film_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(FilmGenreRow {
                    film_id: row.try_get("film_id")?,
                    genre: Genre {
                        id: row.try_get("id")?,
                        name: row.try_get("name")?,
                    },
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }

    async fn film_directors(&self, film_ids: &[i64]) -> AppResult<Vec<FilmDirectorRow>> {
        let rows = sqlx::query(
            "SELECT fd.film_id, d.id, d.name \
             FROM film_directors fd \
             JOIN directors d ON d.id = fd.director_id \
             WHERE fd.film_id = ANY($1)",
        )
        .bind(film_ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(FilmDirectorRow {
                    film_id: row.try_get("film_id")?,
                    director: Director {
                        id: row.try_get("id")?,
                        name: row.try_get("name")?,
                    },
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }

    async fn popular_film_rows(
        &self,
        limit: i64,
        genre_id: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<FilmRow>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {FILM_COLUMNS} \
             FROM films f \
             LEFT JOIN mpa_ratings m ON m.id = f.mpa_id \
             LEFT JOIN film_likes fl ON fl.film_id = f.id"
        ));
        if let Some(genre_id) = genre_id {
            query.push(" JOIN film_genres fg ON fg.film_id = f.id AND fg.genre_id = ");
            query.push_bind(genre_id);
        }
        if let Some(year) = year {
            query.push(" WHERE EXTRACT(YEAR FROM f.release_date)::int = ");
            query.push_bind(year);
        }
        query.push(
            " GROUP BY f.id, m.id, m.name \
             ORDER BY COUNT(fl.user_id) DESC, f.id ASC \
             LIMIT ",
        );
        query.push_bind(limit);

        let rows = query.build().fetch_all(&self.pool).await?;
        tracing::debug!(
            candidates = rows.len(),
            genre_id,
            year,
            "Popularity candidates fetched"
        );
        rows.iter()
            .map(Self::map_film_row)
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }

    async fn liked_film_ids(&self, user_id: i64) -> AppResult<Vec<i64>> {
        let ids = sqlx::query_scalar(
            "SELECT film_id FROM film_likes WHERE user_id = $1 ORDER BY film_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn closest_taste_neighbor(
        &self,
        user_id: i64,
        liked: &[i64],
    ) -> AppResult<Option<i64>> {
        let neighbor = sqlx::query_scalar(
            "SELECT user_id \
             FROM film_likes \
             WHERE user_id <> $1 AND film_id = ANY($2) \
             GROUP BY user_id \
             ORDER BY COUNT(film_id) DESC, user_id ASC \
             LIMIT 1",
        )
        .bind(user_id)
        .bind(liked)
        .fetch_optional(&self.pool)
        .await?;
        Ok(neighbor)
    }

    async fn liked_rows_excluding(
        &self,
        user_id: i64,
        excluded: &[i64],
    ) -> AppResult<Vec<FilmRow>> {
        let sql = format!(
            "SELECT {FILM_COLUMNS} \
             FROM film_likes fl \
             JOIN films f ON f.id = fl.film_id \
             LEFT JOIN mpa_ratings m ON m.id = f.mpa_id \
             WHERE fl.user_id = $1 AND NOT (f.id = ANY($2)) \
             ORDER BY f.id"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(excluded)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(Self::map_film_row)
            .collect::<Result<_, sqlx::Error>>()
            .map_err(Into::into)
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO film_likes (film_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(film_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM film_likes WHERE film_id = $1 AND user_id = $2")
            .bind(film_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
        let event_id: i64 = sqlx::query_scalar(
            "INSERT INTO event_feed (event_type, operation, user_id, entity_id, event_timestamp) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING event_id",
        )
        .bind(event.event_type.as_str())
        .bind(event.operation.as_str())
        .bind(event.user_id)
        .bind(event.entity_id)
        .bind(event.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(Event {
            event_id,
            event_type: event.event_type,
            operation: event.operation,
            user_id: event.user_id,
            entity_id: event.entity_id,
            timestamp: event.timestamp,
        })
    }

    async fn events_for_user(&self, user_id: i64) -> AppResult<Vec<Event>> {
        let rows = sqlx::query(
            "SELECT event_id, event_type, operation, user_id, entity_id, event_timestamp \
             FROM event_feed \
             WHERE user_id = $1 \
             ORDER BY event_timestamp ASC, event_id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::map_event).collect()
    }

    async fn film_exists(&self, film_id: i64) -> AppResult<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM films WHERE id = $1)")
            .bind(film_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
