use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{Event, EventOperation, EventType, Film};
use crate::services::FeedOrder;

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(rename = "genreId")]
    pub genre_id: Option<i32>,
    pub year: Option<i32>,
}

fn default_count() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub order: FeedOrder,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Top films by like count, optionally filtered by genre and release year
pub async fn popular_films(
    State(state): State<AppState>,
    Query(params): Query<PopularQuery>,
) -> AppResult<Json<Vec<Film>>> {
    let films = state
        .ranker
        .rank(params.count, params.genre_id, params.year)
        .await?;
    Ok(Json(films))
}

/// Single film aggregate by id
pub async fn film_by_id(
    State(state): State<AppState>,
    Path(film_id): Path<i64>,
) -> AppResult<Json<Film>> {
    let row = state
        .store
        .film_row(film_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("film with id {film_id} does not exist")))?;
    let film = state.aggregator.hydrate(row).await?;
    Ok(Json(film))
}

/// Personalized film suggestions for a user
pub async fn recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Film>>> {
    let films = state.recommender.recommend(user_id).await?;
    Ok(Json(films))
}

/// A user's activity feed, oldest first unless `order=desc`
pub async fn user_feed(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<FeedQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let events = state.feed.feed_for(user_id, params.order).await?;
    Ok(Json(events))
}

/// Records that a user liked a film, then appends a LIKE/ADD feed event
pub async fn like_film(
    State(state): State<AppState>,
    Path((film_id, user_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    ensure_film_and_user(&state, film_id, user_id).await?;
    state.store.add_like(film_id, user_id).await?;
    state
        .feed
        .record(user_id, film_id, EventType::Like, EventOperation::Add)
        .await;
    tracing::info!(film_id, user_id, "Like added");
    Ok(StatusCode::OK)
}

/// Removes a user's like from a film, then appends a LIKE/REMOVE feed event
pub async fn unlike_film(
    State(state): State<AppState>,
    Path((film_id, user_id)): Path<(i64, i64)>,
) -> AppResult<StatusCode> {
    ensure_film_and_user(&state, film_id, user_id).await?;
    state.store.remove_like(film_id, user_id).await?;
    state
        .feed
        .record(user_id, film_id, EventType::Like, EventOperation::Remove)
        .await;
    tracing::info!(film_id, user_id, "Like removed");
    Ok(StatusCode::OK)
}

async fn ensure_film_and_user(state: &AppState, film_id: i64, user_id: i64) -> AppResult<()> {
    if !state.store.film_exists(film_id).await? {
        return Err(AppError::NotFound(format!(
            "film with id {film_id} does not exist"
        )));
    }
    if !state.store.user_exists(user_id).await? {
        return Err(AppError::NotFound(format!(
            "user with id {user_id} does not exist"
        )));
    }
    Ok(())
}
