use std::sync::Arc;

use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::Value;

use cinerate_api::api::{create_router, AppState};
use cinerate_api::store::{CatalogStore, MemoryCatalogStore};

fn create_test_server(store: Arc<MemoryCatalogStore>) -> TestServer {
    let state = AppState::new(store);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(Arc::new(MemoryCatalogStore::new()));
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_film_by_id_returns_sorted_relations() {
    let store = Arc::new(MemoryCatalogStore::new());
    let drama = store.seed_genre("Drama").await;
    let crime = store.seed_genre("Crime").await;
    let director = store.seed_director("Francis Ford Coppola").await;
    let film = store
        .seed_film(
            "The Godfather",
            "An aging patriarch hands over his empire",
            date(1972, 3, 24),
            175,
            None,
        )
        .await;
    // Tagged out of id order on purpose
    store.tag_genre(film, crime).await;
    store.tag_genre(film, drama).await;
    store.credit_director(film, director).await;

    let server = create_test_server(store);
    let response = server.get(&format!("/films/{film}")).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["title"], "The Godfather");
    let genre_ids: Vec<i64> = body["genres"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_i64().unwrap())
        .collect();
    assert_eq!(genre_ids, vec![drama as i64, crime as i64]);
    assert_eq!(body["directors"][0]["name"], "Francis Ford Coppola");
}

#[tokio::test]
async fn test_film_by_id_missing_is_404() {
    let server = create_test_server(Arc::new(MemoryCatalogStore::new()));
    let response = server.get("/films/12345").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_popular_films_ranking_and_limit() {
    let store = Arc::new(MemoryCatalogStore::new());
    let mut users = Vec::new();
    for _ in 0..5 {
        users.push(store.seed_user().await);
    }

    // Like counts: f1 = 5, f2 = 5, f3 = 3; tie broken by ascending id.
    let f1 = store.seed_film("One", "", date(2000, 1, 1), 90, None).await;
    let f2 = store.seed_film("Two", "", date(2000, 1, 1), 90, None).await;
    let f3 = store.seed_film("Three", "", date(2000, 1, 1), 90, None).await;
    for &user in &users {
        store.add_like(f1, user).await.unwrap();
        store.add_like(f2, user).await.unwrap();
    }
    for &user in &users[..3] {
        store.add_like(f3, user).await.unwrap();
    }

    let server = create_test_server(store);
    let response = server.get("/films/popular?count=2").await;
    response.assert_status_ok();

    let films: Vec<Value> = response.json();
    let ids: Vec<i64> = films.iter().map(|f| f["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![f1, f2]);
}

#[tokio::test]
async fn test_popular_films_genre_and_year_filters() {
    let store = Arc::new(MemoryCatalogStore::new());
    let user = store.seed_user().await;
    let comedy = store.seed_genre("Comedy").await;

    let old = store.seed_film("Old", "", date(1990, 5, 5), 90, None).await;
    let new = store.seed_film("New", "", date(2010, 5, 5), 90, None).await;
    store.tag_genre(old, comedy).await;
    store.tag_genre(new, comedy).await;
    store.add_like(old, user).await.unwrap();

    let server = create_test_server(store);

    let response = server
        .get(&format!("/films/popular?count=10&genreId={comedy}&year=2010"))
        .await;
    response.assert_status_ok();
    let films: Vec<Value> = response.json();
    assert_eq!(films.len(), 1);
    assert_eq!(films[0]["id"].as_i64().unwrap(), new);
}

#[tokio::test]
async fn test_popular_films_rejects_non_positive_count() {
    let server = create_test_server(Arc::new(MemoryCatalogStore::new()));
    let response = server.get("/films/popular?count=0").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_single_neighbor_example() {
    let store = Arc::new(MemoryCatalogStore::new());
    let a = store.seed_user().await;
    let b = store.seed_user().await;
    let c = store.seed_user().await;

    let mut films = Vec::new();
    for title in ["F1", "F2", "F3", "F4"] {
        films.push(store.seed_film(title, "", date(2001, 1, 1), 100, None).await);
    }

    // A likes {1,2,3}; B likes {2,3,4}; C likes {3}.
    for &f in &films[..3] {
        store.add_like(f, a).await.unwrap();
    }
    for &f in &films[1..4] {
        store.add_like(f, b).await.unwrap();
    }
    store.add_like(films[2], c).await.unwrap();

    let server = create_test_server(store);
    let response = server.get(&format!("/users/{a}/recommendations")).await;
    response.assert_status_ok();

    // B wins with overlap 2 over C's 1; the result is B's likes minus A's.
    let recommended: Vec<Value> = response.json();
    let ids: Vec<i64> = recommended
        .iter()
        .map(|f| f["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![films[3]]);
}

#[tokio::test]
async fn test_recommendations_without_likes_is_empty_not_error() {
    let store = Arc::new(MemoryCatalogStore::new());
    let user = store.seed_user().await;

    let server = create_test_server(store);
    let response = server.get(&format!("/users/{user}/recommendations")).await;
    response.assert_status_ok();
    let recommended: Vec<Value> = response.json();
    assert!(recommended.is_empty());
}

#[tokio::test]
async fn test_like_then_feed_shows_the_event() {
    let store = Arc::new(MemoryCatalogStore::new());
    let user = store.seed_user().await;
    let film = store.seed_film("Liked", "", date(2001, 1, 1), 100, None).await;

    let server = create_test_server(store);

    let response = server.put(&format!("/films/{film}/like/{user}")).await;
    response.assert_status_ok();

    let response = server.get(&format!("/users/{user}/feed")).await;
    response.assert_status_ok();
    let events: Vec<Value> = response.json();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["event_type"], "LIKE");
    assert_eq!(events[0]["operation"], "ADD");
    assert_eq!(events[0]["entity_id"].as_i64().unwrap(), film);

    // Unlike appends a second event; descending order puts it first.
    let response = server.delete(&format!("/films/{film}/like/{user}")).await;
    response.assert_status_ok();

    let response = server.get(&format!("/users/{user}/feed?order=desc")).await;
    response.assert_status_ok();
    let events: Vec<Value> = response.json();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["operation"], "REMOVE");
}

#[tokio::test]
async fn test_like_unknown_film_or_user_is_404() {
    let store = Arc::new(MemoryCatalogStore::new());
    let user = store.seed_user().await;
    let film = store.seed_film("Only", "", date(2001, 1, 1), 100, None).await;

    let server = create_test_server(store);

    let response = server.put(&format!("/films/999/like/{user}")).await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);

    let response = server.put(&format!("/films/{film}/like/999")).await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feed_for_unknown_user_is_404() {
    let server = create_test_server(Arc::new(MemoryCatalogStore::new()));
    let response = server.get("/users/31337/feed").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}
