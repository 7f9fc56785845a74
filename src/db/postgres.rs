use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates the PostgreSQL connection pool backing the catalog store.
///
/// One pool is shared by every request handler; sizing stays small because
/// each request issues only a handful of short, read-mostly queries.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    Ok(pool)
}
