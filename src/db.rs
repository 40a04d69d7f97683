use sqlx::{postgres::PgPoolOptions, PgPool};

/// Opens the PostgreSQL connection pool backing the library store.
///
/// Sized for a single-instance deployment; the pool manages connection
/// lifecycle and reuse on its own.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    Ok(pool)
}
