//! Postgres pool construction and schema migrations.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` calls [`init_pool`] once before building the router. The only
//! table is `recipes`; the provider owns users, sessions and image bytes.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

static MIGRATOR: Migrator = sqlx::migrate!("src/db/migrations");

/// Connect to `database_url` with at most `max_connections` pooled
/// connections, then bring the schema up to date.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    MIGRATOR.run(&pool).await?;
    tracing::debug!(migrations = MIGRATOR.iter().count(), "schema up to date");

    Ok(pool)
}
