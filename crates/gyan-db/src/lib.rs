//! Persistence boundary for adaptive profiles.
//!
//! Startup order is [`ensure_database`], then [`create_pool`], then
//! [`migrate`]: the pool cannot connect to a database that does not exist yet.

pub mod models;
pub mod repositories;

use anyhow::Context;
use sqlx::{PgPool, Postgres, migrate::MigrateDatabase, postgres::PgPoolOptions};

/// Create the database named in `database_url` when the server lacks it.
///
/// Returns `true` when the database was created.
pub async fn ensure_database(database_url: &str) -> anyhow::Result<bool> {
    let exists = Postgres::database_exists(database_url)
        .await
        .context("failed to check whether the database exists")?;
    if exists {
        return Ok(false);
    }

    Postgres::create_database(database_url)
        .await
        .context("failed to create database")?;
    Ok(true)
}

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to database")
}

/// Apply the migrations bundled from this crate's `migrations/` folder.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!()
        .run(pool)
        .await
        .context("failed to run adaptive profile migrations")
}

/// Full bootstrap: create the database if needed, connect, migrate.
pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<PgPool> {
    ensure_database(database_url).await?;
    let pool = create_pool(database_url, max_connections).await?;
    migrate(&pool).await?;
    Ok(pool)
}
