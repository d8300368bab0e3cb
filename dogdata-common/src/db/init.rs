//! Database initialization
//!
//! Creates the SQLite store on first run and applies the schema
//! idempotently on every start.
//!
//! Layout: one `breeds` row per breed collection plus a single `age_bands`
//! table keyed by record id, with a composite index on
//! `(breed_key, gender, from_age)` for scoped lookups.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Busy timeout applied to every connection (milliseconds)
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers alongside the single writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    apply_connection_pragmas(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Initialize a private in-memory database (single connection)
///
/// Each SQLite `:memory:` connection is its own database, so the pool is
/// pinned to one connection that never idles out.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    apply_connection_pragmas(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

async fn apply_connection_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    let pragma_sql = format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS);
    sqlx::query(&pragma_sql).execute(pool).await?;

    Ok(())
}

/// Create all tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_breeds_table(pool).await?;
    create_age_bands_table(pool).await?;
    Ok(())
}

async fn create_breeds_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS breeds (
            breed_key TEXT PRIMARY KEY,
            breed_name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_age_bands_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS age_bands (
            id TEXT PRIMARY KEY,
            breed_key TEXT NOT NULL REFERENCES breeds(breed_key) ON DELETE CASCADE,
            breed_name TEXT NOT NULL,
            description TEXT,
            gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
            from_age REAL NOT NULL,
            to_age REAL NOT NULL,
            avg_height_min REAL NOT NULL,
            avg_height_max REAL NOT NULL,
            avg_weight_min REAL NOT NULL,
            avg_weight_max REAL NOT NULL,
            avg_drink REAL NOT NULL,
            avg_food REAL NOT NULL,
            pic_url TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_age_bands_breed_gender_from
        ON age_bands (breed_key, gender, from_age)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
