//! Breed collections
//!
//! A breed name resolves to a `BreedKey` (trimmed, lowercased). All records
//! with the same key form one logical collection. A collection exists from
//! its first insert until `drop_all`.

use sqlx::SqlitePool;
use std::fmt;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Normalized breed identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreedKey(String);

impl BreedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BreedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository over the breed-partitioned age-band store
#[derive(Clone)]
pub struct BreedRepository {
    pub(crate) pool: SqlitePool,
}

impl BreedRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Pool handle (health checks)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fail fast when the store has been shut down
    pub fn ensure_available(&self) -> Result<()> {
        if self.pool.is_closed() {
            return Err(Error::DependencyUnavailable(
                "connection pool is closed".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve a breed name to its collection key
    ///
    /// Deterministic and case-insensitive: `" Poodle"` and `"poodle"`
    /// resolve to the same key.
    pub fn resolve(breed_name: &str) -> BreedKey {
        BreedKey(breed_name.trim().to_lowercase())
    }

    /// Names of all known breed collections, ordered by key
    pub async fn list_breeds(&self) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT breed_name FROM breeds ORDER BY breed_key ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("Listed {} breed collections", names.len());
        Ok(names)
    }

    /// Remove every record of every breed; returns the number of breeds dropped
    pub async fn drop_all(&self) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM age_bands")
            .execute(&mut *tx)
            .await?;
        let dropped = sqlx::query("DELETE FROM breeds")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        info!("Dropped {} breed collections", dropped);
        Ok(dropped)
    }
}
