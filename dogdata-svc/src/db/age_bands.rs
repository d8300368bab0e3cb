//! Age-band record operations, scoped by breed key and gender

use dogdata_common::time;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::breeds::{BreedKey, BreedRepository};
use crate::error::{Error, Result};
use crate::models::{AgeBand, AgeRange, BreedPicture, Gender, Measurements};

const SELECT_COLUMNS: &str = r#"
    SELECT id, breed_name, description, gender, from_age, to_age,
           avg_height_min, avg_height_max, avg_weight_min, avg_weight_max,
           avg_drink, avg_food, pic_url, created_at, updated_at
    FROM age_bands
"#;

fn age_band_from_row(row: &SqliteRow) -> Result<AgeBand> {
    let id_str: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| Error::Internal(format!("Stored id '{}' is not a UUID: {}", id_str, e)))?;

    let gender_str: String = row.try_get("gender")?;
    let gender = gender_str.parse::<Gender>().map_err(Error::Internal)?;

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = time::from_storage(&created_at_str)
        .map_err(|e| Error::Internal(format!("Bad created_at '{}': {}", created_at_str, e)))?;
    let updated_at_str: String = row.try_get("updated_at")?;
    let updated_at = time::from_storage(&updated_at_str)
        .map_err(|e| Error::Internal(format!("Bad updated_at '{}': {}", updated_at_str, e)))?;

    Ok(AgeBand {
        id,
        breed_name: row.try_get("breed_name")?,
        description: row.try_get("description")?,
        gender,
        from_age: row.try_get("from_age")?,
        to_age: row.try_get("to_age")?,
        measurements: Measurements {
            avg_height_min: row.try_get("avg_height_min")?,
            avg_height_max: row.try_get("avg_height_max")?,
            avg_weight_min: row.try_get("avg_weight_min")?,
            avg_weight_max: row.try_get("avg_weight_max")?,
            avg_drink: row.try_get("avg_drink")?,
            avg_food: row.try_get("avg_food")?,
        },
        pic_url: row.try_get("pic_url")?,
        created_at,
        updated_at,
    })
}

fn age_bands_from_rows(rows: &[SqliteRow]) -> Result<Vec<AgeBand>> {
    rows.iter().map(age_band_from_row).collect()
}

impl BreedRepository {
    /// Insert a record, creating its breed collection on first use
    ///
    /// The record takes the collection's display name, so every record of
    /// one breed reports the same spelling.
    pub async fn insert(&self, key: &BreedKey, band: &mut AgeBand) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT OR IGNORE INTO breeds (breed_key, breed_name, created_at) VALUES (?, ?, ?)",
        )
        .bind(key.as_str())
        .bind(&band.breed_name)
        .bind(time::to_storage(&band.created_at))
        .execute(&mut *tx)
        .await?;

        band.breed_name =
            sqlx::query_scalar::<_, String>("SELECT breed_name FROM breeds WHERE breed_key = ?")
                .bind(key.as_str())
                .fetch_one(&mut *tx)
                .await?;

        let m = &band.measurements;
        sqlx::query(
            r#"
            INSERT INTO age_bands (
                id, breed_key, breed_name, description, gender, from_age, to_age,
                avg_height_min, avg_height_max, avg_weight_min, avg_weight_max,
                avg_drink, avg_food, pic_url, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(band.id.to_string())
        .bind(key.as_str())
        .bind(&band.breed_name)
        .bind(&band.description)
        .bind(band.gender.as_str())
        .bind(band.from_age)
        .bind(band.to_age)
        .bind(m.avg_height_min)
        .bind(m.avg_height_max)
        .bind(m.avg_weight_min)
        .bind(m.avg_weight_max)
        .bind(m.avg_drink)
        .bind(m.avg_food)
        .bind(&band.pic_url)
        .bind(time::to_storage(&band.created_at))
        .bind(time::to_storage(&band.updated_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Look up a record by id (primary key, no per-breed scan)
    pub async fn find_by_id(&self, id: &Uuid) -> Result<Option<AgeBand>> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(age_band_from_row).transpose()
    }

    /// Exact match on `(breed, gender, from_age, to_age)`
    pub async fn find_exact(
        &self,
        key: &BreedKey,
        gender: Gender,
        range: &AgeRange,
    ) -> Result<Option<AgeBand>> {
        let sql = format!(
            "{} WHERE breed_key = ? AND gender = ? AND from_age = ? AND to_age = ? LIMIT 1",
            SELECT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(key.as_str())
            .bind(gender.as_str())
            .bind(range.from_age)
            .bind(range.to_age)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(age_band_from_row).transpose()
    }

    /// Band containing `age` (inclusive bounds); lowest `from_age` wins
    pub async fn find_containing(
        &self,
        key: &BreedKey,
        gender: Gender,
        age: f64,
    ) -> Result<Option<AgeBand>> {
        let sql = format!(
            "{} WHERE breed_key = ? AND gender = ? AND from_age <= ? AND to_age >= ? ORDER BY from_age ASC LIMIT 1",
            SELECT_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(key.as_str())
            .bind(gender.as_str())
            .bind(age)
            .bind(age)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(age_band_from_row).transpose()
    }

    /// All intervals in one `(breed, gender)` scope, ordered by `from_age`
    pub async fn find_ranges(&self, key: &BreedKey, gender: Gender) -> Result<Vec<AgeRange>> {
        let rows = sqlx::query_as::<_, (f64, f64)>(
            r#"
            SELECT from_age, to_age
            FROM age_bands
            WHERE breed_key = ? AND gender = ?
            ORDER BY from_age ASC
            "#,
        )
        .bind(key.as_str())
        .bind(gender.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(from_age, to_age)| AgeRange::new(from_age, to_age))
            .collect())
    }

    /// Every record across all breeds
    pub async fn list_all(&self) -> Result<Vec<AgeBand>> {
        let sql = format!(
            "{} ORDER BY breed_key ASC, gender ASC, from_age ASC",
            SELECT_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        age_bands_from_rows(&rows)
    }

    /// Distinct breed name / picture pairs in breed then age order
    pub async fn list_breed_pictures(&self) -> Result<Vec<BreedPicture>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT b.breed_name, a.pic_url
            FROM age_bands a
            JOIN breeds b ON b.breed_key = a.breed_key
            GROUP BY a.breed_key, a.pic_url
            ORDER BY a.breed_key ASC, MIN(a.from_age) ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(breed_name, pic_url)| BreedPicture {
                breed_name,
                pic_url,
            })
            .collect())
    }

    /// Overwrite the mutable columns of an existing record
    ///
    /// Returns `false` when no row has this id.
    pub async fn update(&self, band: &AgeBand) -> Result<bool> {
        let m = &band.measurements;
        let result = sqlx::query(
            r#"
            UPDATE age_bands
            SET description = ?,
                avg_height_min = ?, avg_height_max = ?,
                avg_weight_min = ?, avg_weight_max = ?,
                avg_drink = ?, avg_food = ?,
                pic_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&band.description)
        .bind(m.avg_height_min)
        .bind(m.avg_height_max)
        .bind(m.avg_weight_min)
        .bind(m.avg_weight_max)
        .bind(m.avg_drink)
        .bind(m.avg_food)
        .bind(&band.pic_url)
        .bind(time::to_storage(&band.updated_at))
        .bind(band.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete by id; returns whether a row was removed
    pub async fn delete_by_id(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM age_bands WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete the exact-match record; returns whether a row was removed
    pub async fn delete_exact(
        &self,
        key: &BreedKey,
        gender: Gender,
        range: &AgeRange,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM age_bands
            WHERE id IN (
                SELECT id FROM age_bands
                WHERE breed_key = ? AND gender = ? AND from_age = ? AND to_age = ?
                LIMIT 1
            )
            "#,
        )
        .bind(key.as_str())
        .bind(gender.as_str())
        .bind(range.from_age)
        .bind(range.to_age)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
