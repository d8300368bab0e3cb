//! Age-band record lifecycle
//!
//! Orchestrates validation, overlap checking and persistence. Each
//! operation is independent; no state is kept between calls beyond what
//! the repository stores.
//!
//! Known race: `create` checks for overlap and then inserts without a lock
//! or transaction spanning both steps. Two concurrent creates for the same
//! breed and gender with overlapping ranges can both pass the check and
//! both be stored. A uniqueness constraint or per-breed write lock would
//! close it; neither is applied here.

use dogdata_common::{record_id, time};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::BreedRepository;
use crate::error::{Error, Result};
use crate::models::{AgeBand, AgeRange, BreedPicture, Gender};
use crate::services::overlap::{OverlapChecker, OverlapPolicy};
use crate::validators;

/// Behaviour switches for the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSettings {
    /// Boundary rule used by `create`
    pub overlap_policy: OverlapPolicy,
    /// Re-run measurement ordering checks on the merged record in `update`
    pub revalidate_updates: bool,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::Inclusive,
            revalidate_updates: true,
        }
    }
}

/// Record lifecycle service
#[derive(Clone)]
pub struct AgeBandService {
    repo: BreedRepository,
    overlap: OverlapChecker,
    revalidate_updates: bool,
}

fn parse_id(id: &str) -> Result<Uuid> {
    record_id::parse(id).ok_or_else(|| Error::NotFound("Dog data not found".to_string()))
}

impl AgeBandService {
    pub fn new(repo: BreedRepository, settings: LifecycleSettings) -> Self {
        Self {
            repo,
            overlap: OverlapChecker::new(settings.overlap_policy),
            revalidate_updates: settings.revalidate_updates,
        }
    }

    pub fn repository(&self) -> &BreedRepository {
        &self.repo
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap.policy()
    }

    /// Validate, check overlap, assign id and timestamps, insert
    pub async fn create(&self, raw: &Map<String, Value>) -> Result<AgeBand> {
        self.repo.ensure_available()?;

        let new_band = validators::validate_new(raw).map_err(|e| {
            debug!("Rejected create payload: {}", e);
            e
        })?;
        let key = BreedRepository::resolve(&new_band.breed_name);

        if let Err(e) = self
            .overlap
            .check(
                &self.repo,
                &key,
                &new_band.breed_name,
                new_band.gender,
                &new_band.range,
            )
            .await
        {
            warn!("{}", e);
            return Err(e);
        }

        let mut record = new_band.into_record(record_id::generate(), time::now());
        self.repo.insert(&key, &mut record).await?;

        info!(
            "Created age band {} for {}/{} {}",
            record.id,
            record.breed_name,
            record.gender,
            record.range()
        );
        Ok(record)
    }

    /// Read by identifier
    pub async fn get_by_id(&self, id: &str) -> Result<AgeBand> {
        self.repo.ensure_available()?;
        let id = parse_id(id)?;

        self.repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| Error::NotFound("Dog data not found".to_string()))
    }

    /// Read by breed, gender and exact interval
    pub async fn get_by_range(
        &self,
        breed_name: &str,
        gender: Gender,
        range: &AgeRange,
    ) -> Result<AgeBand> {
        self.repo.ensure_available()?;
        let key = BreedRepository::resolve(breed_name);

        self.repo
            .find_exact(&key, gender, range)
            .await?
            .ok_or_else(|| not_found_for_range(breed_name, gender, range))
    }

    /// Read the band containing `age` (inclusive bounds)
    pub async fn get_by_age(&self, breed_name: &str, gender: Gender, age: f64) -> Result<AgeBand> {
        self.repo.ensure_available()?;
        let key = BreedRepository::resolve(breed_name);

        self.repo
            .find_containing(&key, gender, age)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No data found for breed '{}' ({}) at age {}",
                    breed_name, gender, age
                ))
            })
    }

    pub async fn list_breeds(&self) -> Result<Vec<String>> {
        self.repo.ensure_available()?;
        self.repo.list_breeds().await
    }

    pub async fn list_all(&self) -> Result<Vec<AgeBand>> {
        self.repo.ensure_available()?;
        self.repo.list_all().await
    }

    pub async fn list_breed_pictures(&self) -> Result<Vec<BreedPicture>> {
        self.repo.ensure_available()?;
        self.repo.list_breed_pictures().await
    }

    /// Partial update of the exact-match record
    ///
    /// Supplied fields overwrite stored ones (numbers rounded to two
    /// decimals) and `updated_at` is always refreshed. The overlap check is
    /// not re-run: the interval is part of the lookup key and cannot change.
    /// Measurement ordering is re-checked on the merged record when
    /// `revalidate_updates` is on.
    pub async fn update(
        &self,
        breed_name: &str,
        gender: Gender,
        range: &AgeRange,
        raw: &Map<String, Value>,
    ) -> Result<AgeBand> {
        self.repo.ensure_available()?;

        let patch = validators::validate_patch(raw)?;
        let key = BreedRepository::resolve(breed_name);

        let mut band = self
            .repo
            .find_exact(&key, gender, range)
            .await?
            .ok_or_else(|| not_found_for_range(breed_name, gender, range))?;

        patch.apply(&mut band, time::now());

        if self.revalidate_updates {
            validators::check_measurements(&band.measurements)?;
        }

        if !self.repo.update(&band).await? {
            // Deleted between the lookup and the write
            return Err(not_found_for_range(breed_name, gender, range));
        }

        info!("Updated age band {} for {}/{} {}", band.id, band.breed_name, gender, range);
        Ok(band)
    }

    /// Delete by identifier
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.repo.ensure_available()?;
        let id = parse_id(id)?;

        if !self.repo.delete_by_id(&id).await? {
            return Err(Error::NotFound("Dog data not found".to_string()));
        }

        info!("Deleted age band {}", id);
        Ok(())
    }

    /// Delete by breed, gender and exact interval
    pub async fn delete_by_range(
        &self,
        breed_name: &str,
        gender: Gender,
        range: &AgeRange,
    ) -> Result<()> {
        self.repo.ensure_available()?;
        let key = BreedRepository::resolve(breed_name);

        if !self.repo.delete_exact(&key, gender, range).await? {
            return Err(not_found_for_range(breed_name, gender, range));
        }

        info!("Deleted age band {}/{} {}", breed_name, gender, range);
        Ok(())
    }

    /// Drop every breed collection; returns how many were removed
    pub async fn delete_all(&self) -> Result<u64> {
        self.repo.ensure_available()?;
        self.repo.drop_all().await
    }
}

fn not_found_for_range(breed_name: &str, gender: Gender, range: &AgeRange) -> Error {
    Error::NotFound(format!(
        "No data found for breed '{}' ({}) and age range {}",
        breed_name, gender, range
    ))
}
