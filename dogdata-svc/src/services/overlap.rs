//! Overlap checking for age intervals
//!
//! Two boundary policies exist and are selected by configuration:
//!
//! | policy      | conflict when                                          |
//! |-------------|--------------------------------------------------------|
//! | `inclusive` | `existing.from <= cand.to && existing.to >= cand.from` |
//! | `strict`    | `existing.from <  cand.to && existing.to >  cand.from` |
//!
//! Under `inclusive`, `[0, 2]` and `[2, 4]` conflict; under `strict` they
//! do not.
//!
//! The check reads current state only. Nothing is locked between the check
//! and the insert that follows it.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::db::{BreedKey, BreedRepository};
use crate::error::{Error, Result};
use crate::models::{AgeRange, Gender};

/// Boundary rule deciding whether two intervals conflict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Touching endpoints count as overlap
    #[default]
    Inclusive,
    /// Touching endpoints do not count as overlap
    Strict,
}

impl OverlapPolicy {
    pub fn conflicts(self, existing: &AgeRange, candidate: &AgeRange) -> bool {
        match self {
            OverlapPolicy::Inclusive => {
                existing.from_age <= candidate.to_age && existing.to_age >= candidate.from_age
            }
            OverlapPolicy::Strict => {
                existing.from_age < candidate.to_age && existing.to_age > candidate.from_age
            }
        }
    }
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Inclusive => f.write_str("inclusive"),
            OverlapPolicy::Strict => f.write_str("strict"),
        }
    }
}

/// Decides whether a candidate interval collides with stored ones
#[derive(Debug, Clone, Copy)]
pub struct OverlapChecker {
    policy: OverlapPolicy,
}

impl OverlapChecker {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// First existing interval that conflicts with `candidate`
    pub fn find_conflict<'a>(
        &self,
        existing: &'a [AgeRange],
        candidate: &AgeRange,
    ) -> Option<&'a AgeRange> {
        existing
            .iter()
            .find(|range| self.policy.conflicts(range, candidate))
    }

    /// Check `candidate` against the `(breed, gender)` scope in storage
    pub async fn check(
        &self,
        repo: &BreedRepository,
        key: &BreedKey,
        breed_name: &str,
        gender: Gender,
        candidate: &AgeRange,
    ) -> Result<()> {
        let existing = repo.find_ranges(key, gender).await?;

        if let Some(conflict) = self.find_conflict(&existing, candidate) {
            return Err(Error::OverlapConflict {
                breed: breed_name.to_string(),
                gender,
                existing: *conflict,
                candidate: *candidate,
            });
        }

        debug!(
            "No {} overlap for {} in {}/{} ({} existing bands)",
            self.policy,
            candidate,
            key,
            gender,
            existing.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(from_age: f64, to_age: f64) -> AgeRange {
        AgeRange::new(from_age, to_age)
    }

    #[test]
    fn test_default_policy_is_inclusive() {
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::Inclusive);
    }

    #[test]
    fn test_touching_endpoints() {
        assert!(OverlapPolicy::Inclusive.conflicts(&r(0.0, 2.0), &r(2.0, 4.0)));
        assert!(!OverlapPolicy::Strict.conflicts(&r(0.0, 2.0), &r(2.0, 4.0)));
        assert!(OverlapPolicy::Inclusive.conflicts(&r(2.0, 4.0), &r(0.0, 2.0)));
        assert!(!OverlapPolicy::Strict.conflicts(&r(2.0, 4.0), &r(0.0, 2.0)));
    }

    #[test]
    fn test_proper_overlap_conflicts_under_both() {
        for policy in [OverlapPolicy::Inclusive, OverlapPolicy::Strict] {
            assert!(policy.conflicts(&r(0.0, 2.0), &r(1.0, 3.0)));
            assert!(policy.conflicts(&r(0.0, 10.0), &r(2.0, 3.0)), "containment");
            assert!(policy.conflicts(&r(2.0, 3.0), &r(0.0, 10.0)), "enclosing");
        }
    }

    #[test]
    fn test_disjoint_never_conflicts() {
        for policy in [OverlapPolicy::Inclusive, OverlapPolicy::Strict] {
            assert!(!policy.conflicts(&r(0.0, 2.0), &r(2.01, 4.0)));
            assert!(!policy.conflicts(&r(5.0, 6.0), &r(0.0, 4.99)));
        }
    }

    #[test]
    fn test_zero_width_intervals() {
        // A point on an endpoint
        assert!(OverlapPolicy::Inclusive.conflicts(&r(0.0, 2.0), &r(2.0, 2.0)));
        assert!(!OverlapPolicy::Strict.conflicts(&r(0.0, 2.0), &r(2.0, 2.0)));
        // A point strictly inside
        assert!(OverlapPolicy::Strict.conflicts(&r(0.0, 2.0), &r(1.0, 1.0)));
    }

    #[test]
    fn test_policy_serde_uses_lowercase_names() {
        let strict: OverlapPolicy = serde_json::from_value(serde_json::json!("strict")).unwrap();
        assert_eq!(strict, OverlapPolicy::Strict);
        assert_eq!(
            serde_json::to_value(OverlapPolicy::Inclusive).unwrap(),
            serde_json::json!("inclusive")
        );
        assert!(serde_json::from_value::<OverlapPolicy>(serde_json::json!("loose")).is_err());
    }

    #[test]
    fn test_find_conflict_returns_first_hit() {
        let checker = OverlapChecker::new(OverlapPolicy::Inclusive);
        let existing = [r(0.0, 2.0), r(3.0, 5.0), r(6.0, 8.0)];
        assert_eq!(checker.find_conflict(&existing, &r(4.0, 7.0)), Some(&r(3.0, 5.0)));
        assert_eq!(checker.find_conflict(&existing, &r(2.5, 2.9)), None);
    }

    #[tokio::test]
    async fn test_check_is_scoped_by_gender() {
        use crate::models::{Measurements, NewAgeBand};

        let pool = dogdata_common::db::init_memory_database().await.unwrap();
        let repo = BreedRepository::new(pool);
        let key = BreedRepository::resolve("Poodle");
        let mut band = NewAgeBand {
            breed_name: "Poodle".into(),
            description: None,
            gender: Gender::Male,
            range: r(0.0, 2.0),
            measurements: Measurements {
                avg_height_min: 1.0,
                avg_height_max: 1.0,
                avg_weight_min: 1.0,
                avg_weight_max: 1.0,
                avg_drink: 1.0,
                avg_food: 1.0,
            },
            pic_url: "x".into(),
        }
        .into_record(uuid::Uuid::new_v4(), dogdata_common::time::now());
        repo.insert(&key, &mut band).await.unwrap();

        let checker = OverlapChecker::new(OverlapPolicy::Inclusive);
        let err = checker
            .check(&repo, &key, "Poodle", Gender::Male, &r(1.0, 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OverlapConflict { .. }));

        checker
            .check(&repo, &key, "Poodle", Gender::Female, &r(1.0, 3.0))
            .await
            .unwrap();
    }
}
