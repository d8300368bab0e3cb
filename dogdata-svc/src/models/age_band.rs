//! Age-band record model
//!
//! An `AgeBand` holds one breed's reference statistics for one gender and
//! one closed age interval `[from_age, to_age]`. For a fixed
//! `(breed, gender)` the intervals of all stored bands never overlap under
//! the configured overlap policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Gender scope of an age band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Storage / wire literal
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    /// Accepts exactly `male` or `female`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!(
                "Invalid gender '{}': expected 'male' or 'female'",
                other
            )),
        }
    }
}

/// Closed age interval, two-decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeRange {
    pub from_age: f64,
    pub to_age: f64,
}

impl AgeRange {
    pub fn new(from_age: f64, to_age: f64) -> Self {
        Self { from_age, to_age }
    }

    /// Point containment, inclusive at both ends
    pub fn contains(&self, age: f64) -> bool {
        self.from_age <= age && age <= self.to_age
    }
}

impl fmt::Display for AgeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.from_age, self.to_age)
    }
}

/// Physical and dietary averages carried by every band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub avg_height_min: f64,
    pub avg_height_max: f64,
    pub avg_weight_min: f64,
    pub avg_weight_max: f64,
    pub avg_drink: f64,
    pub avg_food: f64,
}

/// Stored age-band record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    pub id: Uuid,
    pub breed_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub gender: Gender,
    pub from_age: f64,
    pub to_age: f64,
    #[serde(flatten)]
    pub measurements: Measurements,
    pub pic_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgeBand {
    pub fn range(&self) -> AgeRange {
        AgeRange::new(self.from_age, self.to_age)
    }
}

/// Validated creation payload (id and timestamps not yet assigned)
#[derive(Debug, Clone, PartialEq)]
pub struct NewAgeBand {
    pub breed_name: String,
    pub description: Option<String>,
    pub gender: Gender,
    pub range: AgeRange,
    pub measurements: Measurements,
    pub pic_url: String,
}

impl NewAgeBand {
    /// Assign identity and timestamps
    pub fn into_record(self, id: Uuid, now: DateTime<Utc>) -> AgeBand {
        AgeBand {
            id,
            breed_name: self.breed_name,
            description: self.description,
            gender: self.gender,
            from_age: self.range.from_age,
            to_age: self.range.to_age,
            measurements: self.measurements,
            pic_url: self.pic_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update; `None` leaves the stored value unchanged
///
/// Breed, gender and the age interval are the lookup key and cannot be
/// patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgeBandPatch {
    pub description: Option<String>,
    pub avg_height_min: Option<f64>,
    pub avg_height_max: Option<f64>,
    pub avg_weight_min: Option<f64>,
    pub avg_weight_max: Option<f64>,
    pub avg_drink: Option<f64>,
    pub avg_food: Option<f64>,
    pub pic_url: Option<String>,
}

impl AgeBandPatch {
    /// Overwrite supplied fields and refresh `updated_at`
    pub fn apply(&self, band: &mut AgeBand, now: DateTime<Utc>) {
        if let Some(description) = &self.description {
            band.description = Some(description.clone());
        }

        let m = &mut band.measurements;
        for (slot, value) in [
            (&mut m.avg_height_min, self.avg_height_min),
            (&mut m.avg_height_max, self.avg_height_max),
            (&mut m.avg_weight_min, self.avg_weight_min),
            (&mut m.avg_weight_max, self.avg_weight_max),
            (&mut m.avg_drink, self.avg_drink),
            (&mut m.avg_food, self.avg_food),
        ] {
            if let Some(v) = value {
                *slot = v;
            }
        }

        if let Some(pic_url) = &self.pic_url {
            band.pic_url = pic_url.clone();
        }

        band.updated_at = now;
    }
}

/// Breed name and picture URL pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreedPicture {
    pub breed_name: String,
    pub pic_url: String,
}
