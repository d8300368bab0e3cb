//! Age-band validator
//!
//! Pure functions from raw JSON field maps (or path segments) to normalized
//! model values. Checks run in this order: required-field presence,
//! numeric parsing with two-decimal rounding, gender literal, then range
//! ordering.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::models::{AgeBandPatch, AgeRange, Gender, Measurements, NewAgeBand};

/// Fields every creation payload must carry
pub const REQUIRED_FIELDS: [&str; 11] = [
    "breed_name",
    "gender",
    "from_age",
    "to_age",
    "avg_height_min",
    "avg_height_max",
    "avg_weight_min",
    "avg_weight_max",
    "avg_drink",
    "avg_food",
    "pic_url",
];

/// Round half away from zero to two decimal places
///
/// Magnitudes too large to scale by 100 carry no fractional part and are
/// returned unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}

/// Parse a numeric field given as a JSON number or numeric string
pub fn parse_number(field: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed.filter(|v| v.is_finite()).map(round2) {
        Some(v) => Ok(v),
        _ => Err(Error::Validation(format!(
            "Invalid number format for '{}'",
            field
        ))),
    }
}

/// Parse an age taken from a URL path segment
pub fn parse_age(field: &str, raw: &str) -> Result<f64> {
    parse_number(field, &Value::String(raw.to_string()))
}

/// Parse a gender literal
pub fn parse_gender(raw: &str) -> Result<Gender> {
    raw.parse::<Gender>().map_err(Error::Validation)
}

/// Reject `lower > upper`, naming the offending pair
pub fn check_ordering(lower_name: &str, lower: f64, upper_name: &str, upper: f64) -> Result<()> {
    if lower > upper {
        return Err(Error::Validation(format!(
            "'{}' must not be greater than '{}'",
            lower_name, upper_name
        )));
    }
    Ok(())
}

/// Ordering invariants on the ranged measurements
pub fn check_measurements(m: &Measurements) -> Result<()> {
    check_ordering("avg_height_min", m.avg_height_min, "avg_height_max", m.avg_height_max)?;
    check_ordering("avg_weight_min", m.avg_weight_min, "avg_weight_max", m.avg_weight_max)?;
    Ok(())
}

fn required_string(raw: &Map<String, Value>, field: &str) -> Result<String> {
    match raw.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(Error::Validation(format!("'{}' must be a string", field))),
    }
}

fn optional_string(raw: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::Validation(format!("'{}' must be a string", field))),
    }
}

fn optional_number(raw: &Map<String, Value>, field: &str) -> Result<Option<f64>> {
    raw.get(field).map(|v| parse_number(field, v)).transpose()
}

fn number(raw: &Map<String, Value>, field: &str) -> Result<f64> {
    // presence already checked
    parse_number(field, raw.get(field).unwrap_or(&Value::Null))
}

/// Validate and normalize a creation payload
pub fn validate_new(raw: &Map<String, Value>) -> Result<NewAgeBand> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| raw.get(*field).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(Error::Validation(format!(
            "Missing required field(s): {}",
            missing.join(", ")
        )));
    }

    let range = AgeRange::new(number(raw, "from_age")?, number(raw, "to_age")?);
    let measurements = Measurements {
        avg_height_min: number(raw, "avg_height_min")?,
        avg_height_max: number(raw, "avg_height_max")?,
        avg_weight_min: number(raw, "avg_weight_min")?,
        avg_weight_max: number(raw, "avg_weight_max")?,
        avg_drink: number(raw, "avg_drink")?,
        avg_food: number(raw, "avg_food")?,
    };

    let breed_name = required_string(raw, "breed_name")?.trim().to_string();
    if breed_name.is_empty() {
        return Err(Error::Validation("'breed_name' must not be empty".to_string()));
    }
    let gender = parse_gender(&required_string(raw, "gender")?)?;
    let pic_url = required_string(raw, "pic_url")?;
    let description = optional_string(raw, "description")?;

    check_ordering("from_age", range.from_age, "to_age", range.to_age)?;
    check_measurements(&measurements)?;

    Ok(NewAgeBand {
        breed_name,
        description,
        gender,
        range,
        measurements,
        pic_url,
    })
}

/// Parse an update payload; only patchable fields are read
///
/// Ordering is not checked here: it depends on the stored values the
/// patch is merged into.
pub fn validate_patch(raw: &Map<String, Value>) -> Result<AgeBandPatch> {
    Ok(AgeBandPatch {
        description: optional_string(raw, "description")?,
        avg_height_min: optional_number(raw, "avg_height_min")?,
        avg_height_max: optional_number(raw, "avg_height_max")?,
        avg_weight_min: optional_number(raw, "avg_weight_min")?,
        avg_weight_max: optional_number(raw, "avg_weight_max")?,
        avg_drink: optional_number(raw, "avg_drink")?,
        avg_food: optional_number(raw, "avg_food")?,
        pic_url: optional_string(raw, "pic_url")?,
    })
}
