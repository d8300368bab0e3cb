//! Input validation for age-band payloads and path parameters

pub mod age_band;

pub use age_band::{
    check_measurements, check_ordering, parse_age, parse_gender, parse_number, round2, validate_new, validate_patch,
    REQUIRED_FIELDS,
};
