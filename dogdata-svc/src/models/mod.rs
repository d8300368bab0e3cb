//! Domain models for age-band reference records

pub mod age_band;

pub use age_band::{
    AgeBand, AgeBandPatch, AgeRange, BreedPicture, Gender, Measurements, NewAgeBand,
};
