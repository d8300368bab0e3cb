//! Storage access for dogdata-svc
//!
//! `BreedRepository` is the only component that issues SQL. It owns a
//! cloned pool handle and is passed explicitly to the lifecycle service.

pub mod age_bands;
pub mod breeds;

pub use breeds::{BreedKey, BreedRepository};
