//! Business services: overlap checking and the record lifecycle

pub mod lifecycle;
pub mod overlap;

pub use lifecycle::{AgeBandService, LifecycleSettings};
pub use overlap::{OverlapChecker, OverlapPolicy};
