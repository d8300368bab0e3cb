//! HTTP API handlers for dogdata-svc

pub mod dogs_data;
pub mod health;

pub use dogs_data::dogs_data_routes;
pub use health::health_routes;
