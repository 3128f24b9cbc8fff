//! HTTP API handlers for compest-es

pub mod estimate;
pub mod health;

pub use estimate::estimate_routes;
pub use health::health_routes;
