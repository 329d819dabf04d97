//! Data layer
//!
//! Warehouse access and the unified data error type.

pub mod error;
pub mod warehouse;

pub use error::DataError;
pub use warehouse::{SaveOutcome, WarehouseService};
