//! Curry Company delivery marketplace dashboard.
//!
//! Reads the food-delivery order CSV, cleans and filters it, and derives the
//! aggregate tables behind the company, couriers and restaurants pages.

pub mod aggregate;
pub mod api;
pub mod cleaning;
pub mod config;
pub mod distance;
pub mod error;
pub mod filter;
pub mod models;
pub mod pages;
pub mod pipeline;
pub mod source;

#[cfg(test)]
mod fixtures;

pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use filter::FilterParams;
pub use models::{OrderRecord, RawOrderRecord};
pub use pages::{Page, PageKind};
pub use pipeline::Pipeline;
