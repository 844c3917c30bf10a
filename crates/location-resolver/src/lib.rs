//! Address to property profile lookup
//!
//! A [`LocationResolver`] turns a street address into the council (LGA),
//! planning zone and overlay activations the approval engine needs. Lookups
//! never fail outright: anything that cannot be resolved comes back as
//! [`PropertyProfile::fallback`] tagged `Defaulted`.

pub mod arcgis;
pub mod config;
pub mod error;
pub mod fixtures;

pub use arcgis::{GeocodedAddress, QldSpatialResolver};
pub use config::{ConfigError, QldSpatialConfig};
pub use error::ResolverError;
pub use fixtures::StaticResolver;

use async_trait::async_trait;
use shared_types::{PropertyProfile, Resolved};

/// Converts an address into a property profile
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, address: &str) -> Resolved<PropertyProfile>;
}
