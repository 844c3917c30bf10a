//! Queensland spatial services (ArcGIS REST) client
//!
//! ## Services
//! | Lookup | Service path (under the configured folder) |
//! |--------|---------------------------------------------|
//! | Address | `LandParcelPropertyFramework/MapServer/0/query` |
//! | Zone | `QldPlanningScheme/MapServer/query` |
//! | Flood Hazard | `SPP_FloodHazard/MapServer/query` |
//! | Bushfire Risk | `SPP_BushfireHazard/MapServer/query` |
//! | Heritage | `QldHeritage/MapServer/query` |
//! | Environmental Significance | `SPP_MSES/MapServer/query` |
//! | Waterway Corridor | `WaterResourceCatchments/MapServer/query` |
//! | Landslide Hazard | `SPP_LandslideHazard/MapServer/query` |
//!
//! The address lookup is an attribute query; everything else is a point
//! query at the geocoded WGS84 coordinates. An overlay is active when its
//! service returns at least one feature at that point.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use shared_types::{OverlayKind, OverlaySet, PropertyProfile, Resolved, Zone};
use url::Url;

use crate::config::QldSpatialConfig;
use crate::error::ResolverError;
use crate::LocationResolver;

pub const ADDRESS_SERVICE: &str = "LandParcelPropertyFramework/MapServer/0/query";
pub const PLANNING_SCHEME_SERVICE: &str = "QldPlanningScheme/MapServer/query";

/// Map service queried for one overlay
pub fn overlay_service(kind: OverlayKind) -> &'static str {
    match kind {
        OverlayKind::FloodHazard => "SPP_FloodHazard/MapServer/query",
        OverlayKind::BushfireRisk => "SPP_BushfireHazard/MapServer/query",
        OverlayKind::Heritage => "QldHeritage/MapServer/query",
        OverlayKind::EnvironmentalSignificance => "SPP_MSES/MapServer/query",
        OverlayKind::WaterwayCorridor => "WaterResourceCatchments/MapServer/query",
        OverlayKind::LandslideHazard => "SPP_LandslideHazard/MapServer/query",
    }
}

// -- ArcGIS response shapes --------------------------------------------------

#[derive(Debug, Deserialize)]
struct FeatureSet<F> {
    #[serde(default = "Vec::new")]
    features: Vec<F>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Feature<A> {
    attributes: A,
}

#[derive(Debug, Deserialize)]
struct AddressAttributes {
    #[serde(rename = "ADDRESS", default)]
    address: Option<String>,
    #[serde(rename = "LATITUDE", default)]
    latitude: Option<f64>,
    #[serde(rename = "LONGITUDE", default)]
    longitude: Option<f64>,
    #[serde(rename = "LOT_PLAN", default)]
    lot_plan: Option<String>,
    #[serde(rename = "LGA_NAME", default)]
    lga_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ZoneAttributes {
    #[serde(rename = "ZONE_CODE", default)]
    zone_code: Option<String>,
    #[serde(rename = "ZONE_DESCRIPTION", default)]
    zone_description: Option<String>,
    #[serde(rename = "PLANNING_SCHEME_NAME", default)]
    planning_scheme: Option<String>,
}

/// First property-address match for a search string
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedAddress {
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub lot_plan: Option<String>,
    /// Local government area, e.g. "BRISBANE CITY"
    pub lga_name: Option<String>,
}

impl GeocodedAddress {
    /// `x,y` point geometry (longitude first)
    fn point(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }
}

/// `where` clause for a prefix match on the address field
fn address_clause(address: &str) -> String {
    format!("ADDRESS like '{}%'", address.trim().replace('\'', "''"))
}

fn point_query(location: &GeocodedAddress, out_fields: &str) -> Vec<(&'static str, String)> {
    vec![
        ("geometry", location.point()),
        ("geometryType", "esriGeometryPoint".to_string()),
        ("inSR", "4326".to_string()),
        ("outFields", out_fields.to_string()),
        ("returnGeometry", "false".to_string()),
    ]
}

/// Resolver backed by the Queensland spatial services
#[derive(Debug, Clone)]
pub struct QldSpatialResolver {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl QldSpatialResolver {
    pub fn new(config: QldSpatialConfig) -> Result<Self, ResolverError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ResolverError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    /// GET one service's `query` endpoint and return its features
    async fn query<F: DeserializeOwned>(
        &self,
        service: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<F>, ResolverError> {
        let url = self
            .base_url
            .join(service)
            .map_err(|e| ResolverError::InvalidPath(service.to_string(), e))?;

        let mut request = self.http.get(url).query(params).query(&[("f", "json")]);
        if let Some(token) = &self.api_key {
            request = request.query(&[("token", token.as_str())]);
        }

        let resp = request.send().await.map_err(|e| ResolverError::Http {
            endpoint: service.to_string(),
            source: e,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(ResolverError::ApiError {
                endpoint: service.to_string(),
                status,
                body,
            });
        }

        let set: FeatureSet<F> = resp
            .json()
            .await
            .map_err(|e| ResolverError::Deserialization {
                endpoint: service.to_string(),
                source: e,
            })?;

        if let Some(error) = set.error {
            return Err(ResolverError::Service {
                endpoint: service.to_string(),
                code: error.code,
                message: error.message,
            });
        }
        Ok(set.features)
    }

    /// Look up an address; `None` when nothing matches or the match has no coordinates
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, ResolverError> {
        let params = [
            ("where", address_clause(address)),
            ("outFields", "ADDRESS,LATITUDE,LONGITUDE,LOT_PLAN,LGA_NAME".to_string()),
            ("returnGeometry", "true".to_string()),
        ];
        let features: Vec<Feature<AddressAttributes>> = self.query(ADDRESS_SERVICE, &params).await?;

        let Some(first) = features.into_iter().next() else {
            return Ok(None);
        };
        let attributes = first.attributes;
        match (attributes.latitude, attributes.longitude) {
            (Some(latitude), Some(longitude)) => Ok(Some(GeocodedAddress {
                address: attributes.address,
                latitude,
                longitude,
                lot_plan: attributes.lot_plan,
                lga_name: attributes.lga_name.filter(|name| !name.trim().is_empty()),
            })),
            _ => Ok(None),
        }
    }

    /// Planning scheme zone at a location; `None` when no zone covers it
    pub async fn zone_at(&self, location: &GeocodedAddress) -> Result<Option<Zone>, ResolverError> {
        let params = point_query(
            location,
            "ZONE_CODE,ZONE_DESCRIPTION,PLANNING_SCHEME_NAME,LGA_NAME",
        );
        let features: Vec<Feature<ZoneAttributes>> =
            self.query(PLANNING_SCHEME_SERVICE, &params).await?;

        Ok(features.into_iter().next().and_then(|feature| {
            let attributes = feature.attributes;
            tracing::debug!(
                scheme = attributes.planning_scheme.as_deref().unwrap_or("-"),
                "Planning scheme zone found"
            );
            Zone::from_parts(
                attributes.zone_code.as_deref().unwrap_or(""),
                attributes.zone_description.as_deref().unwrap_or(""),
            )
        }))
    }

    /// Whether one overlay covers a location
    pub async fn overlay_active(
        &self,
        kind: OverlayKind,
        location: &GeocodedAddress,
    ) -> Result<bool, ResolverError> {
        let params = point_query(location, "*");
        let features: Vec<IgnoredAny> = self.query(overlay_service(kind), &params).await?;
        Ok(!features.is_empty())
    }

    /// All six overlays, queried concurrently; failed queries stay inactive
    pub async fn overlays_at(&self, location: &GeocodedAddress) -> OverlaySet {
        let checks = OverlayKind::ALL
            .map(|kind| async move { (kind, self.overlay_active(kind, location).await) });

        let mut overlays = OverlaySet::none();
        for (kind, result) in join_all(checks).await {
            match result {
                Ok(active) => overlays.set_active(kind, active),
                Err(e) => tracing::warn!(overlay = %kind, error = %e, "Overlay query failed; treating as inactive"),
            }
        }
        overlays
    }
}

#[async_trait]
impl LocationResolver for QldSpatialResolver {
    async fn resolve(&self, address: &str) -> Resolved<PropertyProfile> {
        let location = match self.geocode(address).await {
            Ok(Some(location)) => location,
            Ok(None) => {
                tracing::warn!(address, "No matching property address; using fallback profile");
                return Resolved::defaulted(PropertyProfile::fallback());
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Geocoding failed; using fallback profile");
                return Resolved::defaulted(PropertyProfile::fallback());
            }
        };

        let (zone, overlays) = futures::join!(self.zone_at(&location), self.overlays_at(&location));
        let zone = match zone {
            Ok(Some(zone)) => Resolved::matched(zone),
            Ok(None) => {
                tracing::warn!(address, "No planning scheme zone found; using default zone");
                Resolved::defaulted(Zone::default())
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Zone lookup failed; using default zone");
                Resolved::defaulted(Zone::default())
            }
        };

        tracing::info!(
            address,
            lga = location.lga_name.as_deref().unwrap_or("-"),
            zone = %zone.value,
            overlays = %overlays.active_names(),
            "Resolved property"
        );

        Resolved::matched(PropertyProfile {
            zone,
            overlays,
            jurisdiction_id: location.lga_name,
        })
    }
}
