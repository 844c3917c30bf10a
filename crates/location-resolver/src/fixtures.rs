//! In-memory resolver for offline use and tests
//!
//! Fixture files map addresses to a compact profile:
//!
//! ```json
//! {
//!   "1 Farm Rd, Gatton QLD": {
//!     "zone": "RU - Rural Zone",
//!     "overlays": ["Bushfire Risk"],
//!     "jurisdiction": "LOCKYER VALLEY REGIONAL"
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use shared_types::{OverlayKind, OverlaySet, PropertyProfile, Resolved, Zone};

use crate::error::ResolverError;
use crate::LocationResolver;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FixtureEntry {
    #[serde(default)]
    zone: Option<String>,
    #[serde(default)]
    overlays: Vec<OverlayKind>,
    #[serde(default)]
    jurisdiction: Option<String>,
}

impl From<FixtureEntry> for PropertyProfile {
    fn from(entry: FixtureEntry) -> Self {
        PropertyProfile {
            zone: match entry.zone.as_deref().and_then(Zone::parse) {
                Some(zone) => Resolved::matched(zone),
                None => Resolved::defaulted(Zone::default()),
            },
            overlays: OverlaySet::with_active(&entry.overlays),
            jurisdiction_id: entry.jurisdiction,
        }
    }
}

fn normalize_address(address: &str) -> String {
    address.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

/// Fixed address → profile map; unknown addresses resolve to the fallback
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    profiles: HashMap<String, PropertyProfile>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, address: &str, profile: PropertyProfile) -> Self {
        self.insert(address, profile);
        self
    }

    pub fn insert(&mut self, address: &str, profile: PropertyProfile) {
        self.profiles.insert(normalize_address(address), profile);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ResolverError> {
        let entries: HashMap<String, FixtureEntry> = serde_json::from_str(json)?;
        let mut resolver = Self::new();
        for (address, entry) in entries {
            resolver.insert(&address, entry.into());
        }
        Ok(resolver)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ResolverError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn lookup(&self, address: &str) -> Option<&PropertyProfile> {
        self.profiles.get(&normalize_address(address))
    }
}

#[async_trait]
impl LocationResolver for StaticResolver {
    async fn resolve(&self, address: &str) -> Resolved<PropertyProfile> {
        match self.lookup(address) {
            Some(profile) => Resolved::matched(profile.clone()),
            None => {
                tracing::warn!(address, "Address not in fixtures; using fallback profile");
                Resolved::defaulted(PropertyProfile::fallback())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{Resolution, DEFAULT_ZONE_LABEL};

    const FIXTURES: &str = r#"{
        "1 Farm Rd, Gatton QLD": {
            "zone": "RU - Rural Zone",
            "overlays": ["Bushfire Risk", "Flood Hazard"],
            "jurisdiction": "LOCKYER VALLEY REGIONAL"
        },
        "9 Quiet St, Brisbane QLD": {},
        "4 Blank Ave, Ipswich QLD": { "zone": "  " }
    }"#;

    #[tokio::test]
    async fn test_lookup_ignores_case_and_spacing() {
        let resolver = StaticResolver::from_json_str(FIXTURES).unwrap();
        let resolved = resolver.resolve("1 farm rd,   gatton qld ").await;

        assert!(!resolved.is_default());
        let profile = resolved.into_inner();
        assert!(profile.zone.value.is_rural());
        assert_eq!(
            profile.overlays.active_names(),
            "Flood Hazard, Bushfire Risk"
        );
        assert_eq!(profile.jurisdiction_id.as_deref(), Some("LOCKYER VALLEY REGIONAL"));
    }

    #[tokio::test]
    async fn test_entry_without_zone_is_defaulted_zone() {
        let resolver = StaticResolver::from_json_str(FIXTURES).unwrap();
        let profile = resolver.resolve("9 Quiet St, Brisbane QLD").await.into_inner();
        assert!(profile.zone.is_default());
        assert_eq!(profile.zone.value.label(), DEFAULT_ZONE_LABEL);
    }

    #[tokio::test]
    async fn test_blank_zone_is_defaulted_zone() {
        let resolver = StaticResolver::from_json_str(FIXTURES).unwrap();
        let resolved = resolver.resolve("4 Blank Ave, Ipswich QLD").await;

        assert!(!resolved.is_default());
        let profile = resolved.into_inner();
        assert_eq!(profile.zone.resolution, Resolution::Defaulted);
        assert_eq!(profile.zone.value.label(), DEFAULT_ZONE_LABEL);
    }

    #[tokio::test]
    async fn test_unknown_address_falls_back() {
        let resolver = StaticResolver::new();
        let resolved = resolver.resolve("Nowhere").await;
        assert!(resolved.is_default());
        assert_eq!(resolved.value, PropertyProfile::fallback());
    }

    #[test]
    fn test_rejects_unknown_overlay_name() {
        let result = StaticResolver::from_json_str(r#"{ "x": { "overlays": ["Koala Habitat"] } }"#);
        assert!(matches!(result, Err(ResolverError::Fixtures(_))));
    }
}
