//! QldSpatialResolver against mocked ArcGIS services
//!
//! | Service | Test |
//! |---------|------|
//! | address query | `geocode_*` |
//! | planning scheme query | `zone_*` |
//! | overlay queries | `overlays_*` |
//! | full resolution | `resolve_*` |

use location_resolver::arcgis::{overlay_service, ADDRESS_SERVICE, PLANNING_SCHEME_SERVICE};
use location_resolver::{LocationResolver, QldSpatialConfig, QldSpatialResolver, ResolverError};
use pretty_assertions::assert_eq;
use shared_types::{OverlayKind, PropertyProfile, DEFAULT_ZONE_LABEL};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "12 Example St, Toowong QLD";

fn service_path(service: &str) -> String {
    format!("/arcgis/{service}")
}

fn test_resolver(mock_server: &MockServer, api_key: Option<&str>) -> QldSpatialResolver {
    let mut config = QldSpatialConfig::with_base_url(&format!("{}/arcgis", mock_server.uri())).unwrap();
    config.api_key = api_key.map(str::to_string);
    config.timeout_secs = 5;
    QldSpatialResolver::new(config).unwrap()
}

fn features(attributes: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "features": [{ "attributes": attributes }]
    }))
}

fn no_features() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "features": [] }))
}

async fn mount_address(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(service_path(ADDRESS_SERVICE)))
        .respond_with(features(serde_json::json!({
            "ADDRESS": "12 EXAMPLE ST TOOWONG",
            "LATITUDE": -27.4849,
            "LONGITUDE": 152.9925,
            "LOT_PLAN": "3RP12345",
            "LGA_NAME": "BRISBANE CITY"
        })))
        .mount(mock_server)
        .await;
}

async fn mount_zone(mock_server: &MockServer, code: &str, description: &str) {
    Mock::given(method("GET"))
        .and(path(service_path(PLANNING_SCHEME_SERVICE)))
        .respond_with(features(serde_json::json!({
            "ZONE_CODE": code,
            "ZONE_DESCRIPTION": description,
            "PLANNING_SCHEME_NAME": "Brisbane City Plan 2014",
            "LGA_NAME": "BRISBANE CITY"
        })))
        .mount(mock_server)
        .await;
}

async fn mount_overlay(mock_server: &MockServer, kind: OverlayKind, active: bool) {
    let response = if active {
        features(serde_json::json!({ "OBJECTID": 1 }))
    } else {
        no_features()
    };
    Mock::given(method("GET"))
        .and(path(service_path(overlay_service(kind))))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ── address query ────────────────────────────────────────────────────

#[tokio::test]
async fn geocode_sends_prefix_clause_and_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(service_path(ADDRESS_SERVICE)))
        .and(query_param("where", "ADDRESS like '12 Example St, Toowong QLD%'"))
        .and(query_param("outFields", "ADDRESS,LATITUDE,LONGITUDE,LOT_PLAN,LGA_NAME"))
        .and(query_param("returnGeometry", "true"))
        .and(query_param("f", "json"))
        .and(query_param("token", "test-key"))
        .respond_with(features(serde_json::json!({
            "ADDRESS": "12 EXAMPLE ST TOOWONG",
            "LATITUDE": -27.4849,
            "LONGITUDE": 152.9925,
            "LGA_NAME": "BRISBANE CITY"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(&mock_server, Some("test-key"));
    let location = resolver.geocode(ADDRESS).await.unwrap().unwrap();

    assert_eq!(location.latitude, -27.4849);
    assert_eq!(location.longitude, 152.9925);
    assert_eq!(location.lga_name.as_deref(), Some("BRISBANE CITY"));
    assert_eq!(location.lot_plan, None);
}

#[tokio::test]
async fn geocode_without_matches_returns_none() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(service_path(ADDRESS_SERVICE)))
        .respond_with(no_features())
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(&mock_server, None);
    assert_eq!(resolver.geocode("1 Nowhere Rd").await.unwrap(), None);
}

#[tokio::test]
async fn geocode_reports_service_error_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(service_path(ADDRESS_SERVICE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": { "code": 498, "message": "Invalid Token" }
        })))
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(&mock_server, Some("expired"));
    let err = resolver.geocode(ADDRESS).await.unwrap_err();
    assert!(matches!(err, ResolverError::Service { code: 498, .. }));
}

#[tokio::test]
async fn geocode_reports_http_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(service_path(ADDRESS_SERVICE)))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(&mock_server, None);
    match resolver.geocode(ADDRESS).await.unwrap_err() {
        ResolverError::ApiError { status, body, .. } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── planning scheme query ────────────────────────────────────────────

#[tokio::test]
async fn zone_query_uses_point_geometry() {
    let mock_server = MockServer::start().await;
    mount_address(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(service_path(PLANNING_SCHEME_SERVICE)))
        .and(query_param("geometry", "152.9925,-27.4849"))
        .and(query_param("geometryType", "esriGeometryPoint"))
        .and(query_param("inSR", "4326"))
        .and(query_param("returnGeometry", "false"))
        .respond_with(features(serde_json::json!({
            "ZONE_CODE": "RU",
            "ZONE_DESCRIPTION": "Rural Zone"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(&mock_server, None);
    let location = resolver.geocode(ADDRESS).await.unwrap().unwrap();
    let zone = resolver.zone_at(&location).await.unwrap().unwrap();

    assert_eq!(zone.label(), "RU - Rural Zone");
    assert!(zone.is_rural());
}

// ── overlay queries ──────────────────────────────────────────────────

#[tokio::test]
async fn overlays_follow_feature_presence() {
    let mock_server = MockServer::start().await;
    mount_address(&mock_server).await;
    for kind in OverlayKind::ALL {
        let active = matches!(kind, OverlayKind::FloodHazard | OverlayKind::Heritage);
        mount_overlay(&mock_server, kind, active).await;
    }

    let resolver = test_resolver(&mock_server, None);
    let location = resolver.geocode(ADDRESS).await.unwrap().unwrap();
    let overlays = resolver.overlays_at(&location).await;

    assert_eq!(overlays.active_names(), "Flood Hazard, Heritage");
}

#[tokio::test]
async fn overlays_failed_query_stays_inactive() {
    let mock_server = MockServer::start().await;
    mount_address(&mock_server).await;
    mount_overlay(&mock_server, OverlayKind::LandslideHazard, true).await;
    Mock::given(method("GET"))
        .and(path(service_path(overlay_service(OverlayKind::FloodHazard))))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    // The remaining overlay services are not mounted and answer 404

    let resolver = test_resolver(&mock_server, None);
    let location = resolver.geocode(ADDRESS).await.unwrap().unwrap();
    let overlays = resolver.overlays_at(&location).await;

    assert!(!overlays.is_active(OverlayKind::FloodHazard));
    assert_eq!(overlays.active_names(), "Landslide Hazard");
}

// ── full resolution ──────────────────────────────────────────────────

#[tokio::test]
async fn resolve_combines_all_lookups() {
    let mock_server = MockServer::start().await;
    mount_address(&mock_server).await;
    mount_zone(&mock_server, "LDR", "Low Density Residential").await;
    for kind in OverlayKind::ALL {
        mount_overlay(&mock_server, kind, kind == OverlayKind::BushfireRisk).await;
    }

    let resolver = test_resolver(&mock_server, None);
    let resolved = resolver.resolve(ADDRESS).await;

    assert!(!resolved.is_default());
    let profile = resolved.into_inner();
    assert!(!profile.zone.is_default());
    assert_eq!(profile.zone.value.label(), "LDR - Low Density Residential");
    assert_eq!(profile.overlays.active_names(), "Bushfire Risk");
    assert_eq!(profile.jurisdiction_id.as_deref(), Some("BRISBANE CITY"));
}

#[tokio::test]
async fn resolve_unknown_address_uses_fallback() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(service_path(ADDRESS_SERVICE)))
        .respond_with(no_features())
        .mount(&mock_server)
        .await;

    let resolver = test_resolver(&mock_server, None);
    let resolved = resolver.resolve("1 Nowhere Rd").await;

    assert!(resolved.is_default());
    assert_eq!(resolved.value, PropertyProfile::fallback());
}

#[tokio::test]
async fn resolve_zone_failure_keeps_overlays_and_council() {
    let mock_server = MockServer::start().await;
    mount_address(&mock_server).await;
    Mock::given(method("GET"))
        .and(path(service_path(PLANNING_SCHEME_SERVICE)))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;
    for kind in OverlayKind::ALL {
        mount_overlay(&mock_server, kind, kind == OverlayKind::WaterwayCorridor).await;
    }

    let resolver = test_resolver(&mock_server, None);
    let profile = resolver.resolve(ADDRESS).await.into_inner();

    assert!(profile.zone.is_default());
    assert_eq!(profile.zone.value.label(), DEFAULT_ZONE_LABEL);
    assert_eq!(profile.overlays.active_names(), "Waterway Corridor");
    assert_eq!(profile.jurisdiction_id.as_deref(), Some("BRISBANE CITY"));
}

#[tokio::test]
async fn resolve_unreachable_service_uses_fallback() {
    // Nothing listens on the discard port
    let config = QldSpatialConfig::with_base_url("http://127.0.0.1:9/arcgis").unwrap();
    let resolver = QldSpatialResolver::new(config).unwrap();
    let resolved = resolver.resolve(ADDRESS).await;
    assert!(resolved.is_default());
}
