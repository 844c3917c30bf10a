//! Queensland spatial services configuration
//!
//! All map services live under one ArcGIS REST folder; only the folder URL,
//! the access token and the timeout are configurable.

use url::Url;

pub const DEFAULT_BASE_URL: &str =
    "https://spatial-gis.information.qld.gov.au/arcgis/rest/services/PlanningCadastre/";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for [`crate::QldSpatialResolver`]
///
/// `Debug` redacts the API key.
#[derive(Clone)]
pub struct QldSpatialConfig {
    /// Folder containing the address, planning scheme and overlay services
    pub base_url: Url,
    /// Sent as the `token` query parameter when present
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for QldSpatialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QldSpatialConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl QldSpatialConfig {
    /// Load configuration from environment variables
    ///
    /// - `QLD_SPATIAL_BASE_URL` (default: the PlanningCadastre folder)
    /// - `QLD_SPATIAL_API_KEY` (optional)
    /// - `QLD_SPATIAL_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_url("QLD_SPATIAL_BASE_URL", DEFAULT_BASE_URL)?;
        let api_key = std::env::var("QLD_SPATIAL_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let timeout_secs = std::env::var("QLD_SPATIAL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_key,
            timeout_secs,
        })
    }

    /// Point every service at one host (mock servers in tests)
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_folder_url("base_url", base_url)?,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    parse_folder_url(var, &raw)
}

/// Parse a folder URL, forcing a trailing slash so service paths join under it
fn parse_folder_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
