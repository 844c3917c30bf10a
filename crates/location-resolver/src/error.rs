//! Location lookup error types

/// Errors from the spatial services or the fixture loader
///
/// These never cross the [`crate::LocationResolver`] boundary; they are
/// logged and replaced by fallback values there.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// HTTP transport error (including timeouts)
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Service returned a non-2xx status
    #[error("{endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// ArcGIS reports errors inside a 200 response
    #[error("{endpoint} reported error {code}: {message}")]
    Service {
        endpoint: String,
        code: i64,
        message: String,
    },

    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("invalid service path {0}: {1}")]
    InvalidPath(String, url::ParseError),

    #[error("malformed address fixtures: {0}")]
    Fixtures(#[from] serde_json::Error),

    #[error("cannot read address fixtures: {0}")]
    Io(#[from] std::io::Error),
}
