//! Typst compilation wrapper with timeout and error handling

pub mod errors;
pub mod output;
pub mod render;

pub use errors::{CompileError, ErrorSeverity, RenderError};
pub use output::OutputFormat;
#[cfg(feature = "server")]
pub use render::render_document;
pub use render::{render_document_sync, validate_syntax};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// URI prefix selecting an embedded template instead of raw source
pub const TEMPLATE_URI_PREFIX: &str = "typst://templates/";

/// Request to render a document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Raw Typst source or `typst://templates/{name}`
    pub source: String,
    /// Variables injected into sys.inputs
    #[serde(default)]
    pub inputs: HashMap<String, serde_json::Value>,
    /// Extra files (images, includes) keyed by virtual path
    #[serde(default, skip)]
    pub assets: HashMap<String, Vec<u8>>,
    #[serde(default)]
    pub format: OutputFormat,
    /// Pixels per inch for PNG output
    pub ppi: Option<u32>,
}

impl RenderRequest {
    /// Request for an embedded template
    pub fn template(name: &str) -> Self {
        Self {
            source: format!("{}{}", TEMPLATE_URI_PREFIX, name),
            ..Self::default()
        }
    }

    pub fn with_input(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.inputs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// A rendered document
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub page_count: usize,
    pub warnings: Vec<CompileError>,
}

impl RenderedDocument {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}
