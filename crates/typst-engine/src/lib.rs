//! Typst document rendering engine
//!
//! Compiles embedded templates (or raw Typst source) entirely in memory and
//! exports the result as PDF, or the first page as SVG/PNG.
//!
//! # Feature Flags
//!
//! - `server` (default): async [`render_document`] with timeout (requires tokio)

pub mod compiler;
pub mod templates;
pub mod world;

pub use compiler::{
    render_document_sync, CompileError, OutputFormat, RenderError, RenderRequest, RenderedDocument,
};

#[cfg(feature = "server")]
pub use compiler::render_document;
