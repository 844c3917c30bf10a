//! Core rendering logic
//!
//! Compilation and export are CPU-bound; the async entry point moves both
//! onto the blocking pool and bounds them with a timeout.

use typst::diag::{Severity, SourceDiagnostic};
use typst::layout::Page;
use typst::model::Document;

use super::errors::{CompileError, RenderError};
use super::output::OutputFormat;
use super::{RenderRequest, RenderedDocument, TEMPLATE_URI_PREFIX};
use crate::templates;
use crate::world::VirtualWorld;

/// Cached compilation results older than this many compilations are evicted
const CACHE_MAX_AGE: usize = 10;

/// Render a document on the blocking pool, giving up after `timeout_ms`
#[cfg(feature = "server")]
pub async fn render_document(
    request: RenderRequest,
    timeout_ms: u64,
) -> Result<RenderedDocument, RenderError> {
    use std::time::Duration;

    let result = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(move || render_document_sync(request)),
    )
    .await;

    match result {
        Ok(Ok(rendered)) => rendered,
        Ok(Err(join_error)) => Err(RenderError::TaskFailed(join_error.to_string())),
        Err(_timeout) => {
            tracing::warn!(timeout_ms, "Document rendering timed out");
            Err(RenderError::Timeout(timeout_ms))
        }
    }
}

/// Render a document on the current thread
pub fn render_document_sync(request: RenderRequest) -> Result<RenderedDocument, RenderError> {
    let source = match request.source.strip_prefix(TEMPLATE_URI_PREFIX) {
        Some(name) => templates::get_template_source(name)?,
        None => request.source,
    };

    let world = VirtualWorld::new(source, request.inputs, request.assets)?;
    let warned = typst::compile(&world);
    comemo::evict(CACHE_MAX_AGE);

    let (_, warnings) = categorize_diagnostics(&warned.warnings);
    let document = match warned.output {
        Ok(document) => document,
        Err(diagnostics) => {
            let (errors, _) = categorize_diagnostics(&diagnostics);
            return Err(RenderError::Compile(errors));
        }
    };

    let bytes = export_document(&document, request.format, request.ppi)?;
    tracing::debug!(
        format = %request.format,
        pages = document.pages.len(),
        size = bytes.len(),
        warnings = warnings.len(),
        "Document rendered"
    );

    Ok(RenderedDocument {
        bytes,
        format: request.format,
        page_count: document.pages.len(),
        warnings,
    })
}

/// Parse-only check of Typst source
pub fn validate_syntax(source: &str) -> Vec<CompileError> {
    typst::syntax::parse(source)
        .errors()
        .into_iter()
        .map(|error| CompileError::new(error.message.to_string()))
        .collect()
}

fn export_document(
    document: &Document,
    format: OutputFormat,
    ppi: Option<u32>,
) -> Result<Vec<u8>, RenderError> {
    match format {
        OutputFormat::Pdf => {
            typst_pdf::pdf(document, &typst_pdf::PdfOptions::default()).map_err(|diagnostics| {
                let (errors, _) = categorize_diagnostics(&diagnostics);
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                RenderError::Export(format!("PDF export failed: {}", messages.join("; ")))
            })
        }
        OutputFormat::Svg => Ok(typst_svg::svg(first_page(document)?).into_bytes()),
        OutputFormat::Png => {
            let pixels_per_point = ppi.unwrap_or(144) as f32 / 72.0;
            typst_render::render(first_page(document)?, pixels_per_point)
                .encode_png()
                .map_err(|e| RenderError::Export(format!("PNG encoding failed: {}", e)))
        }
    }
}

fn first_page(document: &Document) -> Result<&Page, RenderError> {
    document
        .pages
        .first()
        .ok_or_else(|| RenderError::Export("Document has no pages".to_string()))
}

/// Split diagnostics into errors and warnings
fn categorize_diagnostics(
    diagnostics: &[SourceDiagnostic],
) -> (Vec<CompileError>, Vec<CompileError>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for diag in diagnostics {
        let mut compile_error = CompileError::new(diag.message.to_string());
        if !diag.hints.is_empty() {
            let hint = diag
                .hints
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            compile_error = compile_error.with_hint(hint);
        }

        match diag.severity {
            Severity::Error => errors.push(compile_error),
            Severity::Warning => warnings.push(compile_error.as_warning()),
        }
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_simple_pdf() {
        let request = RenderRequest {
            source: "Hello, *World*!".to_string(),
            ..RenderRequest::default()
        };
        let rendered = render_document_sync(request).unwrap();
        assert_eq!(rendered.format, OutputFormat::Pdf);
        assert_eq!(rendered.page_count, 1);
        assert!(rendered.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_reads_inputs() {
        let request = RenderRequest {
            source: r#"#let name = sys.inputs.at("name", default: "World")
Hello, #name!"#
                .to_string(),
            ..RenderRequest::default()
        }
        .with_input("name", "Alice")
        .with_format(OutputFormat::Svg);

        let rendered = render_document_sync(request).unwrap();
        assert!(String::from_utf8(rendered.bytes).unwrap().contains("<svg"));
    }

    #[test]
    fn test_render_png_signature() {
        let request = RenderRequest {
            source: "Preview".to_string(),
            ppi: Some(72),
            ..RenderRequest::default()
        }
        .with_format(OutputFormat::Png);

        let rendered = render_document_sync(request).unwrap();
        assert!(rendered.bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_compile_error_is_reported() {
        let request = RenderRequest {
            source: "#undefined_function()".to_string(),
            ..RenderRequest::default()
        };
        let err = render_document_sync(request).unwrap_err();
        match err {
            RenderError::Compile(errors) => assert!(!errors.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_template() {
        let err = render_document_sync(RenderRequest::template("invoice")).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound(name) if name == "invoice"));
    }

    #[tokio::test]
    async fn test_async_render_within_timeout() {
        let request = RenderRequest {
            source: "= Heading".to_string(),
            ..RenderRequest::default()
        };
        let rendered = render_document(request, 30_000).await.unwrap();
        assert_eq!(rendered.page_count, 1);
    }

    #[test]
    fn test_validate_syntax() {
        assert!(validate_syntax("Hello, World!").is_empty());
        assert!(!validate_syntax("#let x = ").is_empty());
    }
}
