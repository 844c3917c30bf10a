//! Approval report export
//!
//! Turns an [`ApprovalReport`] into inputs for the embedded `approval_report`
//! template and renders it. Export never feeds back into evaluation.

use chrono::{Local, NaiveDateTime};
use shared_types::{ApprovalReport, StructureType};
use typst_engine::{render_document, OutputFormat, RenderRequest};

use crate::error::ServerError;

pub const REPORT_TEMPLATE: &str = "approval_report";

/// A rendered report ready to send as an attachment
#[derive(Debug)]
pub struct ExportedReport {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// `QLD-Approval-Check-{token}-{YYYYmmddHHMMSS}.{ext}`
pub fn file_name(structure: StructureType, format: OutputFormat, at: NaiveDateTime) -> String {
    format!(
        "QLD-Approval-Check-{}-{}.{}",
        structure.as_str(),
        at.format("%Y%m%d%H%M%S"),
        format.extension()
    )
}

/// Template inputs for one report
pub fn render_request(
    address: &str,
    structure: StructureType,
    report: &ApprovalReport,
    format: OutputFormat,
    at: NaiveDateTime,
) -> Result<RenderRequest, ServerError> {
    let overlays = serde_json::to_value(report.overlays)
        .map_err(|e| ServerError::Internal(format!("Failed to encode overlays: {}", e)))?;
    let requirements = serde_json::to_value(&report.requirements)
        .map_err(|e| ServerError::Internal(format!("Failed to encode requirements: {}", e)))?;

    Ok(RenderRequest::template(REPORT_TEMPLATE)
        .with_input("address", address)
        .with_input("structure_type", structure.label())
        .with_input("zone", report.zone.label())
        .with_input("overlays", overlays)
        .with_input("requirements", requirements)
        .with_input("next_steps", report.next_steps.as_str())
        .with_input("date", at.format("%d/%m/%Y").to_string())
        .with_format(format))
}

/// Render the report on the blocking pool, bounded by `timeout_ms`
pub async fn export_report(
    address: &str,
    structure: StructureType,
    report: &ApprovalReport,
    format: OutputFormat,
    timeout_ms: u64,
) -> Result<ExportedReport, ServerError> {
    let now = Local::now().naive_local();
    let request = render_request(address, structure, report, format, now)?;
    let rendered = render_document(request, timeout_ms).await?;

    if !rendered.warnings.is_empty() {
        tracing::debug!(warnings = rendered.warnings.len(), "Report rendered with warnings");
    }

    Ok(ExportedReport {
        file_name: file_name(structure, format, now),
        mime_type: rendered.mime_type(),
        bytes: rendered.bytes,
    })
}
