//! API handlers for the approval server
//!
//! - `GET  /health`
//! - `GET  /api/structure-types`
//! - `POST /api/check-approval`
//! - `POST /api/generate-pdf`

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared_types::{ApprovalReport, StructureType};
use tracing::{debug, info};
use typst_engine::OutputFormat;

use crate::error::ServerError;
use crate::report::export_report;
use crate::AppState;

const MISSING_CHECK_FIELDS: &str = "Address and structure type are required";
const MISSING_EXPORT_FIELDS: &str = "Missing required data";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "approval-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// One entry of the structure type listing
#[derive(Serialize)]
pub struct StructureTypeInfo {
    pub token: &'static str,
    pub label: &'static str,
    pub size_limit: f64,
    pub height_limit: f64,
    pub setback: f64,
}

#[derive(Serialize)]
pub struct StructureTypeListResponse {
    pub success: bool,
    pub structure_types: Vec<StructureTypeInfo>,
    pub count: usize,
}

/// Handler: GET /api/structure-types
pub async fn handle_list_structure_types(
    State(state): State<AppState>,
) -> Json<StructureTypeListResponse> {
    let structure_types: Vec<StructureTypeInfo> = StructureType::ALL
        .iter()
        .map(|structure| {
            let limits = state.engine.rule_table().default_limits(*structure);
            StructureTypeInfo {
                token: structure.as_str(),
                label: structure.label(),
                size_limit: limits.size_limit,
                height_limit: limits.height_limit,
                setback: limits.setback,
            }
        })
        .collect();

    let count = structure_types.len();
    Json(StructureTypeListResponse {
        success: true,
        structure_types,
        count,
    })
}

/// Request body for POST /api/check-approval
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckApprovalRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub structure_type: Option<String>,
    /// Proposed footprint in m²
    #[serde(default)]
    pub structure_size: Option<f64>,
}

/// Handler: POST /api/check-approval
pub async fn handle_check_approval(
    State(state): State<AppState>,
    payload: Result<Json<CheckApprovalRequest>, JsonRejection>,
) -> Result<Json<ApprovalReport>, ServerError> {
    let Json(req) = payload?;

    let (address, structure_token) =
        match (non_blank(&req.address), present(&req.structure_type)) {
            (Some(address), Some(structure)) => (address, structure),
            _ => return Err(ServerError::InvalidRequest(MISSING_CHECK_FIELDS.to_string())),
        };
    let structure = parse_structure(structure_token)?;

    let size = match req.structure_size {
        Some(size) if size.is_finite() && size > 0.0 => size,
        Some(size) => {
            return Err(ServerError::InvalidRequest(format!(
                "structureSize must be a positive number of square meters, got {}",
                size
            )))
        }
        None => {
            let nominal = structure.nominal_size();
            debug!(structure = %structure, nominal, "No structure size given, assuming nominal size");
            nominal
        }
    };

    info!(structure = %structure, size, "Checking approval requirements");

    let profile = state.resolver.resolve(address).await;
    if profile.is_default() {
        debug!(address, "Address not resolved, evaluating fallback property profile");
    }

    let report = state.engine.check(&profile.value, structure, size);
    Ok(Json(report))
}

/// Request body for POST /api/generate-pdf
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub structure_type: Option<String>,
    /// Report previously returned by /api/check-approval
    #[serde(default)]
    pub approval_data: Option<serde_json::Value>,
    /// pdf (default), svg or png
    #[serde(default)]
    pub format: Option<String>,
}

/// Handler: POST /api/generate-pdf
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePdfRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(req) = payload?;

    let approval_data = req.approval_data.filter(|data| !data.is_null());
    let (address, structure_token, approval_data) = match (
        non_blank(&req.address),
        present(&req.structure_type),
        approval_data,
    ) {
        (Some(address), Some(structure), Some(data)) => (address, structure, data),
        _ => return Err(ServerError::InvalidRequest(MISSING_EXPORT_FIELDS.to_string())),
    };

    let structure = parse_structure(structure_token)?;
    let report: ApprovalReport = serde_json::from_value(approval_data)
        .map_err(|e| ServerError::InvalidRequest(format!("Invalid approvalData: {}", e)))?;
    let format = match non_blank(&req.format) {
        Some(format) => format
            .parse::<OutputFormat>()
            .map_err(ServerError::InvalidRequest)?,
        None => OutputFormat::Pdf,
    };

    info!(structure = %structure, %format, "Exporting approval report");

    let exported = export_report(address, structure, &report, format, state.timeout_ms).await?;

    debug!(
        file_name = %exported.file_name,
        bytes = exported.bytes.len(),
        "Report exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, exported.mime_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", exported.file_name),
            ),
        ],
        exported.bytes,
    )
        .into_response())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Like [`non_blank`] but keeps the value untrimmed; tokens must match exactly
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn parse_structure(token: &str) -> Result<StructureType, ServerError> {
    token
        .parse::<StructureType>()
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))
}
