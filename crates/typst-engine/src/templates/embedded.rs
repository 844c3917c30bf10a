//! Templates embedded in the binary at compile time

/// Approval report - loaded from templates/approval_report.typ
const APPROVAL_REPORT_TEMPLATE: &str = include_str!("../../templates/approval_report.typ");

/// Get an embedded template by name
pub fn get_embedded_template(name: &str) -> Option<&'static str> {
    match name {
        "approval_report" => Some(APPROVAL_REPORT_TEMPLATE),
        _ => None,
    }
}
