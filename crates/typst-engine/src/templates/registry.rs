//! Template lookup by name

use super::embedded;
use crate::compiler::errors::RenderError;

/// Source of a named template
pub fn get_template_source(name: &str) -> Result<String, RenderError> {
    embedded::get_embedded_template(name)
        .map(str::to_string)
        .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::validate_syntax;

    #[test]
    fn test_approval_report_is_embedded_and_parses() {
        let source = get_template_source("approval_report").unwrap();
        let errors = validate_syntax(&source);
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn test_template_reads_report_inputs() {
        let source = get_template_source("approval_report").unwrap();
        for input in [
            "address",
            "structure_type",
            "zone",
            "overlays",
            "requirements",
            "next_steps",
            "date",
        ] {
            assert!(
                source.contains(&format!("\"{}\"", input)),
                "template never reads {}",
                input
            );
        }
    }

    #[test]
    fn test_missing_template() {
        assert!(matches!(
            get_template_source("site_plan"),
            Err(RenderError::TemplateNotFound(_))
        ));
    }
}
