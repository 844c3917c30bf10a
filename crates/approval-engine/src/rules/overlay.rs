//! Overlay Assessment

use shared_types::{RequirementKind, RequirementVerdict};

use crate::EvaluationInput;

pub fn check_overlay_assessment(input: &EvaluationInput) -> RequirementVerdict {
    let kind = RequirementKind::OverlayAssessment;

    if input.overlays.any_active() {
        RequirementVerdict::required(
            kind,
            format!(
                "Required due to {} overlays on the property.",
                input.overlays.active_names()
            ),
        )
    } else {
        RequirementVerdict::not_required(kind)
    }
}
