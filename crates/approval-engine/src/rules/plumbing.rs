//! Plumbing Approval

use shared_types::{RequirementKind, RequirementVerdict, StructureType};

use crate::EvaluationInput;

/// Only granny flats connect to water and sewer
pub fn check_plumbing_approval(input: &EvaluationInput) -> RequirementVerdict {
    let kind = RequirementKind::PlumbingApproval;

    if input.structure_type == StructureType::GrannyFlat {
        RequirementVerdict::required(
            kind,
            "Required for any structure with water or sewer connections.",
        )
    } else {
        RequirementVerdict::not_required(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::tests::input;
    use shared_types::{OverlayKind, OverlaySet};

    #[test]
    fn test_only_granny_flat_needs_plumbing() {
        for structure in StructureType::ALL {
            let mut probe = input(structure, 1000.0);
            probe.overlays = OverlaySet::with_active(&OverlayKind::ALL);
            let verdict = check_plumbing_approval(&probe);
            assert_eq!(verdict.required, structure == StructureType::GrannyFlat);
        }
    }
}
