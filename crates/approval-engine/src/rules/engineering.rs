//! Engineering Certificate

use shared_types::{RequirementKind, RequirementVerdict};

use crate::jurisdiction::Thresholds;
use crate::EvaluationInput;

/// Large minor structures need structural certification; otherwise flood or
/// landslide overlays trigger it
pub fn check_engineering_certificate(
    input: &EvaluationInput,
    thresholds: &Thresholds,
) -> RequirementVerdict {
    let kind = RequirementKind::EngineeringCertificate;

    if input.structure_type.is_minor()
        && input.assumed_size > thresholds.engineering_area(&input.jurisdiction_limits)
    {
        RequirementVerdict::required(
            kind,
            "Required for larger structures to ensure structural integrity.",
        )
    } else if input.overlays.active().any(|o| o.is_geotechnical_hazard()) {
        RequirementVerdict::required(kind, "Required due to hazard overlays on the property.")
    } else {
        RequirementVerdict::not_required(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::tests::input;
    use shared_types::{OverlayKind, OverlaySet, StructureType};

    #[test]
    fn test_size_trigger_uses_multiplier() {
        // default shed limit 10 → threshold 20
        let at = check_engineering_certificate(&input(StructureType::Shed, 20.0), &Thresholds::default());
        assert!(!at.required);
        let over = check_engineering_certificate(&input(StructureType::Shed, 20.1), &Thresholds::default());
        assert!(over.required);
        assert!(over.note.unwrap().contains("structural integrity"));
    }

    #[test]
    fn test_fixed_area_overrides_multiplier() {
        let thresholds = Thresholds {
            engineering_fixed_area: Some(50.0),
            ..Thresholds::default()
        };
        let verdict = check_engineering_certificate(&input(StructureType::Shed, 30.0), &thresholds);
        assert!(!verdict.required);
    }

    #[test]
    fn test_hazard_overlays_trigger_certificate() {
        for hazard in [OverlayKind::FloodHazard, OverlayKind::LandslideHazard] {
            let mut patio = input(StructureType::Patio, 1.0);
            patio.overlays = OverlaySet::with_active(&[hazard]);
            let verdict = check_engineering_certificate(&patio, &Thresholds::default());
            assert_eq!(
                verdict.note.as_deref(),
                Some("Required due to hazard overlays on the property.")
            );
        }
    }

    #[test]
    fn test_non_hazard_overlays_do_not_trigger() {
        let mut patio = input(StructureType::Patio, 1.0);
        patio.overlays = OverlaySet::with_active(&[
            OverlayKind::BushfireRisk,
            OverlayKind::Heritage,
            OverlayKind::EnvironmentalSignificance,
            OverlayKind::WaterwayCorridor,
        ]);
        assert!(!check_engineering_certificate(&patio, &Thresholds::default()).required);
    }

    #[test]
    fn test_large_granny_flat_only_hazard_branch() {
        let flat = input(StructureType::GrannyFlat, 10_000.0);
        assert!(!check_engineering_certificate(&flat, &Thresholds::default()).required);
    }
}
