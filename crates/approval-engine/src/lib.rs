//! Approval decision engine
//!
//! Maps a property's zone and overlays, the proposed structure and the
//! council's limits to the five approval requirements plus a recommendation.
//! Everything here is pure and synchronous; the location lookup that feeds it
//! lives elsewhere.

pub mod jurisdiction;
pub mod rules;
pub mod summary;

pub use jurisdiction::{JurisdictionLimits, RuleConfig, RuleTable, RuleTableError, Thresholds};
pub use summary::summarize;

use shared_types::{
    ApprovalReport, OverlaySet, PropertyProfile, RequirementSet, StructureType, Zone,
};

/// Everything one rule evaluation depends on
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationInput {
    pub zone: Zone,
    pub overlays: OverlaySet,
    pub structure_type: StructureType,
    pub jurisdiction_limits: JurisdictionLimits,
    /// Proposed footprint in m²
    pub assumed_size: f64,
}

/// ApprovalEngine entry point
#[derive(Debug, Clone)]
pub struct ApprovalEngine {
    table: RuleTable,
    thresholds: Thresholds,
}

impl ApprovalEngine {
    /// Built-in Queensland table with default thresholds
    pub fn new() -> Self {
        Self::with_rules(RuleTable::queensland(), Thresholds::default())
    }

    pub fn with_rules(table: RuleTable, thresholds: Thresholds) -> Self {
        Self { table, thresholds }
    }

    pub fn from_config(config: RuleConfig) -> Self {
        Self::with_rules(config.table, config.thresholds)
    }

    pub fn rule_table(&self) -> &RuleTable {
        &self.table
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn evaluate(&self, input: &EvaluationInput) -> RequirementSet {
        rules::evaluate(input, &self.thresholds)
    }

    /// Evaluate a resolved property and assemble the outbound report
    pub fn check(
        &self,
        profile: &PropertyProfile,
        structure_type: StructureType,
        assumed_size: f64,
    ) -> ApprovalReport {
        let limits = self
            .table
            .resolve(profile.jurisdiction_id.as_deref(), structure_type);

        tracing::debug!(
            jurisdiction = profile.jurisdiction_id.as_deref().unwrap_or("-"),
            structure = %structure_type,
            zone = %profile.zone.value,
            zone_resolution = ?profile.zone.resolution,
            limits_resolution = ?limits.resolution,
            assumed_size,
            "Evaluating approval requirements"
        );

        let input = EvaluationInput {
            zone: profile.zone.value.clone(),
            overlays: profile.overlays,
            structure_type,
            jurisdiction_limits: limits.into_inner(),
            assumed_size,
        };
        let requirements = self.evaluate(&input);
        let next_steps = summarize(structure_type, &requirements);

        ApprovalReport {
            zone: input.zone,
            overlays: input.overlays,
            requirements,
            next_steps,
        }
    }
}

impl Default for ApprovalEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{OverlayKind, RequirementKind, Resolved, DEFAULT_ZONE_LABEL};

    fn profile(zone: &str, overlays: &[OverlayKind], jurisdiction: Option<&str>) -> PropertyProfile {
        PropertyProfile {
            zone: Resolved::matched(Zone::parse(zone).unwrap()),
            overlays: OverlaySet::with_active(overlays),
            jurisdiction_id: jurisdiction.map(str::to_string),
        }
    }

    fn required(report: &ApprovalReport) -> Vec<RequirementKind> {
        report
            .requirements
            .iter()
            .filter(|v| v.required)
            .map(|v| v.name)
            .collect()
    }

    #[test]
    fn test_granny_flat_without_overlays() {
        let engine = ApprovalEngine::new();
        let report = engine.check(
            &profile(DEFAULT_ZONE_LABEL, &[], Some("BRISBANE CITY")),
            StructureType::GrannyFlat,
            50.0,
        );

        assert_eq!(
            required(&report),
            vec![
                RequirementKind::DevelopmentApplication,
                RequirementKind::BuildingApproval,
                RequirementKind::PlumbingApproval,
            ]
        );
        assert!(report.next_steps.contains("apply for approval for your granny flat"));
    }

    #[test]
    fn test_rural_shed_threshold_is_exclusive() {
        let engine = ApprovalEngine::new();
        let rural = profile("RU - Rural Zone", &[], None);

        let at_limit = engine.check(&rural, StructureType::Shed, 100.0);
        assert!(!at_limit
            .requirements
            .is_required(RequirementKind::DevelopmentApplication));

        let over_limit = engine.check(&rural, StructureType::Shed, 101.0);
        let verdict = over_limit
            .requirements
            .get(RequirementKind::DevelopmentApplication);
        assert!(verdict.required);
        assert_eq!(
            verdict.note.as_deref(),
            Some("Large sheds in rural zones may require development approval.")
        );
    }

    #[test]
    fn test_small_shed_in_flood_zone() {
        let engine = ApprovalEngine::new();
        let report = engine.check(
            &profile(DEFAULT_ZONE_LABEL, &[OverlayKind::FloodHazard], None),
            StructureType::Shed,
            10.0,
        );

        assert_eq!(
            required(&report),
            vec![
                RequirementKind::DevelopmentApplication,
                RequirementKind::EngineeringCertificate,
                RequirementKind::OverlayAssessment,
            ]
        );
        assert_eq!(
            report
                .requirements
                .get(RequirementKind::DevelopmentApplication)
                .note
                .as_deref(),
            Some("Required due to Flood Hazard overlays.")
        );
    }

    #[test]
    fn test_unresolved_address_gets_baseline() {
        let engine = ApprovalEngine::new();
        let report = engine.check(&PropertyProfile::fallback(), StructureType::Patio, 8.0);

        assert_eq!(report.zone.label(), DEFAULT_ZONE_LABEL);
        assert!(!report.overlays.any_active());
        assert!(required(&report).is_empty());
        assert!(report.next_steps.starts_with("Good news!"));
        assert!(report.next_steps.contains("your patio"));
    }

    #[test]
    fn test_unknown_council_matches_no_council() {
        let engine = ApprovalEngine::new();
        for structure in StructureType::ALL {
            for size in [5.0, 15.0, 45.0, 75.0, 150.0] {
                let unknown = engine.check(
                    &profile(DEFAULT_ZONE_LABEL, &[], Some("WESTERN DOWNS REGIONAL")),
                    structure,
                    size,
                );
                let absent = engine.check(&profile(DEFAULT_ZONE_LABEL, &[], None), structure, size);
                assert_eq!(unknown, absent);
            }
        }
    }

    #[test]
    fn test_council_limits_change_building_note() {
        let mut table = RuleTable::empty();
        table.insert("SUNSHINE COAST", StructureType::Carport, JurisdictionLimits::new(36.0, 3.0, 1.0));
        let engine = ApprovalEngine::with_rules(table, Thresholds::default());

        let report = engine.check(
            &profile(DEFAULT_ZONE_LABEL, &[], Some("Sunshine Coast")),
            StructureType::Carport,
            40.0,
        );
        assert_eq!(
            report
                .requirements
                .get(RequirementKind::BuildingApproval)
                .note
                .as_deref(),
            Some("Required for structures over 36 square meters.")
        );
        assert!(!report
            .requirements
            .is_required(RequirementKind::EngineeringCertificate));
    }

    #[test]
    fn test_fixed_engineering_area() {
        let config = RuleConfig::from_json_str(r#"{ "thresholds": { "engineering_fixed_area": 50 } }"#).unwrap();
        let engine = ApprovalEngine::from_config(config);

        let report = engine.check(&PropertyProfile::fallback(), StructureType::Patio, 40.0);
        assert!(report.requirements.is_required(RequirementKind::BuildingApproval));
        assert!(!report
            .requirements
            .is_required(RequirementKind::EngineeringCertificate));
    }
}
