//! Approval requirement rules
//!
//! One module per requirement category. Categories are independent of each
//! other; within a category the first matching condition wins.

pub mod building;
pub mod development;
pub mod engineering;
pub mod overlay;
pub mod plumbing;

pub use building::check_building_approval;
pub use development::check_development_application;
pub use engineering::check_engineering_certificate;
pub use overlay::check_overlay_assessment;
pub use plumbing::check_plumbing_approval;

use shared_types::RequirementSet;

use crate::jurisdiction::Thresholds;
use crate::EvaluationInput;

/// Evaluate all five categories, in report order
pub fn evaluate(input: &EvaluationInput, thresholds: &Thresholds) -> RequirementSet {
    let mut requirements = RequirementSet::none_required();
    requirements.record(check_development_application(input, thresholds));
    requirements.record(check_building_approval(input));
    requirements.record(check_plumbing_approval(input));
    requirements.record(check_engineering_certificate(input, thresholds));
    requirements.record(check_overlay_assessment(input));
    requirements
}
