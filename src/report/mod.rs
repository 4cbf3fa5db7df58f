//! Reporting utilities: parcel rankings and formatted terminal output.

use std::cmp::Ordering;

use crate::assess::ParcelAssessment;

pub mod format;

pub use format::*;

/// Order parcels from most to least at risk and keep the top `top_n`.
///
/// Overall level first, then high-risk count, then mean severity; ties keep
/// input order.
pub fn rank_by_risk(outcomes: &[ParcelAssessment], top_n: usize) -> Vec<&ParcelAssessment> {
    let mut ranked: Vec<&ParcelAssessment> = outcomes.iter().collect();
    ranked.sort_by(|a, b| compare_risk(b, a));
    ranked.truncate(top_n);
    ranked
}

fn compare_risk(a: &ParcelAssessment, b: &ParcelAssessment) -> Ordering {
    let (a, b) = (&a.assessment.overall, &b.assessment.overall);
    a.overall_level
        .cmp(&b.overall_level)
        .then(a.high_risk_count.cmp(&b.high_risk_count))
        .then(a.mean_severity.total_cmp(&b.mean_severity))
}
