//! Roll the seven per-hazard results up into one overall profile, the summary
//! lines and the mitigation list.

use std::collections::BTreeMap;

use crate::domain::{
    FLAG_SEVERITY, FlaggedRisk, HIGH_SEVERITY, HazardType, OverallRiskProfile, RiskAssessment,
    RiskLevel, RiskResult,
};

pub const NO_MAJOR_RISKS: &str = "No major risks identified";
pub const NO_MITIGATION: &str =
    "No major mitigation required - standard construction practices sufficient";

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAggregator;

impl RiskAggregator {
    /// Build the full assessment around a set of per-hazard results.
    pub fn aggregate(&self, hazards: BTreeMap<HazardType, RiskResult>) -> RiskAssessment {
        let overall = overall_profile(&hazards);
        let summary = summary_lines(&hazards, &overall);
        let mitigation = mitigation_plan(&hazards);
        RiskAssessment {
            hazards,
            overall,
            summary,
            mitigation,
        }
    }
}

pub fn overall_profile(hazards: &BTreeMap<HazardType, RiskResult>) -> OverallRiskProfile {
    let high = hazards.values().filter(|r| r.severity >= HIGH_SEVERITY).count();
    let medium = hazards.values().filter(|r| r.severity == FLAG_SEVERITY).count();
    let total = hazards.len();

    let mean_severity = if total == 0 {
        0.0
    } else {
        let sum: f64 = hazards.values().map(|r| f64::from(r.severity)).sum();
        ((sum / total as f64) * 100.0).round() / 100.0
    };

    let overall_level = if high >= 3 {
        RiskLevel::VeryHigh
    } else if high >= 2 {
        RiskLevel::High
    } else if high >= 1 || medium >= 3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    // BTreeMap iteration is already enum order.
    let flagged_risks = hazards
        .values()
        .filter(|r| r.is_flagged())
        .map(|r| FlaggedRisk {
            hazard: r.hazard,
            severity: r.severity,
            level: r.level,
            score: r.score,
        })
        .collect();

    OverallRiskProfile {
        overall_level,
        high_risk_count: high,
        medium_risk_count: medium,
        mean_severity,
        total_risks_assessed: total,
        flagged_risks,
    }
}

pub fn summary_lines(
    hazards: &BTreeMap<HazardType, RiskResult>,
    overall: &OverallRiskProfile,
) -> Vec<String> {
    let major: Vec<String> = hazards
        .values()
        .filter(|r| r.severity >= HIGH_SEVERITY)
        .map(|r| format!("{}: {}", r.hazard.display_name(), r.level.display_name()))
        .collect();

    let mut lines = Vec::with_capacity(3);
    if major.is_empty() {
        lines.push(NO_MAJOR_RISKS.to_string());
    } else {
        lines.push(format!("Major risks identified: {}", major.join(", ")));
    }
    lines.push(format!(
        "Overall risk level: {}",
        overall.overall_level.display_name()
    ));
    lines.push(format!("Average severity: {:.1}/5", overall.mean_severity));
    lines
}

pub fn mitigation_plan(hazards: &BTreeMap<HazardType, RiskResult>) -> Vec<String> {
    let plan: Vec<String> = hazards
        .values()
        .filter(|r| r.is_flagged() && !r.recommendation.is_empty())
        .map(|r| format!("{}: {}", r.hazard.display_name(), r.recommendation))
        .collect();
    if plan.is_empty() {
        vec![NO_MITIGATION.to_string()]
    } else {
        plan
    }
}
