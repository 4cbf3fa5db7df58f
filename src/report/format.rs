//! Formatted terminal output.
//!
//! Formatting lives in one place so scoring code stays free of presentation
//! and output changes stay local.

use crate::assess::ParcelAssessment;
use crate::domain::RiskAssessment;
use crate::features::FeatureBundle;
use crate::io::ingest::RowError;
use crate::zones::{SeismicZone, SeismicZoneResolver};

/// Full single-parcel report: inputs, per-hazard table, overall profile,
/// summary and mitigation.
pub fn format_assessment(id: &str, bundle: &FeatureBundle, assessment: &RiskAssessment) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== risk - Parcel {id} ===\n"));
    out.push_str(&format!(
        "Location: {:.4}, {:.4}\n",
        bundle.latitude, bundle.longitude
    ));
    out.push_str(&format!(
        "Terrain: slope={:.1}° (max {:.1}°) | elevation={:.0}m | relief={:.0}m\n",
        bundle.slope, bundle.slope_max, bundle.elevation, bundle.elevation_variation
    ));
    out.push_str(&format!(
        "Environment: ndvi={:.2} | water={:.0}% | cover={}\n",
        bundle.vegetation_index,
        bundle.water_occurrence,
        bundle.land_cover.display_name()
    ));

    out.push_str("\nHazards:\n");
    out.push_str(
        format!(
            "{:<11} {:>6} {:>4} {:<10} {}\n",
            "hazard", "score", "sev", "level", "dominant factor"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<11} {:-<6} {:-<4} {:-<10} {:-<40}\n", "", "", "", "", "").trim_end(),
    );
    out.push('\n');
    for r in assessment.results() {
        let flag = if r.is_flagged() { "!" } else { " " };
        out.push_str(
            format!(
                "{:<11} {:>6.1} {:>3}{flag} {:<10} {}\n",
                r.hazard.display_name(),
                r.score,
                r.severity,
                r.level.display_name(),
                truncate(r.primary_factors.first().map(String::as_str).unwrap_or(""), 60),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    let overall = &assessment.overall;
    out.push_str("\nOverall:\n");
    out.push_str(&format!(
        "- level: {} | mean severity: {:.2}/5 | high: {} | medium: {} | assessed: {}\n",
        overall.overall_level.display_name(),
        overall.mean_severity,
        overall.high_risk_count,
        overall.medium_risk_count,
        overall.total_risks_assessed,
    ));

    out.push_str("\nSummary:\n");
    for line in &assessment.summary {
        out.push_str(&format!("- {line}\n"));
    }

    out.push_str("\nMitigation:\n");
    for line in &assessment.mitigation {
        out.push_str(&format!("- {line}\n"));
    }

    out
}

/// Detail block for each flagged hazard (description, impact, factors).
pub fn format_flagged_details(assessment: &RiskAssessment) -> String {
    let mut out = String::new();
    for r in assessment.results().filter(|r| r.is_flagged()) {
        out.push_str(&format!(
            "\n{} ({}, {:.1}/100)\n",
            r.hazard.display_name(),
            r.level.display_name(),
            r.score
        ));
        out.push_str(&format!("  {}\n", r.description));
        out.push_str(&format!("  impact: {}\n", r.impact));
        for factor in &r.primary_factors {
            out.push_str(&format!("  * {factor}\n"));
        }
    }
    out
}

/// One line per parcel.
pub fn format_batch_table(outcomes: &[ParcelAssessment]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<20} {:>9} {:>9} {:<10} {:>5} {:>4} {:>4} {}\n",
            "id", "lat", "lon", "overall", "mean", "high", "med", "flagged"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<20} {:-<9} {:-<9} {:-<10} {:-<5} {:-<4} {:-<4} {:-<20}\n",
            "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for p in outcomes {
        let overall = &p.assessment.overall;
        let flagged: Vec<&str> = overall.flagged_risks.iter().map(|f| f.hazard.key()).collect();
        out.push_str(
            format!(
                "{:<20} {:>9.4} {:>9.4} {:<10} {:>5.2} {:>4} {:>4} {}\n",
                truncate(&p.id, 20),
                p.features.latitude,
                p.features.longitude,
                overall.overall_level.display_name(),
                overall.mean_severity,
                overall.high_risk_count,
                overall.medium_risk_count,
                flagged.join(","),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Skipped-row report for CSV ingest.
pub fn format_row_errors(errors: &[RowError]) -> String {
    let mut out = String::new();
    if errors.is_empty() {
        return out;
    }
    out.push_str(&format!("Skipped rows ({}):\n", errors.len()));
    for e in errors {
        match &e.id {
            Some(id) => out.push_str(&format!("  line {} [{id}]: {}\n", e.line, e.message)),
            None => out.push_str(&format!("  line {}: {}\n", e.line, e.message)),
        }
    }
    out
}

/// Zone lookup result plus the rule tables that were consulted.
pub fn format_zone(latitude: f64, longitude: f64, zone: &SeismicZone, resolver: &SeismicZoneResolver) -> String {
    let mut out = String::new();
    out.push_str(&format!("Location: {latitude:.4}, {longitude:.4}\n"));
    if zone.is_unknown() {
        out.push_str(&format!(
            "Seismic zone: {} (outside mapped regions, {} hazard by default)\n",
            zone.label,
            zone.class.display_name()
        ));
    } else {
        out.push_str(&format!(
            "Seismic zone: {} | region: {} | hazard: {}\n",
            zone.label,
            zone.region,
            zone.class.display_name()
        ));
    }
    let regions: Vec<&str> = resolver.regions().iter().map(|r| r.region.as_str()).collect();
    out.push_str(&format!("Regions consulted: {}\n", regions.join(", ")));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
