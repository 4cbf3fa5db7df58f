//! Export assessments to JSON or CSV.
//!
//! The JSON export carries the full assessments inside a small envelope; the
//! CSV export flattens each parcel to one spreadsheet-friendly row.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::assess::ParcelAssessment;
use crate::domain::HazardType;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct ExportEnvelope<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    /// RFC 3339, UTC.
    pub generated_at: String,
    pub parcel_count: usize,
    pub parcels: &'a [ParcelAssessment],
}

impl<'a> ExportEnvelope<'a> {
    pub fn new(parcels: &'a [ParcelAssessment]) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            generated_at: chrono::Utc::now().to_rfc3339(),
            parcel_count: parcels.len(),
            parcels,
        }
    }
}

/// Write the JSON envelope to `path` (pretty-printed).
pub fn write_assessments_json(path: &Path, parcels: &[ParcelAssessment]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::output(format!("Failed to create export JSON '{}': {e}", path.display()))
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &ExportEnvelope::new(parcels))
        .map_err(|e| AppError::output(format!("Failed to write export JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to write export JSON: {e}")))
}

/// Write one CSV row per parcel to `path`.
pub fn write_results_csv(path: &Path, parcels: &[ParcelAssessment]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::output(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;
    write_results_csv_to(file, parcels)
}

pub fn write_results_csv_to<W: Write>(out: W, parcels: &[ParcelAssessment]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);

    writer
        .write_record(csv_header())
        .map_err(|e| AppError::output(format!("Failed to write export CSV header: {e}")))?;

    for p in parcels {
        writer
            .write_record(csv_row(p))
            .map_err(|e| AppError::output(format!("Failed to write export CSV row '{}': {e}", p.id)))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))
}

fn csv_header() -> Vec<String> {
    let mut header: Vec<String> = [
        "id",
        "latitude",
        "longitude",
        "overall_level",
        "mean_severity",
        "high_risk_count",
        "medium_risk_count",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for hazard in HazardType::ALL {
        header.push(format!("{}_score", hazard.key()));
        header.push(format!("{}_severity", hazard.key()));
    }
    header.push("flagged".to_string());
    header
}

fn csv_row(p: &ParcelAssessment) -> Vec<String> {
    let overall = &p.assessment.overall;
    let mut row = vec![
        p.id.clone(),
        format!("{:.6}", p.features.latitude),
        format!("{:.6}", p.features.longitude),
        overall.overall_level.key().to_string(),
        format!("{:.2}", overall.mean_severity),
        overall.high_risk_count.to_string(),
        overall.medium_risk_count.to_string(),
    ];
    for hazard in HazardType::ALL {
        match p.assessment.result(hazard) {
            Some(r) => {
                row.push(format!("{:.1}", r.score));
                row.push(r.severity.to_string());
            }
            None => {
                row.push(String::new());
                row.push(String::new());
            }
        }
    }
    let flagged: Vec<&str> = overall.flagged_risks.iter().map(|f| f.hazard.key()).collect();
    row.push(flagged.join(";"));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assess::RiskAssessor;
    use crate::domain::{ParcelGeometry, ParcelInput};
    use crate::features::RawFeatures;
    use serde_json::json;

    fn outcomes() -> Vec<ParcelAssessment> {
        let parcels = vec![
            ParcelInput {
                id: "algiers, centre".to_string(),
                geometry: ParcelGeometry::point(36.75, 3.06),
                features: RawFeatures::default(),
            },
            ParcelInput {
                id: "plain".to_string(),
                geometry: ParcelGeometry::Unknown,
                features: RawFeatures::from_values(json!({"slope": 3}), json!({"ndvi": 0.7})),
            },
        ];
        RiskAssessor::default().assess_batch(&parcels)
    }

    #[test]
    fn csv_has_one_row_per_parcel_and_quotes_ids() {
        let mut buf = Vec::new();
        write_results_csv_to(&mut buf, &outcomes()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,latitude,longitude,overall_level,mean_severity"));
        assert!(lines[0].contains("subsidence_severity"));
        assert!(lines[1].starts_with("\"algiers, centre\",36.750000,3.060000,"));
        assert!(lines[1].ends_with(",seismic;drought"));
        assert!(lines[2].starts_with("plain,0.000000,0.000000,low,"));
    }

    #[test]
    fn csv_header_and_rows_have_equal_width() {
        let parcels = outcomes();
        assert_eq!(csv_header().len(), csv_row(&parcels[0]).len());
        assert_eq!(csv_header().len(), 7 + 2 * 7 + 1);
    }

    #[test]
    fn json_envelope_wraps_assessments() {
        let parcels = outcomes();
        let value = serde_json::to_value(ExportEnvelope::new(&parcels)).unwrap();
        assert_eq!(value["parcel_count"], 2);
        assert_eq!(value["tool"], env!("CARGO_PKG_NAME"));
        let first = &value["parcels"][0];
        assert_eq!(first["id"], "algiers, centre");
        assert_eq!(first["assessment"]["seismic"]["level"], "very_high");
        assert!(first["assessment"]["overall"]["mean_severity"].is_number());
        assert!(value["generated_at"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn unwritable_path_is_an_output_error() {
        let err = write_results_csv(Path::new("/nonexistent/dir/out.csv"), &[]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
