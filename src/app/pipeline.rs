//! Shared assessment pipeline used by every CLI command.
//!
//! config load -> parcel source (JSON / CSV / synthetic) -> assessor -> outcomes
//!
//! The command handlers then only deal with presentation and exports.

use std::path::Path;

use crate::assess::{ParcelAssessment, RiskAssessor};
use crate::config::ScoringConfig;
use crate::data::{SampleConfig, generate_parcels};
use crate::domain::ParcelInput;
use crate::error::AppError;
use crate::io::ingest::{RowError, read_parcels_csv, read_parcels_json};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub outcomes: Vec<ParcelAssessment>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

pub fn load_assessor(config_path: Option<&Path>) -> Result<RiskAssessor, AppError> {
    let config = ScoringConfig::load(config_path)?;
    Ok(RiskAssessor::new(&config))
}

/// Assess parcels that are already in memory.
pub fn run_parcels(assessor: &RiskAssessor, parcels: &[ParcelInput]) -> RunOutput {
    RunOutput {
        outcomes: assessor.assess_batch(parcels),
        row_errors: Vec::new(),
        rows_read: parcels.len(),
    }
}

pub fn run_json(assessor: &RiskAssessor, path: &Path) -> Result<RunOutput, AppError> {
    let parcels = read_parcels_json(path)?;
    Ok(run_parcels(assessor, &parcels))
}

pub fn run_csv(assessor: &RiskAssessor, path: &Path) -> Result<RunOutput, AppError> {
    let batch = read_parcels_csv(path)?;
    if !batch.row_errors.is_empty() {
        log::warn!(
            "{} of {} CSV rows skipped",
            batch.row_errors.len(),
            batch.rows_read
        );
    }
    Ok(RunOutput {
        outcomes: assessor.assess_batch(&batch.parcels),
        row_errors: batch.row_errors,
        rows_read: batch.rows_read,
    })
}

pub fn run_sample(assessor: &RiskAssessor, sample: &SampleConfig) -> Result<RunOutput, AppError> {
    let parcels = generate_parcels(sample)?;
    Ok(run_parcels(assessor, &parcels))
}
