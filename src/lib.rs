//! `parcel-risk` library crate.
//!
//! Scores a land parcel against seven environmental hazards (flood, landslide,
//! erosion, seismic, drought, wildfire, subsidence) and aggregates the results
//! into an overall risk profile.
//!
//! The binary (`risk`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the scoring engine can be embedded without the CLI
//!
//! ```no_run
//! use parcel_risk::{ParcelGeometry, RawFeatures, assess_all};
//!
//! let assessment = assess_all(&ParcelGeometry::point(36.75, 3.06), &RawFeatures::default());
//! println!("{:?}", assessment.overall.overall_level);
//! ```

pub mod aggregate;
pub mod app;
pub mod assess;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod hazard;
pub mod io;
pub mod report;
pub mod zones;

pub use assess::{ParcelAssessment, RiskAssessor, assess_all};
pub use config::ScoringConfig;
pub use domain::{HazardType, ParcelGeometry, RiskAssessment, RiskLevel, RiskResult};
pub use error::AppError;
pub use features::{FeatureBundle, RawFeatures};
