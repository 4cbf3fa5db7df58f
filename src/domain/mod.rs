//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - hazard and level enums (`HazardType`, `RiskLevel`, `LandCover`)
//! - parcel inputs (`ParcelGeometry`, `ParcelInput`)
//! - scoring outputs (`RiskResult`, `OverallRiskProfile`, `RiskAssessment`)

pub mod types;

pub use types::*;
