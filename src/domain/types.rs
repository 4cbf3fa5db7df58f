//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the feature adapter, the scorers and the aggregator
//! - exported to JSON/CSV
//! - compared bit-for-bit in tests (assessments carry no hidden state)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::RawFeatures;

/// Severity tier (1 = very low, 5 = very high).
pub type Severity = u8;

/// Lowest severity a hazard can be assigned.
pub const MIN_SEVERITY: Severity = 1;
/// Highest severity a hazard can be assigned.
pub const MAX_SEVERITY: Severity = 5;
/// Severity at or above which a hazard is flagged and gets a recommendation.
pub const FLAG_SEVERITY: Severity = 3;
/// Severity at or above which a hazard counts as a high risk.
pub const HIGH_SEVERITY: Severity = 4;

/// The seven hazard categories.
///
/// Declaration order is the canonical enumeration order: it drives map ordering,
/// flagged-risk ordering and every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardType {
    Flood,
    Landslide,
    Erosion,
    Seismic,
    Drought,
    Wildfire,
    Subsidence,
}

impl HazardType {
    pub const ALL: [HazardType; 7] = [
        HazardType::Flood,
        HazardType::Landslide,
        HazardType::Erosion,
        HazardType::Seismic,
        HazardType::Drought,
        HazardType::Wildfire,
        HazardType::Subsidence,
    ];

    /// Stable machine key (matches the serialized form).
    pub fn key(self) -> &'static str {
        match self {
            HazardType::Flood => "flood",
            HazardType::Landslide => "landslide",
            HazardType::Erosion => "erosion",
            HazardType::Seismic => "seismic",
            HazardType::Drought => "drought",
            HazardType::Wildfire => "wildfire",
            HazardType::Subsidence => "subsidence",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            HazardType::Flood => "Flood",
            HazardType::Landslide => "Landslide",
            HazardType::Erosion => "Erosion",
            HazardType::Seismic => "Seismic",
            HazardType::Drought => "Drought",
            HazardType::Wildfire => "Wildfire",
            HazardType::Subsidence => "Subsidence",
        }
    }
}

/// Discrete risk level, one per severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Map a severity tier to its level. Out-of-range tiers saturate.
    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            0 | 1 => RiskLevel::VeryLow,
            2 => RiskLevel::Low,
            3 => RiskLevel::Medium,
            4 => RiskLevel::High,
            _ => RiskLevel::VeryHigh,
        }
    }

    /// Serialized form (`"very_high"`, ...).
    pub fn key(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "very_low",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }

    /// Index into per-tier text tables (0 = very low).
    pub(crate) fn tier_index(self) -> usize {
        match self {
            RiskLevel::VeryLow => 0,
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::VeryHigh => 4,
        }
    }
}

/// Dominant land-cover class, using the ESA WorldCover legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandCover {
    TreeCover,
    Shrubland,
    Grassland,
    Cropland,
    BuiltUp,
    Bare,
    SnowIce,
    Water,
    Wetland,
    Mangroves,
    MossLichen,
    #[default]
    Unknown,
}

impl LandCover {
    pub const ALL: [LandCover; 12] = [
        LandCover::TreeCover,
        LandCover::Shrubland,
        LandCover::Grassland,
        LandCover::Cropland,
        LandCover::BuiltUp,
        LandCover::Bare,
        LandCover::SnowIce,
        LandCover::Water,
        LandCover::Wetland,
        LandCover::Mangroves,
        LandCover::MossLichen,
        LandCover::Unknown,
    ];

    /// WorldCover class code (`None` for `Unknown`).
    pub fn code(self) -> Option<u16> {
        match self {
            LandCover::TreeCover => Some(10),
            LandCover::Shrubland => Some(20),
            LandCover::Grassland => Some(30),
            LandCover::Cropland => Some(40),
            LandCover::BuiltUp => Some(50),
            LandCover::Bare => Some(60),
            LandCover::SnowIce => Some(70),
            LandCover::Water => Some(80),
            LandCover::Wetland => Some(90),
            LandCover::Mangroves => Some(95),
            LandCover::MossLichen => Some(100),
            LandCover::Unknown => None,
        }
    }

    pub fn from_code(code: u16) -> Self {
        LandCover::ALL
            .into_iter()
            .find(|c| c.code() == Some(code))
            .unwrap_or(LandCover::Unknown)
    }

    /// Parse a class name (`"tree_cover"`, `"Built-up"`, ...) or a numeric code.
    ///
    /// Unrecognised input maps to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if let Ok(code) = normalized.parse::<u16>() {
            return LandCover::from_code(code);
        }
        match normalized.as_str() {
            "tree_cover" | "trees" | "forest" => LandCover::TreeCover,
            "shrubland" | "shrub" => LandCover::Shrubland,
            "grassland" | "grass" => LandCover::Grassland,
            "cropland" | "crops" | "agriculture" => LandCover::Cropland,
            "built_up" | "builtup" | "urban" => LandCover::BuiltUp,
            "bare" | "bare_sparse_vegetation" | "barren" => LandCover::Bare,
            "snow_ice" | "snow_and_ice" | "snow" => LandCover::SnowIce,
            "water" | "permanent_water_bodies" => LandCover::Water,
            "wetland" | "herbaceous_wetland" => LandCover::Wetland,
            "mangroves" | "mangrove" => LandCover::Mangroves,
            "moss_lichen" | "moss_and_lichen" => LandCover::MossLichen,
            _ => LandCover::Unknown,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LandCover::TreeCover => "tree cover",
            LandCover::Shrubland => "shrubland",
            LandCover::Grassland => "grassland",
            LandCover::Cropland => "cropland",
            LandCover::BuiltUp => "built-up",
            LandCover::Bare => "bare / sparse vegetation",
            LandCover::SnowIce => "snow and ice",
            LandCover::Water => "permanent water",
            LandCover::Wetland => "herbaceous wetland",
            LandCover::Mangroves => "mangroves",
            LandCover::MossLichen => "moss and lichen",
            LandCover::Unknown => "unknown cover",
        }
    }
}

/// A representative point for a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub latitude: f64,
    pub longitude: f64,
}

/// Opaque handle to a parcel's spatial extent.
///
/// The engine only ever asks it for a centroid-like point; projection and
/// shape are not interpreted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParcelGeometry {
    Point {
        latitude: f64,
        longitude: f64,
    },
    /// Outer ring as `[longitude, latitude]` pairs (GeoJSON axis order).
    Polygon { ring: Vec<[f64; 2]> },
    #[default]
    Unknown,
}

impl ParcelGeometry {
    pub fn point(latitude: f64, longitude: f64) -> Self {
        ParcelGeometry::Point { latitude, longitude }
    }

    /// Centroid of the geometry, if it has one with finite coordinates.
    ///
    /// Polygons use the vertex mean; an explicitly closed ring does not count
    /// its closing vertex twice.
    pub fn centroid(&self) -> Option<Centroid> {
        match self {
            ParcelGeometry::Point { latitude, longitude } => {
                (latitude.is_finite() && longitude.is_finite()).then_some(Centroid {
                    latitude: *latitude,
                    longitude: *longitude,
                })
            }
            ParcelGeometry::Polygon { ring } => {
                let mut vertices: &[[f64; 2]] = ring;
                if vertices.len() > 1 && vertices.first() == vertices.last() {
                    vertices = &vertices[..vertices.len() - 1];
                }
                let finite: Vec<&[f64; 2]> = vertices
                    .iter()
                    .filter(|v| v[0].is_finite() && v[1].is_finite())
                    .collect();
                if finite.is_empty() {
                    return None;
                }
                let n = finite.len() as f64;
                let lon = finite.iter().map(|v| v[0]).sum::<f64>() / n;
                let lat = finite.iter().map(|v| v[1]).sum::<f64>() / n;
                Some(Centroid {
                    latitude: lat,
                    longitude: lon,
                })
            }
            ParcelGeometry::Unknown => None,
        }
    }
}

/// Output of one hazard scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub hazard: HazardType,
    /// Clamped to `[0, 100]`, rounded to one decimal.
    pub score: f64,
    pub severity: Severity,
    pub level: RiskLevel,
    pub description: String,
    pub impact: String,
    /// Contributing factors, strongest first.
    pub primary_factors: Vec<String>,
    /// Mitigation guidance; empty below the flag severity.
    pub recommendation: String,
}

impl RiskResult {
    pub fn is_flagged(&self) -> bool {
        self.severity >= FLAG_SEVERITY
    }
}

/// Compact view of a hazard that made it into the flagged list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedRisk {
    pub hazard: HazardType,
    pub severity: Severity,
    pub level: RiskLevel,
    pub score: f64,
}

/// Aggregate view over the seven hazard results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRiskProfile {
    pub overall_level: RiskLevel,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub mean_severity: f64,
    pub total_risks_assessed: usize,
    /// Hazards with severity >= 3, in hazard enumeration order.
    pub flagged_risks: Vec<FlaggedRisk>,
}

/// Complete result of one assessment.
///
/// Serializes as one object with a key per hazard plus `overall`, `summary`
/// and `mitigation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    #[serde(flatten)]
    pub hazards: BTreeMap<HazardType, RiskResult>,
    pub overall: OverallRiskProfile,
    pub summary: Vec<String>,
    pub mitigation: Vec<String>,
}

impl RiskAssessment {
    pub fn result(&self, hazard: HazardType) -> Option<&RiskResult> {
        self.hazards.get(&hazard)
    }

    /// Results in hazard enumeration order.
    pub fn results(&self) -> impl Iterator<Item = &RiskResult> {
        self.hazards.values()
    }
}

/// One parcel to assess: an identifier, its geometry and raw feature maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParcelInput {
    pub id: String,
    pub geometry: ParcelGeometry,
    pub features: RawFeatures,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn land_cover_parses_names_and_codes() {
        assert_eq!(LandCover::parse("tree_cover"), LandCover::TreeCover);
        assert_eq!(LandCover::parse("Built-up"), LandCover::BuiltUp);
        assert_eq!(LandCover::parse(" 90 "), LandCover::Wetland);
        assert_eq!(LandCover::parse("95"), LandCover::Mangroves);
        assert_eq!(LandCover::parse("lava"), LandCover::Unknown);
        assert_eq!(LandCover::parse("42"), LandCover::Unknown);
    }

    #[test]
    fn polygon_centroid_ignores_closing_vertex() {
        let geometry = ParcelGeometry::Polygon {
            ring: vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]],
        };
        let c = geometry.centroid().unwrap();
        assert!((c.latitude - 1.0).abs() < 1e-12);
        assert!((c.longitude - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_geometries_have_no_centroid() {
        assert!(ParcelGeometry::Unknown.centroid().is_none());
        assert!(ParcelGeometry::Polygon { ring: vec![] }.centroid().is_none());
        assert!(ParcelGeometry::point(f64::NAN, 3.0).centroid().is_none());
    }

    #[test]
    fn level_follows_severity() {
        assert_eq!(RiskLevel::from_severity(1), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_severity(3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_severity(5), RiskLevel::VeryHigh);
    }

    #[test]
    fn hazard_keys_match_serde() {
        for hazard in HazardType::ALL {
            let json = serde_json::to_string(&hazard).unwrap();
            assert_eq!(json, format!("\"{}\"", hazard.key()));
        }
    }
}
