//! Scoring configuration.
//!
//! Every coefficient, cut-off and threshold table the scorers use lives here so
//! that the weighting can be tuned without touching scorer code. Defaults are
//! calibrated against the documented severity bands; a JSON file may override
//! any subset of fields (missing fields keep their defaults).
//!
//! Resolution order for the config file:
//! 1. explicit `--config <path>`
//! 2. `RISK_CONFIG` (environment or `.env`)
//! 3. built-in defaults

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::LandCover;
use crate::error::AppError;
use crate::hazard::SeverityThresholds;
use crate::zones::{RegionRules, SeismicZoneResolver};

pub const CONFIG_ENV_VAR: &str = "RISK_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodWeights {
    /// Points per percent of water occurrence.
    pub water_weight: f64,
    pub flat_slope_deg: f64,
    pub flat_bonus: f64,
    pub gentle_slope_deg: f64,
    pub gentle_bonus: f64,
    pub lowland_elevation_m: f64,
    /// Lowland bonus only applies above this water occurrence.
    pub lowland_water_min_pct: f64,
    pub lowland_bonus: f64,
    pub thresholds: SeverityThresholds,
}

impl Default for FloodWeights {
    fn default() -> Self {
        Self {
            water_weight: 0.6,
            flat_slope_deg: 2.0,
            flat_bonus: 15.0,
            gentle_slope_deg: 5.0,
            gentle_bonus: 8.0,
            lowland_elevation_m: 50.0,
            lowland_water_min_pct: 10.0,
            lowland_bonus: 20.0,
            thresholds: SeverityThresholds::new([10.0, 20.0, 40.0, 60.0]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandslideWeights {
    pub slope_weight: f64,
    pub slope_cap_deg: f64,
    /// Points per meter of elevation variation.
    pub relief_weight: f64,
    pub relief_cap_m: f64,
    pub steep_max_slope_deg: f64,
    pub steep_max_bonus: f64,
    /// Points removed per unit of positive vegetation index.
    pub vegetation_mitigation: f64,
    pub thresholds: SeverityThresholds,
}

impl Default for LandslideWeights {
    fn default() -> Self {
        Self {
            slope_weight: 1.2,
            slope_cap_deg: 45.0,
            relief_weight: 0.15,
            relief_cap_m: 200.0,
            steep_max_slope_deg: 35.0,
            steep_max_bonus: 10.0,
            vegetation_mitigation: 20.0,
            thresholds: SeverityThresholds::new([15.0, 30.0, 50.0, 70.0]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionWeights {
    pub slope_weight: f64,
    pub slope_cap_deg: f64,
    /// Points at full cover deficit.
    pub cover_weight: f64,
    /// Vegetation index considered fully protective.
    pub healthy_vegetation: f64,
    pub thresholds: SeverityThresholds,
}

impl Default for ErosionWeights {
    fn default() -> Self {
        Self {
            slope_weight: 2.0,
            slope_cap_deg: 30.0,
            cover_weight: 20.0,
            healthy_vegetation: 0.6,
            thresholds: SeverityThresholds::new([10.0, 25.0, 45.0, 60.0]),
        }
    }
}

/// Score assigned to each seismic zone class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeismicWeights {
    pub none: f64,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub very_high: f64,
    pub thresholds: SeverityThresholds,
}

impl Default for SeismicWeights {
    fn default() -> Self {
        Self {
            none: 5.0,
            low: 20.0,
            medium: 35.0,
            high: 55.0,
            very_high: 75.0,
            thresholds: SeverityThresholds::new([10.0, 30.0, 50.0, 70.0]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroughtWeights {
    /// Points at the center of the arid band.
    pub aridity_weight: f64,
    /// Absolute latitude of the subtropical arid belt.
    pub arid_band_center_deg: f64,
    pub arid_band_half_width_deg: f64,
    /// Points at full vegetation shortfall.
    pub vegetation_weight: f64,
    pub healthy_vegetation: f64,
    pub thresholds: SeverityThresholds,
}

impl Default for DroughtWeights {
    fn default() -> Self {
        Self {
            aridity_weight: 60.0,
            arid_band_center_deg: 25.0,
            arid_band_half_width_deg: 15.0,
            vegetation_weight: 25.0,
            healthy_vegetation: 0.4,
            thresholds: SeverityThresholds::new([15.0, 30.0, 50.0, 70.0]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WildfireWeights {
    /// Points per unit of (non-negative) vegetation index.
    pub fuel_weight: f64,
    pub slope_weight: f64,
    pub slope_cap_deg: f64,
    /// Extra points for fire-prone land cover.
    pub cover_bonus: BTreeMap<LandCover, f64>,
    pub thresholds: SeverityThresholds,
}

impl Default for WildfireWeights {
    fn default() -> Self {
        Self {
            fuel_weight: 50.0,
            slope_weight: 1.0,
            slope_cap_deg: 30.0,
            cover_bonus: BTreeMap::from([
                (LandCover::Shrubland, 12.0),
                (LandCover::Grassland, 8.0),
                (LandCover::TreeCover, 8.0),
                (LandCover::Mangroves, 4.0),
            ]),
            thresholds: SeverityThresholds::new([15.0, 30.0, 45.0, 60.0]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsidenceWeights {
    /// Points at sea level (scaled down linearly to the reference elevation).
    pub lowland_weight: f64,
    pub lowland_reference_m: f64,
    pub flat_slope_deg: f64,
    pub flat_lowland_bonus: f64,
    /// Extra points for soft-soil or extraction-prone land cover.
    pub cover_bonus: BTreeMap<LandCover, f64>,
    pub thresholds: SeverityThresholds,
}

impl Default for SubsidenceWeights {
    fn default() -> Self {
        Self {
            lowland_weight: 30.0,
            lowland_reference_m: 100.0,
            flat_slope_deg: 2.0,
            flat_lowland_bonus: 10.0,
            cover_bonus: BTreeMap::from([
                (LandCover::Wetland, 25.0),
                (LandCover::Mangroves, 20.0),
                (LandCover::Water, 15.0),
                (LandCover::BuiltUp, 15.0),
                (LandCover::Cropland, 10.0),
            ]),
            thresholds: SeverityThresholds::new([15.0, 30.0, 50.0, 70.0]),
        }
    }
}

/// All tunable scoring parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub flood: FloodWeights,
    pub landslide: LandslideWeights,
    pub erosion: ErosionWeights,
    pub seismic: SeismicWeights,
    pub drought: DroughtWeights,
    pub wildfire: WildfireWeights,
    pub subsidence: SubsidenceWeights,
    /// Extra seismic regions, consulted after the built-in tables.
    pub seismic_regions: Vec<RegionRules>,
}

impl ScoringConfig {
    /// Load the config from `path`, `RISK_CONFIG`, or defaults (in that order).
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let path: Option<PathBuf> = match path {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var_os(CONFIG_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        };

        let Some(path) = path else {
            log::debug!("no scoring config given, using defaults");
            return Ok(Self::default());
        };

        let config = Self::from_file(&path)?;
        log::info!(
            "loaded scoring config from '{}' ({} extra seismic region(s))",
            path.display(),
            config.seismic_regions.len()
        );
        Ok(config)
    }

    /// Built-in seismic regions followed by the configured ones.
    pub fn zone_resolver(&self) -> SeismicZoneResolver {
        self.seismic_regions
            .iter()
            .cloned()
            .fold(SeismicZoneResolver::builtin(), SeismicZoneResolver::with_region)
    }

    /// Read and validate a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::usage(format!("Failed to open scoring config '{}': {e}", path.display()))
        })?;
        let config: ScoringConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AppError::usage(format!("Invalid scoring config '{}': {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-finite or negative coefficients and malformed tables.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();

        let f = &self.flood;
        check_all(
            "flood",
            &[
                ("water_weight", f.water_weight),
                ("flat_slope_deg", f.flat_slope_deg),
                ("flat_bonus", f.flat_bonus),
                ("gentle_slope_deg", f.gentle_slope_deg),
                ("gentle_bonus", f.gentle_bonus),
                ("lowland_elevation_m", f.lowland_elevation_m),
                ("lowland_water_min_pct", f.lowland_water_min_pct),
                ("lowland_bonus", f.lowland_bonus),
            ],
            &mut problems,
        );
        check_thresholds("flood", &f.thresholds, &mut problems);

        let l = &self.landslide;
        check_all(
            "landslide",
            &[
                ("slope_weight", l.slope_weight),
                ("slope_cap_deg", l.slope_cap_deg),
                ("relief_weight", l.relief_weight),
                ("relief_cap_m", l.relief_cap_m),
                ("steep_max_slope_deg", l.steep_max_slope_deg),
                ("steep_max_bonus", l.steep_max_bonus),
                ("vegetation_mitigation", l.vegetation_mitigation),
            ],
            &mut problems,
        );
        check_thresholds("landslide", &l.thresholds, &mut problems);

        let e = &self.erosion;
        check_all(
            "erosion",
            &[
                ("slope_weight", e.slope_weight),
                ("slope_cap_deg", e.slope_cap_deg),
                ("cover_weight", e.cover_weight),
            ],
            &mut problems,
        );
        check_positive("erosion", "healthy_vegetation", e.healthy_vegetation, &mut problems);
        check_thresholds("erosion", &e.thresholds, &mut problems);

        let s = &self.seismic;
        check_all(
            "seismic",
            &[
                ("none", s.none),
                ("low", s.low),
                ("medium", s.medium),
                ("high", s.high),
                ("very_high", s.very_high),
            ],
            &mut problems,
        );
        check_thresholds("seismic", &s.thresholds, &mut problems);

        let d = &self.drought;
        check_all(
            "drought",
            &[
                ("aridity_weight", d.aridity_weight),
                ("arid_band_center_deg", d.arid_band_center_deg),
                ("vegetation_weight", d.vegetation_weight),
            ],
            &mut problems,
        );
        check_positive("drought", "arid_band_half_width_deg", d.arid_band_half_width_deg, &mut problems);
        check_positive("drought", "healthy_vegetation", d.healthy_vegetation, &mut problems);
        check_thresholds("drought", &d.thresholds, &mut problems);

        let w = &self.wildfire;
        check_all(
            "wildfire",
            &[
                ("fuel_weight", w.fuel_weight),
                ("slope_weight", w.slope_weight),
                ("slope_cap_deg", w.slope_cap_deg),
            ],
            &mut problems,
        );
        check_cover_bonus("wildfire", &w.cover_bonus, &mut problems);
        check_thresholds("wildfire", &w.thresholds, &mut problems);

        let b = &self.subsidence;
        check_all(
            "subsidence",
            &[
                ("lowland_weight", b.lowland_weight),
                ("flat_slope_deg", b.flat_slope_deg),
                ("flat_lowland_bonus", b.flat_lowland_bonus),
            ],
            &mut problems,
        );
        check_positive("subsidence", "lowland_reference_m", b.lowland_reference_m, &mut problems);
        check_cover_bonus("subsidence", &b.cover_bonus, &mut problems);
        check_thresholds("subsidence", &b.thresholds, &mut problems);

        for region in &self.seismic_regions {
            problems.extend(region.problems());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::usage(format!(
                "Invalid scoring config:\n  - {}",
                problems.join("\n  - ")
            )))
        }
    }
}

fn check_all(section: &str, values: &[(&str, f64)], problems: &mut Vec<String>) {
    for &(name, value) in values {
        if !(value.is_finite() && value >= 0.0) {
            problems.push(format!("{section}.{name} must be finite and >= 0 (got {value})"));
        }
    }
}

fn check_positive(section: &str, name: &str, value: f64, problems: &mut Vec<String>) {
    if !(value.is_finite() && value > 0.0) {
        problems.push(format!("{section}.{name} must be finite and > 0 (got {value})"));
    }
}

fn check_thresholds(section: &str, thresholds: &SeverityThresholds, problems: &mut Vec<String>) {
    if let Some(problem) = thresholds.problem() {
        problems.push(format!("{section}.thresholds: {problem}"));
    }
}

fn check_cover_bonus(section: &str, bonus: &BTreeMap<LandCover, f64>, problems: &mut Vec<String>) {
    for (cover, value) in bonus {
        if !(value.is_finite() && *value >= 0.0) {
            problems.push(format!(
                "{section}.cover_bonus.{} must be finite and >= 0 (got {value})",
                cover.display_name()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        ScoringConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"flood": {"water_weight": 0.8}}"#).unwrap();
        assert_eq!(config.flood.water_weight, 0.8);
        assert_eq!(config.flood.flat_bonus, FloodWeights::default().flat_bonus);
        assert_eq!(config.landslide, LandslideWeights::default());
    }

    #[test]
    fn cover_bonus_keys_are_snake_case_names() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"wildfire": {"cover_bonus": {"shrubland": 20.0}}}"#).unwrap();
        assert_eq!(config.wildfire.cover_bonus.get(&LandCover::Shrubland), Some(&20.0));
        assert_eq!(config.wildfire.cover_bonus.len(), 1);
    }

    #[test]
    fn validation_collects_every_problem() {
        let mut config = ScoringConfig::default();
        config.flood.water_weight = f64::NAN;
        config.erosion.healthy_vegetation = 0.0;
        config.seismic.thresholds = SeverityThresholds::new([50.0, 30.0, 60.0, 70.0]);

        let err = config.validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let message = err.to_string();
        assert!(message.contains("flood.water_weight"));
        assert!(message.contains("erosion.healthy_vegetation"));
        assert!(message.contains("seismic.thresholds"));
    }

    #[test]
    fn from_file_reads_extra_regions() {
        let dir = std::env::temp_dir().join(format!("parcel-risk-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("weights.json");
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"{{"seismic_regions": [{{"region": "Test", "rules": [
                {{"label": "Z1", "class": "high", "lat_min": 0, "lat_max": 1, "lon_min": 0, "lon_max": 1}}
            ]}}]}}"#
        )
        .unwrap();

        let config = ScoringConfig::from_file(&path).unwrap();
        assert_eq!(config.seismic_regions.len(), 1);
        assert_eq!(config.seismic_regions[0].rules[0].label, "Z1");

        let resolver = config.zone_resolver();
        assert_eq!(resolver.regions().len(), 2);
        assert_eq!(resolver.resolve(0.5, 0.5).label, "Z1");
        assert_eq!(resolver.resolve(36.75, 3.06).label, "IV");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        let err = ScoringConfig::from_file(Path::new("/nonexistent/weights.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
