//! Seismic zone lookup.
//!
//! Zones are resolved from an ordered table of latitude/longitude band rules,
//! grouped into regional rule sets. Evaluation walks the regions in order and
//! each region's rules top to bottom; the first match wins, so rule order is
//! part of the data. New regions are appended as rule sets, usually from the
//! scoring config, without touching the seismic scorer.

use serde::{Deserialize, Serialize};

pub mod algeria;

/// Categorical seismic hazard of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneClass {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ZoneClass {
    pub fn display_name(self) -> &'static str {
        match self {
            ZoneClass::None => "none",
            ZoneClass::Low => "low",
            ZoneClass::Medium => "medium",
            ZoneClass::High => "high",
            ZoneClass::VeryHigh => "very high",
        }
    }
}

/// Result of a zone lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicZone {
    pub class: ZoneClass,
    /// Zone label within its region (e.g. `"IV"`).
    pub label: String,
    pub region: String,
}

impl SeismicZone {
    /// Classification used when no rule matches.
    pub fn unknown() -> Self {
        Self {
            class: ZoneClass::Low,
            label: "Unknown".to_string(),
            region: "unknown".to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.region == "unknown"
    }
}

/// Latitude/longitude box mapped to a zone.
///
/// The latitude band is half-open, `lat_min < lat <= lat_max`, so a
/// coordinate on a band edge belongs to the band south of it. Longitude
/// bounds are closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRule {
    pub label: String,
    pub class: ZoneClass,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl ZoneRule {
    pub fn new(label: &str, class: ZoneClass, lat: (f64, f64), lon: (f64, f64)) -> Self {
        Self {
            label: label.to_string(),
            class,
            lat_min: lat.0,
            lat_max: lat.1,
            lon_min: lon.0,
            lon_max: lon.1,
        }
    }

    pub fn matches(&self, latitude: f64, longitude: f64) -> bool {
        latitude > self.lat_min
            && latitude <= self.lat_max
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }
}

/// Ordered rules for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRules {
    pub region: String,
    pub rules: Vec<ZoneRule>,
}

impl RegionRules {
    /// Problems with the rule set, empty when it is usable.
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.rules.is_empty() {
            out.push(format!("region '{}' has no rules", self.region));
        }
        for rule in &self.rules {
            let bounds = [rule.lat_min, rule.lat_max, rule.lon_min, rule.lon_max];
            if bounds.iter().any(|b| !b.is_finite()) {
                out.push(format!("region '{}' rule '{}' has non-finite bounds", self.region, rule.label));
            } else if rule.lat_min > rule.lat_max || rule.lon_min > rule.lon_max {
                out.push(format!("region '{}' rule '{}' has inverted bounds", self.region, rule.label));
            }
        }
        out
    }
}

/// Ordered rule table over all known regions.
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicZoneResolver {
    regions: Vec<RegionRules>,
}

impl Default for SeismicZoneResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SeismicZoneResolver {
    /// Resolver over the built-in regional tables.
    pub fn builtin() -> Self {
        Self {
            regions: vec![algeria::rules()],
        }
    }

    /// Resolver with no rules at all; every lookup falls through.
    pub fn empty() -> Self {
        Self { regions: Vec::new() }
    }

    /// Append a region. It is consulted after every region already present.
    pub fn with_region(mut self, region: RegionRules) -> Self {
        self.regions.push(region);
        self
    }

    pub fn regions(&self) -> &[RegionRules] {
        &self.regions
    }

    /// Classify a coordinate. Never fails: unmatched or non-finite input
    /// resolves to `SeismicZone::unknown()`.
    pub fn resolve(&self, latitude: f64, longitude: f64) -> SeismicZone {
        if !(latitude.is_finite() && longitude.is_finite()) {
            return SeismicZone::unknown();
        }

        self.regions
            .iter()
            .find_map(|region| {
                region
                    .rules
                    .iter()
                    .find(|rule| rule.matches(latitude, longitude))
                    .map(|rule| SeismicZone {
                        class: rule.class,
                        label: rule.label.clone(),
                        region: region.region.clone(),
                    })
            })
            .unwrap_or_else(SeismicZone::unknown)
    }
}
