//! Raw feature maps and their normalization into a `FeatureBundle`.
//!
//! Upstream feature extraction hands over loosely-typed dictionaries: keys may
//! be missing, `null`, numeric strings, or named after older extractors
//! (`slope_avg`, `ndvi_avg`, ...). All of that is resolved here, once, so the
//! scorers only ever see a fully-populated bundle.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::{LandCover, ParcelGeometry};

pub const DEFAULT_SLOPE_DEG: f64 = 0.0;
/// High enough to stay clear of every lowland term.
pub const DEFAULT_ELEVATION_M: f64 = 100.0;
pub const DEFAULT_ELEVATION_VARIATION_M: f64 = 0.0;
pub const DEFAULT_VEGETATION_INDEX: f64 = 0.0;
pub const DEFAULT_WATER_OCCURRENCE_PCT: f64 = 0.0;
pub const DEFAULT_LATITUDE: f64 = 0.0;
pub const DEFAULT_LONGITUDE: f64 = 0.0;

const SLOPE_KEYS: &[&str] = &["slope", "slope_avg"];
const SLOPE_MAX_KEYS: &[&str] = &["slope_max"];
const ELEVATION_KEYS: &[&str] = &["elevation", "elevation_avg", "elevation_mean"];
const ELEVATION_VARIATION_KEYS: &[&str] = &["elevation_variation", "elevation_range", "elevation_std"];
const ELEVATION_MIN_KEYS: &[&str] = &["elevation_min"];
const ELEVATION_MAX_KEYS: &[&str] = &["elevation_max"];
const VEGETATION_KEYS: &[&str] = &["vegetation_index", "ndvi", "ndvi_avg"];
const WATER_KEYS: &[&str] = &["water_occurrence", "water_occurrence_avg"];
const LAND_COVER_KEYS: &[&str] = &["land_cover_class", "land_cover", "dominant_cover"];
const LAND_COVER_HISTOGRAM_KEY: &str = "land_cover_distribution";

/// Every key the terrain map is read from.
pub const TERRAIN_KEYS: &[&str] = &[
    "slope",
    "slope_avg",
    "slope_max",
    "elevation",
    "elevation_avg",
    "elevation_mean",
    "elevation_variation",
    "elevation_range",
    "elevation_std",
    "elevation_min",
    "elevation_max",
];

/// Every key the environmental map is read from.
pub const ENVIRONMENTAL_KEYS: &[&str] = &[
    "vegetation_index",
    "ndvi",
    "ndvi_avg",
    "water_occurrence",
    "water_occurrence_avg",
    "land_cover_class",
    "land_cover",
    "dominant_cover",
    "land_cover_distribution",
];

/// Caller-supplied feature dictionaries, as received from upstream extraction.
///
/// Either map may be empty (or `null` in JSON) when the remote backend was
/// unavailable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeatures {
    #[serde(default, deserialize_with = "nullable_map")]
    pub terrain: Map<String, Value>,
    #[serde(default, deserialize_with = "nullable_map")]
    pub environmental: Map<String, Value>,
}

impl RawFeatures {
    pub fn new(terrain: Map<String, Value>, environmental: Map<String, Value>) -> Self {
        Self {
            terrain,
            environmental,
        }
    }

    /// Build from two JSON values; anything that is not an object counts as empty.
    pub fn from_values(terrain: Value, environmental: Value) -> Self {
        Self::new(into_map(terrain), into_map(environmental))
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn nullable_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Canonical, fully-defaulted snapshot of one parcel's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureBundle {
    /// Mean slope, degrees (>= 0).
    pub slope: f64,
    /// Steepest slope in the parcel, degrees (>= `slope`).
    pub slope_max: f64,
    /// Mean elevation, meters.
    pub elevation: f64,
    /// Elevation spread within the parcel, meters (>= 0).
    pub elevation_variation: f64,
    /// NDVI-style vegetation index in `[-1, 1]`.
    pub vegetation_index: f64,
    /// Percentage of time surface water was historically present, `[0, 100]`.
    pub water_occurrence: f64,
    pub land_cover: LandCover,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for FeatureBundle {
    fn default() -> Self {
        Self {
            slope: DEFAULT_SLOPE_DEG,
            slope_max: DEFAULT_SLOPE_DEG,
            elevation: DEFAULT_ELEVATION_M,
            elevation_variation: DEFAULT_ELEVATION_VARIATION_M,
            vegetation_index: DEFAULT_VEGETATION_INDEX,
            water_occurrence: DEFAULT_WATER_OCCURRENCE_PCT,
            land_cover: LandCover::Unknown,
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

impl FeatureBundle {
    /// Normalize raw inputs. Never fails: anything missing takes its default.
    pub fn from_raw(geometry: &ParcelGeometry, raw: &RawFeatures) -> Self {
        let mut defaulted: Vec<&'static str> = Vec::new();
        let terrain = &raw.terrain;
        let env = &raw.environmental;

        let slope = lookup_number(terrain, SLOPE_KEYS)
            .map(|v| v.max(0.0))
            .unwrap_or_else(|| {
                defaulted.push("slope");
                DEFAULT_SLOPE_DEG
            });

        let slope_max = lookup_number(terrain, SLOPE_MAX_KEYS)
            .map(|v| v.max(slope))
            .unwrap_or(slope);

        let elevation = lookup_number(terrain, ELEVATION_KEYS).unwrap_or_else(|| {
            defaulted.push("elevation");
            DEFAULT_ELEVATION_M
        });

        let elevation_variation = lookup_number(terrain, ELEVATION_VARIATION_KEYS)
            .or_else(|| {
                let max = lookup_number(terrain, ELEVATION_MAX_KEYS)?;
                let min = lookup_number(terrain, ELEVATION_MIN_KEYS)?;
                Some(max - min)
            })
            .map(|v| v.max(0.0))
            .unwrap_or_else(|| {
                defaulted.push("elevation_variation");
                DEFAULT_ELEVATION_VARIATION_M
            });

        let vegetation_index = lookup_number(env, VEGETATION_KEYS)
            .map(|v| v.clamp(-1.0, 1.0))
            .unwrap_or_else(|| {
                defaulted.push("vegetation_index");
                DEFAULT_VEGETATION_INDEX
            });

        let water_occurrence = lookup_number(env, WATER_KEYS)
            .map(|v| v.clamp(0.0, 100.0))
            .unwrap_or_else(|| {
                defaulted.push("water_occurrence");
                DEFAULT_WATER_OCCURRENCE_PCT
            });

        let land_cover = lookup_land_cover(env).unwrap_or_else(|| {
            defaulted.push("land_cover");
            LandCover::Unknown
        });

        let (latitude, longitude) = match geometry.centroid() {
            Some(c) => (c.latitude, c.longitude),
            None => {
                defaulted.push("location");
                (DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
            }
        };

        if !defaulted.is_empty() {
            log::debug!("feature bundle defaults applied for: {}", defaulted.join(", "));
        }

        Self {
            slope,
            slope_max,
            elevation,
            elevation_variation,
            vegetation_index,
            water_occurrence,
            land_cover,
            latitude,
            longitude,
        }
    }
}

/// First key holding a finite number (JSON number or numeric string).
fn lookup_number(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| map.get(*key).and_then(as_finite))
}

fn as_finite(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn lookup_land_cover(env: &Map<String, Value>) -> Option<LandCover> {
    let named = LAND_COVER_KEYS.iter().find_map(|key| {
        let cover = match env.get(*key)? {
            Value::String(s) => LandCover::parse(s),
            Value::Number(n) => cover_code(n).map(LandCover::from_code).unwrap_or_default(),
            _ => LandCover::Unknown,
        };
        (cover != LandCover::Unknown).then_some(cover)
    });

    named.or_else(|| dominant_from_histogram(env.get(LAND_COVER_HISTOGRAM_KEY)?))
}

/// Class code from a JSON number; whole floats such as `40.0` count.
fn cover_code(n: &serde_json::Number) -> Option<u16> {
    if let Some(code) = n.as_u64() {
        return u16::try_from(code).ok();
    }
    let v = n.as_f64()?;
    (v.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&v)).then_some(v as u16)
}

/// Dominant class of a `{code: pixel_count}` histogram.
///
/// Ties resolve to the lower class code so the result is independent of map order.
fn dominant_from_histogram(value: &Value) -> Option<LandCover> {
    let Value::Object(histogram) = value else {
        return None;
    };

    let mut best: Option<(LandCover, f64)> = None;
    for (key, count) in histogram {
        let Some(count) = as_finite(count) else {
            continue;
        };
        let cover = LandCover::parse(key);
        if cover == LandCover::Unknown {
            continue;
        }
        best = match best {
            Some((b, c)) if c > count || (c == count && b.code() <= cover.code()) => Some((b, c)),
            _ => Some((cover, count)),
        };
    }

    best.map(|(cover, _)| cover)
}
