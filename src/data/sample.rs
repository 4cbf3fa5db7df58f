//! Synthetic parcel generation.
//!
//! Parcels are drawn across the built-in seismic region's bounding box so demo
//! runs touch every zone. Features arrive as raw maps, with a share of them
//! deliberately left out so the defaulting path gets exercised too.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde_json::{Map, Value, json};

use crate::domain::{LandCover, ParcelGeometry, ParcelInput};
use crate::error::AppError;
use crate::features::RawFeatures;

/// Latitude range of generated parcels (degrees north).
const LAT_RANGE: (f64, f64) = (19.0, 37.4);
/// Longitude range of generated parcels (degrees east).
const LON_RANGE: (f64, f64) = (-8.5, 11.9);

/// Land-cover classes drawn for generated parcels, with relative weights.
const COVER_WEIGHTS: [(LandCover, u32); 8] = [
    (LandCover::Bare, 30),
    (LandCover::Shrubland, 15),
    (LandCover::Grassland, 12),
    (LandCover::Cropland, 15),
    (LandCover::BuiltUp, 10),
    (LandCover::TreeCover, 10),
    (LandCover::Wetland, 4),
    (LandCover::Water, 4),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    /// Probability that any single feature is omitted.
    pub drop_probability: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 20,
            seed: 42,
            drop_probability: 0.1,
        }
    }
}

pub fn generate_parcels(config: &SampleConfig) -> Result<Vec<ParcelInput>, AppError> {
    if config.count == 0 {
        return Err(AppError::usage("Sample count must be > 0."));
    }
    if !(0.0..1.0).contains(&config.drop_probability) {
        return Err(AppError::usage("Drop probability must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    // Parcel relief in meters; folded at zero.
    let relief = Normal::new(60.0_f64, 50.0)
        .map_err(|e| AppError::usage(format!("Relief distribution error: {e}")))?;
    let total_weight: u32 = COVER_WEIGHTS.iter().map(|(_, w)| w).sum();

    let mut parcels = Vec::with_capacity(config.count);
    for i in 0..config.count {
        let latitude = rng.gen_range(LAT_RANGE.0..=LAT_RANGE.1);
        let longitude = rng.gen_range(LON_RANGE.0..=LON_RANGE.1);

        // Coastal north is hilly and green, the south flat and dry.
        let northness = (latitude - LAT_RANGE.0) / (LAT_RANGE.1 - LAT_RANGE.0);
        let slope: f64 = rng.gen_range(0.0..(5.0 + 30.0 * northness));
        let slope_max = slope + rng.gen_range(0.0..15.0);
        let elevation: f64 = rng.gen_range(0.0..1500.0);
        let variation: f64 = relief.sample(&mut rng).abs();
        let ndvi: f64 = (rng.gen_range(-0.1..0.3) + 0.45 * northness).clamp(-1.0, 1.0);
        let water: f64 = if rng.gen_bool(0.2) {
            rng.gen_range(5.0..90.0)
        } else {
            rng.gen_range(0.0..5.0)
        };
        let cover = pick_cover(&mut rng, total_weight);

        let mut terrain = Map::new();
        let mut environmental = Map::new();
        let put = |map: &mut Map<String, Value>, key: &str, value: Value, rng: &mut StdRng| {
            if !rng.gen_bool(config.drop_probability) {
                map.insert(key.to_string(), value);
            }
        };
        put(&mut terrain, "slope", json!(round2(slope)), &mut rng);
        put(&mut terrain, "slope_max", json!(round2(slope_max)), &mut rng);
        put(&mut terrain, "elevation", json!(round2(elevation)), &mut rng);
        put(&mut terrain, "elevation_variation", json!(round2(variation)), &mut rng);
        put(&mut environmental, "vegetation_index", json!(round2(ndvi)), &mut rng);
        put(&mut environmental, "water_occurrence", json!(round2(water)), &mut rng);
        if let Some(code) = cover.code() {
            put(&mut environmental, "land_cover_class", json!(code), &mut rng);
        }

        parcels.push(ParcelInput {
            id: format!("SYN-{:03}", i + 1),
            geometry: ParcelGeometry::point(round4(latitude), round4(longitude)),
            features: RawFeatures::new(terrain, environmental),
        });
    }

    log::debug!(
        "generated {} synthetic parcels (seed={}, drop={})",
        parcels.len(),
        config.seed,
        config.drop_probability
    );
    Ok(parcels)
}

fn pick_cover(rng: &mut StdRng, total_weight: u32) -> LandCover {
    let mut roll = rng.gen_range(0..total_weight);
    for (cover, weight) in COVER_WEIGHTS {
        if roll < weight {
            return cover;
        }
        roll -= weight;
    }
    LandCover::Bare
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_parcels() {
        let config = SampleConfig::default();
        let a = generate_parcels(&config).unwrap();
        let b = generate_parcels(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        assert_eq!(a[0].id, "SYN-001");

        let other = generate_parcels(&SampleConfig { seed: 43, ..config }).unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn parcels_stay_in_the_sampling_box() {
        let parcels = generate_parcels(&SampleConfig {
            count: 200,
            ..SampleConfig::default()
        })
        .unwrap();
        for p in &parcels {
            let c = p.geometry.centroid().unwrap();
            assert!(c.latitude >= LAT_RANGE.0 && c.latitude <= LAT_RANGE.1);
            assert!(c.longitude >= LON_RANGE.0 && c.longitude <= LON_RANGE.1);
        }
    }

    #[test]
    fn relief_is_folded_to_non_negative_meters() {
        let parcels = generate_parcels(&SampleConfig {
            count: 200,
            drop_probability: 0.0,
            ..SampleConfig::default()
        })
        .unwrap();
        for p in &parcels {
            let variation = p.features.terrain["elevation_variation"].as_f64().unwrap();
            assert!(variation.is_finite() && variation >= 0.0, "{}: {variation}", p.id);
        }
    }

    #[test]
    fn drop_probability_controls_missing_features() {
        let full = generate_parcels(&SampleConfig {
            count: 50,
            drop_probability: 0.0,
            ..SampleConfig::default()
        })
        .unwrap();
        assert!(full.iter().all(|p| p.features.terrain.len() == 4));

        let sparse = generate_parcels(&SampleConfig {
            count: 50,
            drop_probability: 0.9,
            ..SampleConfig::default()
        })
        .unwrap();
        let kept: usize = sparse.iter().map(|p| p.features.terrain.len()).sum();
        assert!(kept < 50 * 4 / 2, "expected most terrain features dropped, kept {kept}");
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let zero = SampleConfig {
            count: 0,
            ..SampleConfig::default()
        };
        assert_eq!(generate_parcels(&zero).unwrap_err().exit_code(), 2);

        let always = SampleConfig {
            drop_probability: 1.0,
            ..SampleConfig::default()
        };
        assert!(generate_parcels(&always).is_err());
    }
}
