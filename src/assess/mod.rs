//! Assessment facade: raw inputs in, full `RiskAssessment` out.
//!
//! The pipeline is fixed:
//!
//! 1. normalize raw maps into one `FeatureBundle`
//! 2. run the seven scorers from the registry
//! 3. aggregate into the overall profile, summary and mitigation list
//!
//! Nothing here can fail; missing data was already absorbed by defaulting.

use rayon::prelude::*;
use serde::Serialize;

use crate::aggregate::RiskAggregator;
use crate::config::ScoringConfig;
use crate::domain::{ParcelGeometry, ParcelInput, RiskAssessment};
use crate::features::{FeatureBundle, RawFeatures};
use crate::hazard::HazardRegistry;

/// One parcel's outcome in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelAssessment {
    pub id: String,
    pub features: FeatureBundle,
    pub assessment: RiskAssessment,
}

pub struct RiskAssessor {
    registry: HazardRegistry,
    aggregator: RiskAggregator,
}

impl RiskAssessor {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            registry: HazardRegistry::from_config(config),
            aggregator: RiskAggregator,
        }
    }

    pub fn assess_all(&self, geometry: &ParcelGeometry, features: &RawFeatures) -> RiskAssessment {
        let bundle = FeatureBundle::from_raw(geometry, features);
        self.assess_bundle(&bundle)
    }

    pub fn assess_bundle(&self, bundle: &FeatureBundle) -> RiskAssessment {
        let hazards = self.registry.score_all(bundle);
        self.aggregator.aggregate(hazards)
    }

    pub fn assess_parcel(&self, parcel: &ParcelInput) -> ParcelAssessment {
        let features = FeatureBundle::from_raw(&parcel.geometry, &parcel.features);
        ParcelAssessment {
            id: parcel.id.clone(),
            features,
            assessment: self.assess_bundle(&features),
        }
    }

    /// Assess many parcels in parallel. Output order matches input order.
    pub fn assess_batch(&self, parcels: &[ParcelInput]) -> Vec<ParcelAssessment> {
        log::info!("Assessing {} parcels", parcels.len());
        parcels.par_iter().map(|p| self.assess_parcel(p)).collect()
    }
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

/// Assess one parcel with the default scoring configuration.
pub fn assess_all(geometry: &ParcelGeometry, features: &RawFeatures) -> RiskAssessment {
    RiskAssessor::default().assess_all(geometry, features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HazardType, LandCover, RiskLevel};
    use rand::prelude::*;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn random_bundle(rng: &mut StdRng) -> FeatureBundle {
        let slope = rng.gen_range(0.0..70.0);
        FeatureBundle {
            slope,
            slope_max: slope + rng.gen_range(0.0..30.0),
            elevation: rng.gen_range(-50.0..3000.0),
            elevation_variation: rng.gen_range(0.0..600.0),
            vegetation_index: rng.gen_range(-1.0..=1.0),
            water_occurrence: rng.gen_range(0.0..=100.0),
            land_cover: LandCover::ALL[rng.gen_range(0..LandCover::ALL.len())],
            latitude: rng.gen_range(-90.0..=90.0),
            longitude: rng.gen_range(-180.0..=180.0),
        }
    }

    #[test]
    fn every_result_stays_in_range() {
        let assessor = RiskAssessor::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let assessment = assessor.assess_bundle(&random_bundle(&mut rng));
            assert_eq!(assessment.hazards.len(), 7);
            for result in assessment.results() {
                assert!(
                    (0.0..=100.0).contains(&result.score),
                    "{:?} score out of range: {}",
                    result.hazard,
                    result.score
                );
                assert!((1..=5).contains(&result.severity));
                assert_eq!(result.level, RiskLevel::from_severity(result.severity));
                assert!(!result.primary_factors.is_empty());
            }
            let mean = assessment.overall.mean_severity;
            assert!((1.0..=5.0).contains(&mean), "mean severity {mean}");
        }
    }

    #[test]
    fn empty_inputs_are_fail_safe_low() {
        let assessment = assess_all(&ParcelGeometry::Unknown, &RawFeatures::default());
        for result in assessment.results() {
            assert!(result.severity <= 2, "{:?} severity {}", result.hazard, result.severity);
        }
        assert_eq!(assessment.overall.overall_level, RiskLevel::Low);
        assert!(assessment.overall.flagged_risks.is_empty());

        let paris = ParcelGeometry::point(48.85, 2.35);
        let assessment = assess_all(&paris, &RawFeatures::default());
        assert!(assessment.results().all(|r| r.severity <= 2));
    }

    #[test]
    fn default_bundle_tiers_are_pinned() {
        // Flat terrain and absent vegetation still earn a tier-2 floor here.
        let assessment = assess_all(&ParcelGeometry::Unknown, &RawFeatures::default());
        let tier = |h| assessment.result(h).map(|r| r.severity);
        assert_eq!(tier(HazardType::Flood), Some(2));
        assert_eq!(tier(HazardType::Erosion), Some(2));
        assert_eq!(tier(HazardType::Drought), Some(2));
        assert_eq!(tier(HazardType::Seismic), Some(2));
        assert_eq!(tier(HazardType::Landslide), Some(1));
        assert_eq!(tier(HazardType::Wildfire), Some(1));
        assert_eq!(tier(HazardType::Subsidence), Some(1));
    }

    #[test]
    fn flood_never_drops_as_water_rises() {
        let assessor = RiskAssessor::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let base = random_bundle(&mut rng);
            let mut last = 0.0;
            for pct in (0..=100).step_by(5) {
                let bundle = FeatureBundle {
                    water_occurrence: pct as f64,
                    ..base
                };
                let score = assessor.assess_bundle(&bundle).hazards[&HazardType::Flood].score;
                assert!(score >= last);
                last = score;
            }
        }
    }

    #[test]
    fn assessment_is_idempotent() {
        let geometry = ParcelGeometry::point(36.7, 3.2);
        let raw = RawFeatures::from_values(
            json!({ "slope": 12.0, "elevation": 40.0, "elevation_variation": 80.0 }),
            json!({ "ndvi": 0.3, "water_occurrence": 25.0, "land_cover_class": 40 }),
        );
        let first = assess_all(&geometry, &raw);
        let second = assess_all(&geometry, &raw);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn steep_bare_relief_flags_landslide() {
        let raw = RawFeatures::from_values(
            json!({ "slope": 35.0, "elevation_variation": 150.0 }),
            json!({ "vegetation_index": 0.1 }),
        );
        let assessment = assess_all(&ParcelGeometry::Unknown, &raw);
        let landslide = assessment.result(HazardType::Landslide).unwrap();
        assert!(landslide.severity >= 4);
        assert!(
            assessment
                .overall
                .flagged_risks
                .iter()
                .any(|f| f.hazard == HazardType::Landslide)
        );
    }

    #[test]
    fn algiers_is_seismically_high() {
        let assessment = assess_all(&ParcelGeometry::point(36.75, 3.06), &RawFeatures::default());
        assert!(assessment.result(HazardType::Seismic).unwrap().severity >= 4);
        assert!(assessment.overall.high_risk_count >= 1);
        assert!(assessment.mitigation.iter().any(|m| m.starts_with("Seismic:")));
    }

    #[test]
    fn batch_preserves_input_order() {
        let parcels: Vec<ParcelInput> = (0..40)
            .map(|i| ParcelInput {
                id: format!("P-{i:02}"),
                geometry: ParcelGeometry::point(20.0 + f64::from(i) * 0.5, 3.0),
                features: RawFeatures::from_values(json!({ "slope": i }), json!({})),
            })
            .collect();
        let assessor = RiskAssessor::default();
        let results = assessor.assess_batch(&parcels);
        assert_eq!(results.len(), parcels.len());
        for (parcel, outcome) in parcels.iter().zip(&results) {
            assert_eq!(parcel.id, outcome.id);
            assert_eq!(outcome.assessment, assessor.assess_parcel(parcel).assessment);
        }
    }
}
