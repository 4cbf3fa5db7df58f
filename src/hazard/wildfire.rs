//! Wildfire risk: fuel load from vegetation, slope-driven spread, and
//! fire-prone land cover.

use crate::config::WildfireWeights;
use crate::domain::{HazardType, RiskResult};
use crate::features::FeatureBundle;
use crate::hazard::{HazardScorer, HazardTexts, ScoreSheet};

const TEXTS: HazardTexts = HazardTexts {
    descriptions: [
        "Minimal wildfire risk",
        "Low wildfire risk - basic fire safety sufficient",
        "Moderate wildfire risk - fire breaks recommended",
        "Significant wildfire risk - fire prevention essential",
        "Critical wildfire risk - high fuel loads and favorable conditions",
    ],
    impacts: [
        "Negligible fire threat",
        "Minor threat; basic fire safety measures sufficient",
        "Moderate threat; fire-resistant landscaping recommended",
        "Significant threat; fire breaks and defensible space essential",
        "Severe threat to structures; expensive fire protection required",
    ],
    mitigation: "Create defensible space, use fire-resistant materials, maintain fire breaks",
    calm: "Low wildfire risk conditions",
};

#[derive(Debug, Clone)]
pub struct WildfireScorer {
    weights: WildfireWeights,
}

impl WildfireScorer {
    pub fn new(weights: WildfireWeights) -> Self {
        Self { weights }
    }
}

impl HazardScorer for WildfireScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Wildfire
    }

    fn score(&self, b: &FeatureBundle) -> RiskResult {
        let w = &self.weights;
        let mut sheet = ScoreSheet::default();

        sheet.add(
            w.fuel_weight * b.vegetation_index.clamp(0.0, 1.0),
            format!("Vegetation fuel load: NDVI {:.2}", b.vegetation_index),
        );
        sheet.add(
            w.slope_weight * b.slope.min(w.slope_cap_deg),
            format!("Slope: {:.1}° (fire spreads uphill)", b.slope),
        );
        if let Some(&bonus) = w.cover_bonus.get(&b.land_cover) {
            sheet.add(bonus, format!("Fire-prone land cover: {}", b.land_cover.display_name()));
        }

        sheet.finish(HazardType::Wildfire, &w.thresholds, &TEXTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LandCover;

    fn scorer() -> WildfireScorer {
        WildfireScorer::new(WildfireWeights::default())
    }

    #[test]
    fn bare_flat_ground_is_minimal() {
        let result = scorer().score(&FeatureBundle::default());
        assert_eq!(result.score, 0.0);
        assert_eq!(result.severity, 1);
        assert_eq!(result.primary_factors, vec!["Low wildfire risk conditions"]);
    }

    #[test]
    fn dense_shrubland_on_slopes_is_very_high() {
        let bundle = FeatureBundle {
            vegetation_index: 0.6,
            slope: 18.0,
            slope_max: 25.0,
            land_cover: LandCover::Shrubland,
            ..FeatureBundle::default()
        };
        let result = scorer().score(&bundle);
        // 30 + 18 + 12
        assert_eq!(result.score, 60.0);
        assert_eq!(result.severity, 5);
        assert!(result.primary_factors.iter().any(|f| f.contains("shrubland")));
    }

    #[test]
    fn denser_fuel_never_lowers_the_score() {
        let s = scorer();
        let sparse = FeatureBundle {
            vegetation_index: 0.2,
            slope: 10.0,
            slope_max: 10.0,
            ..FeatureBundle::default()
        };
        let dense = FeatureBundle {
            vegetation_index: 0.8,
            ..sparse
        };
        assert!(s.score(&dense).score > s.score(&sparse).score);
    }
}
