//! Erosion risk: slope plus how far vegetation cover falls short of protective.

use crate::config::ErosionWeights;
use crate::domain::{HazardType, RiskResult};
use crate::features::FeatureBundle;
use crate::hazard::{HazardScorer, HazardTexts, ScoreSheet, shortfall};

const TEXTS: HazardTexts = HazardTexts {
    descriptions: [
        "Minimal erosion risk - stable soil",
        "Low erosion risk - basic measures sufficient",
        "Moderate erosion risk - erosion control recommended",
        "Significant erosion risk - protective measures essential",
        "Severe erosion risk - rapid soil loss expected",
    ],
    impacts: [
        "Negligible soil loss",
        "Minor soil loss; basic erosion control sufficient",
        "Moderate soil loss; erosion control measures recommended",
        "Significant soil loss; terracing and vegetation establishment needed",
        "Severe soil degradation; expensive erosion control required",
    ],
    mitigation: "Plant vegetation, install erosion control structures, terrace slopes",
    calm: "Moderate conditions - standard erosion control sufficient",
};

#[derive(Debug, Clone)]
pub struct ErosionScorer {
    weights: ErosionWeights,
}

impl ErosionScorer {
    pub fn new(weights: ErosionWeights) -> Self {
        Self { weights }
    }
}

impl HazardScorer for ErosionScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Erosion
    }

    fn score(&self, b: &FeatureBundle) -> RiskResult {
        let w = &self.weights;
        let mut sheet = ScoreSheet::default();

        sheet.add(
            w.slope_weight * b.slope.min(w.slope_cap_deg),
            format!("Slope: {:.1}° (runoff)", b.slope),
        );
        sheet.add(
            w.cover_weight * shortfall(b.vegetation_index, w.healthy_vegetation),
            format!("Sparse vegetation cover: NDVI {:.2}", b.vegetation_index),
        );

        sheet.finish(HazardType::Erosion, &w.thresholds, &TEXTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> ErosionScorer {
        ErosionScorer::new(ErosionWeights::default())
    }

    #[test]
    fn default_bundle_is_low() {
        let result = scorer().score(&FeatureBundle::default());
        assert_eq!(result.score, 20.0);
        assert_eq!(result.severity, 2);
    }

    #[test]
    fn steep_bare_slopes_are_very_high() {
        let bundle = FeatureBundle {
            slope: 22.0,
            slope_max: 30.0,
            vegetation_index: 0.05,
            ..FeatureBundle::default()
        };
        let result = scorer().score(&bundle);
        assert_eq!(result.severity, 5);
        assert!(result.description.starts_with("Severe erosion risk"));
    }

    #[test]
    fn healthy_cover_removes_the_vegetation_term() {
        let bundle = FeatureBundle {
            slope: 4.0,
            slope_max: 4.0,
            vegetation_index: 0.75,
            ..FeatureBundle::default()
        };
        let result = scorer().score(&bundle);
        assert_eq!(result.score, 8.0);
        assert_eq!(result.primary_factors, vec!["Slope: 4.0° (runoff)"]);
    }
}
