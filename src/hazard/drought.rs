//! Drought risk: proximity to the subtropical arid belt plus vegetation stress.

use crate::config::DroughtWeights;
use crate::domain::{HazardType, RiskResult};
use crate::features::FeatureBundle;
use crate::hazard::{HazardScorer, HazardTexts, ScoreSheet, shortfall};

const TEXTS: HazardTexts = HazardTexts {
    descriptions: [
        "Minimal drought risk - good water resources",
        "Low drought risk - adequate water availability",
        "Moderate drought risk - irrigation may be needed",
        "High drought risk - water resources limited",
        "Extreme drought risk - water scarcity severe",
    ],
    impacts: [
        "Adequate water resources available",
        "Minor water concerns; standard water management sufficient",
        "Moderate water concerns; water conservation recommended",
        "Significant water challenges; irrigation systems essential",
        "Severe water scarcity; expensive water infrastructure required",
    ],
    mitigation: "Install water storage systems, implement water conservation, use drought-resistant landscaping",
    calm: "Humid climate band - adequate rainfall",
};

#[derive(Debug, Clone)]
pub struct DroughtScorer {
    weights: DroughtWeights,
}

impl DroughtScorer {
    pub fn new(weights: DroughtWeights) -> Self {
        Self { weights }
    }

    /// 1 at the center of the arid belt, falling linearly to 0 at its edges.
    fn aridity(&self, latitude: f64) -> f64 {
        let w = &self.weights;
        let distance = (latitude.abs() - w.arid_band_center_deg).abs();
        (1.0 - distance / w.arid_band_half_width_deg).clamp(0.0, 1.0)
    }
}

impl HazardScorer for DroughtScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Drought
    }

    fn score(&self, b: &FeatureBundle) -> RiskResult {
        let w = &self.weights;
        let mut sheet = ScoreSheet::default();

        sheet.add(
            w.aridity_weight * self.aridity(b.latitude),
            format!("Arid climate band at {:.1}° latitude", b.latitude),
        );
        sheet.add(
            w.vegetation_weight * shortfall(b.vegetation_index, w.healthy_vegetation),
            format!("Low vegetation: NDVI {:.2} (water stress indicator)", b.vegetation_index),
        );

        sheet.finish(HazardType::Drought, &w.thresholds, &TEXTS)
    }
}
