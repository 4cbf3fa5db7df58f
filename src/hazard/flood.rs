//! Flood risk: historical water presence dominates, flat and low-lying ground
//! add to it.

use crate::config::FloodWeights;
use crate::domain::{HazardType, RiskResult};
use crate::features::FeatureBundle;
use crate::hazard::{HazardScorer, HazardTexts, ScoreSheet};

const TEXTS: HazardTexts = HazardTexts {
    descriptions: [
        "Minimal flood risk - well-drained area",
        "Low flood risk - flooding unlikely under normal conditions",
        "Moderate flood risk - occasional flooding possible",
        "Significant flood risk - flooding likely during heavy rainfall",
        "Severe flood risk - area experiences frequent flooding",
    ],
    impacts: [
        "Negligible impact on development",
        "Minor impact; standard drainage sufficient",
        "Moderate impact; proper drainage systems recommended",
        "Significant impact on construction and insurance costs; flood mitigation required",
        "May render land undevelopable; requires major flood protection infrastructure",
    ],
    mitigation: "Install comprehensive drainage systems, consider flood insurance, elevate structures",
    calm: "No significant flood indicators detected",
};

#[derive(Debug, Clone)]
pub struct FloodScorer {
    weights: FloodWeights,
}

impl FloodScorer {
    pub fn new(weights: FloodWeights) -> Self {
        Self { weights }
    }
}

impl HazardScorer for FloodScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Flood
    }

    fn score(&self, b: &FeatureBundle) -> RiskResult {
        let w = &self.weights;
        let mut sheet = ScoreSheet::default();

        sheet.add(
            w.water_weight * b.water_occurrence,
            format!("Water occurrence: {:.0}% of observations", b.water_occurrence),
        );

        if b.slope < w.flat_slope_deg {
            sheet.add(w.flat_bonus, format!("Very flat terrain: {:.1}° (poor drainage)", b.slope));
        } else if b.slope < w.gentle_slope_deg {
            sheet.add(w.gentle_bonus, format!("Gentle slope: {:.1}° (slow drainage)", b.slope));
        }

        if b.elevation < w.lowland_elevation_m && b.water_occurrence > w.lowland_water_min_pct {
            sheet.add(
                w.lowland_bonus,
                format!("Low elevation near water: {:.0}m (flood-prone)", b.elevation),
            );
        }

        sheet.finish(HazardType::Flood, &w.thresholds, &TEXTS)
    }
}
