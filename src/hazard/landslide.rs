//! Landslide risk: slope first, then relief and extreme local slopes;
//! vegetation cover stabilizes and is subtracted.

use crate::config::LandslideWeights;
use crate::domain::{HazardType, RiskResult};
use crate::features::FeatureBundle;
use crate::hazard::{HazardScorer, HazardTexts, ScoreSheet};

const TEXTS: HazardTexts = HazardTexts {
    descriptions: [
        "Minimal landslide risk - stable terrain",
        "Low landslide risk - standard precautions sufficient",
        "Moderate landslide risk - engineering assessment recommended",
        "Significant landslide risk - slope stabilization essential",
        "Critical landslide risk - unstable slopes present",
    ],
    impacts: [
        "Negligible impact on development",
        "Minor impact; standard engineering practices sufficient",
        "Moderate impact; proper grading and retaining walls required",
        "Major constraints on development; expensive slope stabilization needed",
        "Development extremely hazardous; may require relocation or extensive engineering",
    ],
    mitigation: "Implement slope stabilization and retaining walls, avoid construction on the steepest areas",
    calm: "Gentle terrain - landslide risk minimal",
};

#[derive(Debug, Clone)]
pub struct LandslideScorer {
    weights: LandslideWeights,
}

impl LandslideScorer {
    pub fn new(weights: LandslideWeights) -> Self {
        Self { weights }
    }
}

impl HazardScorer for LandslideScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Landslide
    }

    fn score(&self, b: &FeatureBundle) -> RiskResult {
        let w = &self.weights;
        let mut sheet = ScoreSheet::default();

        sheet.add(
            w.slope_weight * b.slope.min(w.slope_cap_deg),
            format!("Average slope: {:.1}°", b.slope),
        );
        sheet.add(
            w.relief_weight * b.elevation_variation.min(w.relief_cap_m),
            format!("Elevation variation: {:.0}m", b.elevation_variation),
        );
        if b.slope_max > w.steep_max_slope_deg {
            sheet.add(
                w.steep_max_bonus,
                format!("Extremely steep areas: {:.1}° maximum", b.slope_max),
            );
        }
        if b.vegetation_index > 0.0 {
            sheet.add(
                -w.vegetation_mitigation * b.vegetation_index,
                format!("Vegetation cover: NDVI {:.2} (stabilizing)", b.vegetation_index),
            );
        }

        sheet.finish(HazardType::Landslide, &w.thresholds, &TEXTS)
    }
}
