//! Subsidence risk: low-lying ground, flat sediment plains and soft-soil or
//! extraction-prone land cover.

use crate::config::SubsidenceWeights;
use crate::domain::{HazardType, RiskResult};
use crate::features::FeatureBundle;
use crate::hazard::{HazardScorer, HazardTexts, ScoreSheet, shortfall};

const TEXTS: HazardTexts = HazardTexts {
    descriptions: [
        "Minimal subsidence risk",
        "Low subsidence risk - standard foundation practices",
        "Moderate subsidence risk - foundation assessment recommended",
        "Elevated subsidence risk - soil investigation required",
        "Severe subsidence risk - ground settlement likely",
    ],
    impacts: [
        "Negligible subsidence expected",
        "Minor settling possible; standard foundations sufficient",
        "Possible settling; foundation monitoring recommended",
        "Potential structural damage; deep foundations may be required",
        "Likely structural damage; specialised foundations and ground improvement required",
    ],
    mitigation: "Conduct soil investigation, use deep foundations, monitor for settling",
    calm: "Terrain characteristics suggest low subsidence risk",
};

#[derive(Debug, Clone)]
pub struct SubsidenceScorer {
    weights: SubsidenceWeights,
}

impl SubsidenceScorer {
    pub fn new(weights: SubsidenceWeights) -> Self {
        Self { weights }
    }
}

impl HazardScorer for SubsidenceScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Subsidence
    }

    fn score(&self, b: &FeatureBundle) -> RiskResult {
        let w = &self.weights;
        let mut sheet = ScoreSheet::default();

        sheet.add(
            w.lowland_weight * shortfall(b.elevation, w.lowland_reference_m),
            format!("Low elevation: {:.0}m", b.elevation),
        );
        if b.slope < w.flat_slope_deg && b.elevation < w.lowland_reference_m {
            sheet.add(
                w.flat_lowland_bonus,
                format!("Flat low-lying ground: {:.1}° (possible soft sediments)", b.slope),
            );
        }
        if let Some(&bonus) = w.cover_bonus.get(&b.land_cover) {
            sheet.add(bonus, format!("Soil-prone land cover: {}", b.land_cover.display_name()));
        }

        sheet.finish(HazardType::Subsidence, &w.thresholds, &TEXTS)
    }
}
