//! Seismic risk: a categorical lookup of the parcel location.

use crate::config::SeismicWeights;
use crate::domain::{HazardType, RiskResult};
use crate::features::FeatureBundle;
use crate::hazard::{HazardScorer, HazardTexts, ScoreSheet};
use crate::zones::{SeismicZoneResolver, ZoneClass};

const TEXTS: HazardTexts = HazardTexts {
    descriptions: [
        "Negligible seismic activity",
        "Low seismic activity - basic seismic precautions sufficient",
        "Moderate seismic activity - seismic design required",
        "Significant seismic activity - moderate to strong earthquakes likely",
        "Very high seismic activity - major earthquakes possible",
    ],
    impacts: [
        "No specific seismic provisions needed",
        "Basic seismic provisions sufficient",
        "Seismic design standards must be followed",
        "Seismic-resistant design essential; increased construction costs",
        "Strict seismic design required; significantly higher construction costs",
    ],
    mitigation: "Follow seismic building codes, use flexible foundations, conduct soil analysis",
    calm: "No mapped seismic source",
};

#[derive(Debug, Clone)]
pub struct SeismicScorer {
    weights: SeismicWeights,
    resolver: SeismicZoneResolver,
}

impl SeismicScorer {
    pub fn new(weights: SeismicWeights, resolver: SeismicZoneResolver) -> Self {
        Self { weights, resolver }
    }

    fn zone_points(&self, class: ZoneClass) -> f64 {
        let w = &self.weights;
        match class {
            ZoneClass::None => w.none,
            ZoneClass::Low => w.low,
            ZoneClass::Medium => w.medium,
            ZoneClass::High => w.high,
            ZoneClass::VeryHigh => w.very_high,
        }
    }
}

impl HazardScorer for SeismicScorer {
    fn hazard(&self) -> HazardType {
        HazardType::Seismic
    }

    fn score(&self, b: &FeatureBundle) -> RiskResult {
        let zone = self.resolver.resolve(b.latitude, b.longitude);
        let mut sheet = ScoreSheet::default();

        let note = if zone.is_unknown() {
            "Outside mapped seismic regions (default low classification)".to_string()
        } else {
            format!(
                "Seismic zone {} ({}, {} hazard)",
                zone.label,
                zone.region,
                zone.class.display_name()
            )
        };
        sheet.add(self.zone_points(zone.class), note);
        sheet.note(format!("Location: {:.2}, {:.2}", b.latitude, b.longitude));

        sheet.finish(HazardType::Seismic, &self.weights.thresholds, &TEXTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SeismicScorer {
        SeismicScorer::new(SeismicWeights::default(), SeismicZoneResolver::builtin())
    }

    fn at(latitude: f64, longitude: f64) -> FeatureBundle {
        FeatureBundle {
            latitude,
            longitude,
            ..FeatureBundle::default()
        }
    }

    #[test]
    fn northern_coastal_band_is_high_regardless_of_terrain() {
        let s = scorer();
        let quiet = at(36.75, 3.06);
        let rugged = FeatureBundle {
            slope: 40.0,
            slope_max: 60.0,
            vegetation_index: 0.9,
            water_occurrence: 90.0,
            ..quiet
        };
        for bundle in [quiet, rugged] {
            let result = s.score(&bundle);
            assert!(result.severity >= 4);
            assert_eq!(result.score, 75.0);
        }
        assert!(s.score(&at(36.5, 7.5)).severity >= 4);
    }

    #[test]
    fn saharan_platform_is_low() {
        let result = scorer().score(&at(27.0, 2.0));
        assert_eq!(result.severity, 2);
        assert!(result.primary_factors[0].contains("Seismic zone I"));
    }

    #[test]
    fn unknown_location_defaults_low() {
        let result = scorer().score(&FeatureBundle::default());
        assert_eq!(result.severity, 2);
        assert!(result.primary_factors[0].starts_with("Outside mapped seismic regions"));
        assert_eq!(result.primary_factors[1], "Location: 0.00, 0.00");
    }
}
