//! Hazard scoring.
//!
//! Each hazard is a small strategy behind the `HazardScorer` trait:
//!
//! - collect weighted factor contributions from a `FeatureBundle`
//! - clamp the sum to `[0, 100]` and map it to a severity tier
//! - pick tier texts and name the dominant factor
//!
//! The `HazardRegistry` is the fixed `HazardType -> scorer` table used by the
//! assessor.

use std::collections::BTreeMap;

use crate::config::ScoringConfig;
use crate::domain::{FLAG_SEVERITY, HazardType, RiskLevel, RiskResult};
use crate::features::FeatureBundle;

pub mod drought;
pub mod erosion;
pub mod flood;
pub mod landslide;
pub mod seismic;
pub mod severity;
pub mod subsidence;
pub mod wildfire;

pub use drought::DroughtScorer;
pub use erosion::ErosionScorer;
pub use flood::FloodScorer;
pub use landslide::LandslideScorer;
pub use seismic::SeismicScorer;
pub use severity::SeverityThresholds;
pub use subsidence::SubsidenceScorer;
pub use wildfire::WildfireScorer;

/// Common contract of the seven hazard scorers.
///
/// Implementations are pure: no I/O, no interior mutability, total over every
/// bundle.
pub trait HazardScorer: Send + Sync {
    fn hazard(&self) -> HazardType;
    fn score(&self, bundle: &FeatureBundle) -> RiskResult;
}

/// Static texts of one hazard, indexed by tier (very low .. very high).
#[derive(Debug, Clone, Copy)]
pub struct HazardTexts {
    pub descriptions: [&'static str; 5],
    pub impacts: [&'static str; 5],
    pub mitigation: &'static str,
    /// Primary-factor line used when nothing contributed.
    pub calm: &'static str,
}

#[derive(Debug, Clone)]
struct Contribution {
    points: f64,
    note: String,
}

/// Running tally of factor contributions for one hazard.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScoreSheet {
    contributions: Vec<Contribution>,
    notes: Vec<String>,
}

impl ScoreSheet {
    /// Record a factor. Zero contributions are dropped.
    pub(crate) fn add(&mut self, points: f64, note: impl Into<String>) {
        if points != 0.0 && points.is_finite() {
            self.contributions.push(Contribution {
                points,
                note: note.into(),
            });
        }
    }

    /// Informational factor line that carries no points.
    pub(crate) fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub(crate) fn raw_total(&self) -> f64 {
        self.contributions.iter().map(|c| c.points).sum()
    }

    pub(crate) fn finish(
        self,
        hazard: HazardType,
        thresholds: &SeverityThresholds,
        texts: &HazardTexts,
    ) -> RiskResult {
        let raw = self.raw_total();
        let score = clamp_score(raw);
        let severity = thresholds.severity(score);
        let level = RiskLevel::from_severity(severity);
        let tier = level.tier_index();

        // Strongest first; stable sort keeps declaration order on ties.
        let mut positive: Vec<&Contribution> =
            self.contributions.iter().filter(|c| c.points > 0.0).collect();
        positive.sort_by(|a, b| b.points.total_cmp(&a.points));
        let mitigating = self.contributions.iter().filter(|c| c.points < 0.0);

        let description = match positive.first() {
            Some(dominant) => format!("{}; dominant factor: {}", texts.descriptions[tier], dominant.note),
            None => texts.descriptions[tier].to_string(),
        };

        let mut primary_factors: Vec<String> = positive
            .iter()
            .map(|c| c.note.clone())
            .chain(mitigating.map(|c| c.note.clone()))
            .chain(self.notes.iter().cloned())
            .collect();
        if primary_factors.is_empty() {
            primary_factors.push(texts.calm.to_string());
        }

        let recommendation = if severity >= FLAG_SEVERITY {
            texts.mitigation.to_string()
        } else {
            String::new()
        };

        log::debug!(
            "{} raw={raw:.2} score={score:.1} severity={severity}",
            hazard.key()
        );

        RiskResult {
            hazard,
            score,
            severity,
            level,
            description,
            impact: texts.impacts[tier].to_string(),
            primary_factors,
            recommendation,
        }
    }
}

/// Clamp to `[0, 100]` and round to one decimal. Non-finite sums score 0.
pub fn clamp_score(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Fraction by which `value` falls short of `reference`, in `[0, 1]`.
pub(crate) fn shortfall(value: f64, reference: f64) -> f64 {
    if reference <= 0.0 {
        return 0.0;
    }
    ((reference - value) / reference).clamp(0.0, 1.0)
}

/// Fixed `HazardType -> scorer` table.
pub struct HazardRegistry {
    /// Indexed by `HazardType` declaration order.
    scorers: Vec<Box<dyn HazardScorer>>,
}

impl HazardRegistry {
    pub fn from_config(config: &ScoringConfig) -> Self {
        let resolver = config.zone_resolver();

        let scorers: Vec<Box<dyn HazardScorer>> = vec![
            Box::new(FloodScorer::new(config.flood)),
            Box::new(LandslideScorer::new(config.landslide)),
            Box::new(ErosionScorer::new(config.erosion)),
            Box::new(SeismicScorer::new(config.seismic, resolver)),
            Box::new(DroughtScorer::new(config.drought)),
            Box::new(WildfireScorer::new(config.wildfire.clone())),
            Box::new(SubsidenceScorer::new(config.subsidence.clone())),
        ];
        debug_assert!(
            scorers
                .iter()
                .zip(HazardType::ALL)
                .all(|(s, h)| s.hazard() == h)
        );

        Self { scorers }
    }

    pub fn get(&self, hazard: HazardType) -> &dyn HazardScorer {
        self.scorers[hazard as usize].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn HazardScorer> {
        self.scorers.iter().map(|s| s.as_ref())
    }

    /// Run every scorer against one bundle.
    pub fn score_all(&self, bundle: &FeatureBundle) -> BTreeMap<HazardType, RiskResult> {
        self.iter()
            .map(|scorer| (scorer.hazard(), scorer.score(bundle)))
            .collect()
    }
}

impl Default for HazardRegistry {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXTS: HazardTexts = HazardTexts {
        descriptions: ["d1", "d2", "d3", "d4", "d5"],
        impacts: ["i1", "i2", "i3", "i4", "i5"],
        mitigation: "mitigate",
        calm: "calm",
    };

    #[test]
    fn clamp_score_bounds_and_rounds() {
        assert_eq!(clamp_score(-5.0), 0.0);
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(12.345), 12.3);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }

    #[test]
    fn empty_sheet_is_lowest_tier_with_calm_factor() {
        let thresholds = SeverityThresholds::new([10.0, 20.0, 40.0, 60.0]);
        let result = ScoreSheet::default().finish(HazardType::Flood, &thresholds, &TEXTS);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.severity, 1);
        assert_eq!(result.description, "d1");
        assert_eq!(result.primary_factors, vec!["calm".to_string()]);
        assert!(result.recommendation.is_empty());
    }

    #[test]
    fn dominant_factor_is_the_largest_contribution() {
        let thresholds = SeverityThresholds::new([10.0, 20.0, 40.0, 60.0]);
        let mut sheet = ScoreSheet::default();
        sheet.add(5.0, "small");
        sheet.add(30.0, "big");
        sheet.add(-2.0, "relief");
        let result = sheet.finish(HazardType::Flood, &thresholds, &TEXTS);
        assert_eq!(result.score, 33.0);
        assert_eq!(result.severity, 3);
        assert_eq!(result.description, "d3; dominant factor: big");
        assert_eq!(result.primary_factors, vec!["big", "small", "relief"]);
        assert_eq!(result.recommendation, "mitigate");
    }

    #[test]
    fn registry_covers_every_hazard_in_order() {
        let registry = HazardRegistry::default();
        let order: Vec<HazardType> = registry.iter().map(|s| s.hazard()).collect();
        assert_eq!(order, HazardType::ALL.to_vec());
        for hazard in HazardType::ALL {
            assert_eq!(registry.get(hazard).hazard(), hazard);
        }
    }

    #[test]
    fn shortfall_is_bounded() {
        assert_eq!(shortfall(0.0, 0.4), 1.0);
        assert_eq!(shortfall(0.8, 0.4), 0.0);
        assert!((shortfall(0.2, 0.4) - 0.5).abs() < 1e-12);
        assert_eq!(shortfall(0.2, 0.0), 0.0);
    }
}
