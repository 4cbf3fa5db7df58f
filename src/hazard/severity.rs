//! Score -> severity step functions.

use serde::{Deserialize, Serialize};

use crate::domain::{MIN_SEVERITY, Severity};

/// Ascending lower bounds of tiers 2..=5.
///
/// A score below the first bound is tier 1; a score at or above the last is
/// tier 5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeverityThresholds(pub [f64; 4]);

impl SeverityThresholds {
    pub const fn new(bounds: [f64; 4]) -> Self {
        Self(bounds)
    }

    /// Tier for a score. Monotonic as long as the bounds are ascending,
    /// which `problem` checks.
    pub fn severity(&self, score: f64) -> Severity {
        let passed = self.0.iter().filter(|&&bound| score >= bound).count();
        MIN_SEVERITY + passed as Severity
    }

    /// Why these bounds are unusable, if they are.
    pub fn problem(&self) -> Option<String> {
        if self.0.iter().any(|b| !b.is_finite() || *b <= 0.0 || *b > 100.0) {
            return Some(format!("thresholds {:?} must lie in (0, 100]", self.0));
        }
        if self.0.windows(2).any(|w| w[0] >= w[1]) {
            return Some(format!("thresholds {:?} must be strictly ascending", self.0));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_table_steps() {
        let t = SeverityThresholds::new([10.0, 20.0, 40.0, 60.0]);
        assert_eq!(t.severity(0.0), 1);
        assert_eq!(t.severity(9.9), 1);
        assert_eq!(t.severity(10.0), 2);
        assert_eq!(t.severity(19.9), 2);
        assert_eq!(t.severity(20.0), 3);
        assert_eq!(t.severity(59.9), 4);
        assert_eq!(t.severity(60.0), 5);
        assert_eq!(t.severity(100.0), 5);
    }

    #[test]
    fn severity_is_monotonic_in_score() {
        let t = SeverityThresholds::new([15.0, 30.0, 50.0, 70.0]);
        let mut last = 0;
        for i in 0..=1000 {
            let s = t.severity(i as f64 / 10.0);
            assert!(s >= last);
            last = s;
        }
        assert_eq!(last, 5);
    }

    #[test]
    fn rejects_unordered_or_out_of_range_bounds() {
        assert!(SeverityThresholds::new([10.0, 20.0, 40.0, 60.0]).problem().is_none());
        assert!(SeverityThresholds::new([20.0, 10.0, 40.0, 60.0]).problem().is_some());
        assert!(SeverityThresholds::new([10.0, 10.0, 40.0, 60.0]).problem().is_some());
        assert!(SeverityThresholds::new([0.0, 10.0, 40.0, 60.0]).problem().is_some());
        assert!(SeverityThresholds::new([10.0, 20.0, 40.0, f64::NAN]).problem().is_some());
    }
}
