//! Input adapter: raw feature dictionaries -> `FeatureBundle`.
//!
//! Missing-data tolerance lives here and only here; scorers never null-check.

pub mod bundle;

pub use bundle::*;
