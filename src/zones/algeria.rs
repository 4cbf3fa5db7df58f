//! Algerian seismic zoning (simplified RPA bands).
//!
//! The Tell Atlas coast is the most active; hazard decreases towards the
//! Saharan platform. Each band excludes its southern edge latitude, and the
//! central coast rule precedes the wider northern band, so order matters.

use super::{RegionRules, ZoneClass, ZoneRule};

const LAT_NORTH: f64 = 37.6;
const LAT_SOUTH: f64 = 18.8;
const LON_WEST: f64 = -8.7;
const LON_EAST: f64 = 12.0;

pub fn rules() -> RegionRules {
    RegionRules {
        region: "Algeria".to_string(),
        rules: vec![
            // Algiers to Bejaia/Setif stretch of the coast.
            ZoneRule::new("IV", ZoneClass::VeryHigh, (36.0, LAT_NORTH), (2.5, 6.0)),
            ZoneRule::new("III", ZoneClass::High, (36.0, LAT_NORTH), (LON_WEST, LON_EAST)),
            ZoneRule::new("III", ZoneClass::High, (35.0, 36.0), (LON_WEST, LON_EAST)),
            ZoneRule::new("II", ZoneClass::Medium, (33.0, 35.0), (LON_WEST, LON_EAST)),
            ZoneRule::new("I", ZoneClass::Low, (LAT_SOUTH, 33.0), (LON_WEST, LON_EAST)),
        ],
    }
}
