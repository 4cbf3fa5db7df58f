//! Input/output helpers.
//!
//! - parcel ingest from JSON or CSV (`ingest`)
//! - assessment exports (JSON/CSV) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
