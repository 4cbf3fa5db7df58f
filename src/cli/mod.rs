//! Command-line parsing for the parcel risk engine.
//!
//! Argument parsing and command dispatch stay separate from the scoring code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "risk", version, about = "Multi-hazard environmental risk scoring for land parcels")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess the parcel(s) in a JSON file and print the full report.
    Assess(AssessArgs),
    /// Assess every row of a parcel CSV in parallel.
    Batch(BatchArgs),
    /// Generate synthetic parcels and assess them.
    Sample(SampleArgs),
    /// Resolve the seismic zone for a coordinate.
    Zones(ZonesArgs),
}

/// Scoring configuration shared by every command.
#[derive(Debug, Args, Clone, Default)]
pub struct ConfigArgs {
    /// Scoring weights JSON (falls back to `RISK_CONFIG`, then built-in defaults).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct AssessArgs {
    /// Parcel JSON: one object or an array of objects.
    #[arg(short = 'i', long, value_name = "JSON")]
    pub input: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the assessment as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Also print description, impact and factors of flagged hazards.
    #[arg(long)]
    pub details: bool,

    /// Export assessments (with envelope) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct BatchArgs {
    /// Parcel CSV (`id, latitude, longitude` plus feature columns).
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show only the N riskiest parcels (0 = all, in input order).
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Export one row per parcel to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export full assessments to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Number of synthetic parcels.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    /// Random seed for parcel generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Probability that a single feature is left out.
    #[arg(long, default_value_t = 0.1)]
    pub drop: f64,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show only the N riskiest parcels (0 = all).
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Export one row per parcel to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ZonesArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_assess_with_flags() {
        let cli = Cli::try_parse_from(["risk", "assess", "-i", "p.json", "--json", "--config", "w.json"]).unwrap();
        match cli.command {
            Command::Assess(args) => {
                assert_eq!(args.input, PathBuf::from("p.json"));
                assert!(args.json);
                assert_eq!(args.config.config, Some(PathBuf::from("w.json")));
                assert!(args.export.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn sample_defaults() {
        let cli = Cli::try_parse_from(["risk", "sample"]).unwrap();
        match cli.command {
            Command::Sample(args) => {
                assert_eq!(args.count, 20);
                assert_eq!(args.seed, 42);
                assert_eq!(args.top, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn zones_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["risk", "zones", "--lat", "35.7", "--lon", "-0.6"]).unwrap();
        match cli.command {
            Command::Zones(args) => {
                assert_eq!(args.lat, 35.7);
                assert_eq!(args.lon, -0.6);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn batch_requires_csv() {
        assert!(Cli::try_parse_from(["risk", "batch"]).is_err());
    }
}
