//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real main that:
//! - parses CLI arguments
//! - loads the scoring configuration
//! - reads or generates parcels and assesses them
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{AssessArgs, BatchArgs, Command, SampleArgs, ZonesArgs};
use crate::data::SampleConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `risk` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Assess(args) => handle_assess(args),
        Command::Batch(args) => handle_batch(args),
        Command::Sample(args) => handle_sample(args),
        Command::Zones(args) => handle_zones(args),
    }
}

fn handle_assess(args: AssessArgs) -> Result<(), AppError> {
    let assessor = pipeline::load_assessor(args.config.config.as_deref())?;
    let run = pipeline::run_json(&assessor, &args.input)?;

    if args.json {
        let text = if run.outcomes.len() == 1 {
            serde_json::to_string_pretty(&run.outcomes[0].assessment)
        } else {
            serde_json::to_string_pretty(&run.outcomes)
        }
        .map_err(|e| AppError::output(format!("Failed to serialize assessment: {e}")))?;
        println!("{text}");
    } else {
        for p in &run.outcomes {
            println!(
                "{}",
                crate::report::format_assessment(&p.id, &p.features, &p.assessment)
            );
            if args.details {
                println!("{}", crate::report::format_flagged_details(&p.assessment));
            }
        }
    }

    if let Some(path) = &args.export {
        crate::io::export::write_assessments_json(path, &run.outcomes)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let assessor = pipeline::load_assessor(args.config.config.as_deref())?;
    let run = pipeline::run_csv(&assessor, &args.csv)?;

    println!(
        "=== risk - Batch {} ({} of {} rows assessed) ===",
        args.csv.display(),
        run.outcomes.len(),
        run.rows_read
    );
    print_outcomes(&run.outcomes, args.top);
    let skipped = crate::report::format_row_errors(&run.row_errors);
    if !skipped.is_empty() {
        println!("\n{skipped}");
    }

    if let Some(path) = &args.export {
        crate::io::export::write_results_csv(path, &run.outcomes)?;
        log::info!("wrote {}", path.display());
    }
    if let Some(path) = &args.export_json {
        crate::io::export::write_assessments_json(path, &run.outcomes)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let assessor = pipeline::load_assessor(args.config.config.as_deref())?;
    let sample = SampleConfig {
        count: args.count,
        seed: args.seed,
        drop_probability: args.drop,
    };
    let run = pipeline::run_sample(&assessor, &sample)?;

    println!(
        "=== risk - Synthetic sample (n={}, seed={}) ===",
        sample.count, sample.seed
    );
    print_outcomes(&run.outcomes, args.top);

    if let Some(path) = &args.export {
        crate::io::export::write_results_csv(path, &run.outcomes)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

fn handle_zones(args: ZonesArgs) -> Result<(), AppError> {
    if !(args.lat.is_finite() && (-90.0..=90.0).contains(&args.lat)) {
        return Err(AppError::usage(format!("Latitude out of range: {}", args.lat)));
    }
    if !(args.lon.is_finite() && (-180.0..=180.0).contains(&args.lon)) {
        return Err(AppError::usage(format!("Longitude out of range: {}", args.lon)));
    }

    let config = crate::config::ScoringConfig::load(args.config.config.as_deref())?;
    let resolver = config.zone_resolver();
    let zone = resolver.resolve(args.lat, args.lon);
    print!(
        "{}",
        crate::report::format_zone(args.lat, args.lon, &zone, &resolver)
    );
    Ok(())
}

fn print_outcomes(outcomes: &[crate::assess::ParcelAssessment], top: usize) {
    if top == 0 {
        print!("{}", crate::report::format_batch_table(outcomes));
    } else {
        let ranked: Vec<_> = crate::report::rank_by_risk(outcomes, top)
            .into_iter()
            .cloned()
            .collect();
        println!("Top {} riskiest parcels:", ranked.len());
        print!("{}", crate::report::format_batch_table(&ranked));
    }
}

/// Rewrite argv so `risk --input p.json` means `risk assess --input p.json`.
///
/// Rules:
/// - `risk --help/--version/-h` -> unchanged
/// - `risk <subcommand> ...`    -> unchanged
/// - `risk -i p.json ...`       -> `risk assess -i p.json ...`
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "assess" | "batch" | "sample" | "zones");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "assess".to_string());
    }
    argv
}
