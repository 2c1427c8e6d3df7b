//! Dantalion test-vector generator.
//!
//! ## Usage
//!
//! ```bash
//! # 4 KiB at entropy 2.0
//! dantalion generate --length 4096 --entropy 2.0 ent2_4k.bin
//!
//! # 4 KiB targeting a compression ratio of ~3 (calibrates on first use)
//! dantalion generate --length 4096 --ratio 3.0 cr3_4k.bin
//!
//! # Rebuild the ratio calibration map
//! dantalion calibrate
//!
//! # Sampling estimation experiment
//! dantalion sample --length 4096 --entropy 3.0 --sample-ratio 0.1 --trials 10
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use dantalion::store::{self, DEFAULT_CACHE_PATH};
use dantalion::{
    Calibrator, EntropyTarget, Error, SampleEstimator, SampleRatio, Synthesizer, ZstdCompressor,
};

#[derive(Parser, Debug)]
#[command(name = "dantalion")]
#[command(author = "Daemoniorum LLC")]
#[command(version)]
#[command(about = "Generate byte sequences of controlled entropy and compressibility", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a file with a target entropy or compression ratio
    Generate {
        /// Size in bytes of the file to be generated
        #[arg(short, long)]
        length: usize,

        /// Entropy value, a float in [0, 7.99]
        #[arg(short, long, conflicts_with = "ratio")]
        entropy: Option<f64>,

        /// Target compression ratio, resolved via the calibration map
        #[arg(short, long)]
        ratio: Option<f64>,

        /// Synthesis retries before giving up
        #[arg(long, default_value_t = 20)]
        retries: usize,

        /// Calibration cache path
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: PathBuf,

        /// Output file path
        output: PathBuf,
    },

    /// Build the ratio calibration map and persist it
    Calibrate {
        /// Buffer size synthesized per grid point
        #[arg(long, default_value_t = 4096)]
        sample_size: usize,

        /// Calibration cache path
        #[arg(long, default_value = DEFAULT_CACHE_PATH)]
        cache: PathBuf,
    },

    /// Run sampling entropy estimation trials
    Sample {
        /// Size in bytes of the buffer synthesized per trial
        #[arg(short, long)]
        length: usize,

        /// Entropy value, a float in [0, 7.99]
        #[arg(short, long)]
        entropy: f64,

        /// Sampling ratio, a float in (0, 1]
        #[arg(short, long)]
        sample_ratio: f64,

        /// Number of trials
        #[arg(short = 'n', long, default_value_t = 1)]
        trials: usize,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    // Keep running unlogged if a collector is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(command: Command) -> dantalion::Result<()> {
    match command {
        Command::Generate {
            length,
            entropy,
            ratio,
            retries,
            cache,
            output,
        } => {
            let mut synth = Synthesizer::new();
            let target = resolve_target(entropy, ratio, &cache, &mut synth)?;
            let sequence = synth.synthesize_with_retry(length, target, retries)?;
            std::fs::write(&output, &sequence.bytes)?;
            info!(
                path = %output.display(),
                entropy = sequence.entropy,
                length = sequence.bytes.len(),
                "sequence written"
            );
            Ok(())
        }

        Command::Calibrate { sample_size, cache } => {
            let calibrator = Calibrator {
                sample_size,
                ..Calibrator::default()
            };
            let mut synth = Synthesizer::new();
            let map = calibrator.build(&mut synth, &ZstdCompressor::new())?;
            store::save_map(&cache, &map)?;
            for (ratio, entropy) in map.iter() {
                println!("{ratio} -> {entropy}");
            }
            Ok(())
        }

        Command::Sample {
            length,
            entropy,
            sample_ratio,
            trials,
        } => {
            let target = EntropyTarget::new(entropy)?;
            let ratio = SampleRatio::new(sample_ratio)?;
            let mut estimator = SampleEstimator::new(ratio)?;
            for outcome in estimator.trials(length, target, trials) {
                match outcome {
                    Ok(estimate) => println!(
                        "original entropy, {}, sample entropy, {}",
                        estimate.full_entropy, estimate.sample_entropy
                    ),
                    Err(err) => eprintln!("trial failed: {err}"),
                }
            }
            Ok(())
        }
    }
}

/// Pick the entropy target from `--entropy`, or resolve `--ratio` through
/// the calibration map, building and caching the map on first use.
fn resolve_target(
    entropy: Option<f64>,
    ratio: Option<f64>,
    cache: &Path,
    synth: &mut Synthesizer,
) -> dantalion::Result<EntropyTarget> {
    match (entropy, ratio) {
        (Some(value), _) => EntropyTarget::new(value),
        (None, Some(requested)) => {
            let map = store::load_or_build(
                cache,
                &Calibrator::default(),
                synth,
                &ZstdCompressor::new(),
            )?;
            EntropyTarget::new(map.entropy_for(requested)?)
        }
        (None, None) => Err(Error::config(
            "entropy parameter is missing; pass --entropy or --ratio",
        )),
    }
}
