use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use q15axpy::harness::config::{HarnessConfig, DEFAULT_ALPHA, DEFAULT_LEN, DEFAULT_SEED, SWEEP_SIZES};
use q15axpy::harness::report::Outcome;
use q15axpy::harness::EquivalenceHarness;
use q15axpy::simd::VectorKernel;

#[derive(Parser, Debug)]
#[command(author, version, about = "Verify and time the saturating Q15 kernels", long_about = None)]
struct Args {
    /// Number of elements
    #[arg(default_value_t = DEFAULT_LEN)]
    n: usize,

    /// Seed of the input generator
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Scalar gain applied to b
    #[arg(long, default_value_t = DEFAULT_ALPHA, allow_negative_numbers = true)]
    alpha: i16,

    /// Timed repetitions per kernel
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Run every size in the sweep table instead of N
    #[arg(long)]
    sweep: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Use the scalar fallback as the vector kernel
    #[arg(long)]
    force_scalar: bool,
}

fn try_main(args: Args) -> Result<Outcome> {
    let config = HarnessConfig::default()
        .with_len(args.n)
        .with_seed(args.seed)
        .with_alpha(args.alpha)
        .with_iterations(args.iterations);

    let mut harness = EquivalenceHarness::new(config);
    if args.force_scalar {
        harness = harness.with_kernel(VectorKernel::ScalarFallback);
    }

    if args.sweep {
        let report = harness.sweep(&SWEEP_SIZES).context("size sweep failed")?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{report}");
        }
        return Ok(report.outcome());
    }

    let report = harness
        .run()
        .with_context(|| format!("harness run with n={} failed", args.n))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(report.outcome())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match try_main(args) {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
