//! # lanekit CLI
//!
//! Inspect runtime dispatch, run the parity self-check between the
//! accelerated and software kernels, and evaluate single operations.

mod eval;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lanekit_core::{
    capabilities, check_parity, detected_capabilities, edge_samples, init_with_config,
    Accelerated, Capabilities, DispatchConfig, Element, Kernel, ParityReport, SimdTier,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Diagnostics for the lanekit dual-path vector kernel
#[derive(Parser, Debug)]
#[command(name = "lanekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML dispatch configuration file
    #[arg(short, long, global = true, env = "LANEKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Route every operation through the software fallback
    #[arg(long, global = true)]
    force_software: bool,

    /// Highest SIMD tier the accelerated kernels may use
    #[arg(long, global = true)]
    max_tier: Option<SimdTier>,

    /// Increase log verbosity (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show detected and effective CPU capabilities
    Caps {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Compare accelerated and software results on edge and random inputs
    Check {
        /// Number of random samples in addition to the edge samples
        #[arg(short, long, default_value = "256")]
        samples: usize,

        /// Seed for the random samples
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Lane type to check
        #[arg(short, long, value_enum, default_value = "f32")]
        element: ElementKind,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate one operation on both strategies
    Eval {
        /// Operation name, e.g. dot3, cross3, sin_cos, atan2
        op: String,

        /// Operands as x,y,z,w (or one value broadcast to every lane)
        #[arg(num_args = 1..=3, required = true, allow_hyphen_values = true)]
        operands: Vec<String>,

        /// Lane type
        #[arg(short, long, value_enum, default_value = "f32")]
        element: ElementKind,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ElementKind {
    F32,
    F64,
}

#[derive(Serialize)]
struct CapsReport {
    detected: Capabilities,
    effective: Capabilities,
    ceiling: SimdTier,
    highest_tier: SimdTier,
    force_software: bool,
}

fn init_tracing(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn dispatch_config(cli: &Cli) -> Result<DispatchConfig> {
    let mut config = DispatchConfig::load(cli.config.as_deref())
        .context("Failed to load dispatch configuration")?;
    if cli.force_software {
        config.force_software = true;
    }
    if let Some(tier) = cli.max_tier {
        config.max_tier = Some(tier);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = dispatch_config(&cli)?;
    init_with_config(&config).context("Failed to initialise dispatch")?;

    match cli.command {
        Commands::Caps { json } => caps(&config, json),
        Commands::Check {
            samples,
            seed,
            element,
            json,
        } => match element {
            ElementKind::F32 => check::<f32>(samples, seed, json),
            ElementKind::F64 => check::<f64>(samples, seed, json),
        },
        Commands::Eval {
            op,
            operands,
            element,
            json,
        } => {
            let evaluation = match element {
                ElementKind::F32 => eval::evaluate::<f32>(&op, &operands)?,
                ElementKind::F64 => eval::evaluate::<f64>(&op, &operands)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                println!("{evaluation}");
            }
            Ok(())
        }
    }
}

fn caps(config: &DispatchConfig, json: bool) -> Result<()> {
    let effective = capabilities();
    let report = CapsReport {
        detected: detected_capabilities(),
        effective,
        ceiling: config.ceiling(),
        highest_tier: effective.highest_tier(),
        force_software: config.force_software,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let none = |caps: Capabilities| {
        if caps.is_empty() {
            "(none)".to_string()
        } else {
            caps.to_string()
        }
    };
    println!("detected:  {}", none(report.detected));
    println!("effective: {}", none(report.effective));
    println!("ceiling:   {}", report.ceiling);
    println!("tier:      {}", report.highest_tier);
    Ok(())
}

/// Random lanes spanning many magnitudes, with a share of special values.
fn random_samples<T: Element>(rng: &mut StdRng, count: usize) -> Vec<[T; 4]> {
    const SPECIALS: [f64; 8] = [
        0.0,
        -0.0,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NAN,
        1e-40,
        -2.5,
        0.5,
    ];
    let mut lane = || {
        if rng.gen_ratio(1, 8) {
            T::from_f64(SPECIALS[rng.gen_range(0..SPECIALS.len())])
        } else {
            let magnitude = 10f64.powi(rng.gen_range(-6..6));
            T::from_f64(rng.gen_range(-1.0..1.0) * magnitude)
        }
    };
    (0..count)
        .map(|_| [lane(), lane(), lane(), lane()])
        .collect()
}

fn check<T: Element>(count: usize, seed: u64, json: bool) -> Result<()>
where
    Accelerated: Kernel<T>,
{
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = edge_samples::<T>();
    samples.extend(random_samples::<T>(&mut rng, count));
    tracing::info!(samples = samples.len(), seed, element = T::NAME, "running parity check");

    let report: ParityReport = check_parity(&samples);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}: {} samples, {} comparisons, {} mismatches [{}]",
            report.element,
            report.samples,
            report.checked,
            report.mismatches.len(),
            report.capabilities
        );
        for mismatch in &report.mismatches {
            println!(
                "  {}: accelerated {:?} software {:?} inputs {:?}",
                mismatch.operation, mismatch.accelerated, mismatch.software, mismatch.inputs
            );
        }
    }

    if !report.is_clean() {
        bail!("{} parity mismatches", report.mismatches.len());
    }
    Ok(())
}
