// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bbs_otp::{NotApplicable, PrimalityTest, RandomnessReport, RunsVerdict, Session};
use clap::Parser;
use rand::rngs::OsRng;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bbs-otp")]
#[command(about = "Encrypt a message with a Blum-Blum-Shub one-time pad and test the key stream")]
#[command(version)]
struct Cli {
    /// Plaintext file, one byte per character
    #[arg(short, long, default_value = "message.txt")]
    message: PathBuf,

    /// Directory receiving key.bin, encrypted.bin and decrypted.txt
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Bit length of each prime factor (at least 5)
    #[arg(short, long, default_value_t = 512)]
    prime_bits: usize,

    /// Use Miller-Rabin with this many rounds instead of a single Fermat round
    #[arg(long, value_name = "ROUNDS")]
    miller_rabin: Option<usize>,

    /// Generate p and q concurrently
    #[arg(long)]
    parallel: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let message = fs::read_to_string(&cli.message)
        .with_context(|| format!("failed to read {}", cli.message.display()))?;
    info!(path = %cli.message.display(), chars = message.chars().count(), "message loaded");

    let primality = match cli.miller_rabin {
        Some(rounds) => PrimalityTest::MillerRabin { rounds },
        None => PrimalityTest::Fermat,
    };
    let session = Session::builder()
        .prime_bits(cli.prime_bits)
        .primality(primality)
        .parallel(cli.parallel)
        .build();

    let output = session.run(&message, &mut OsRng).context("encryption session failed")?;

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
    let artifacts = [
        ("key.bin", output.key.to_string()),
        ("encrypted.bin", output.ciphertext.to_string()),
        ("decrypted.txt", output.plaintext.clone()),
    ];
    for (name, contents) in artifacts {
        let path = cli.out_dir.join(name);
        fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "written");
    }

    match &output.report {
        Some(report) => log_report(report),
        None => warn!("empty message: no key stream to test"),
    }

    Ok(())
}

fn log_report(report: &RandomnessReport) {
    let monobit = &report.monobit;
    info!(
        s_obs = monobit.statistic,
        p_value = monobit.p_value,
        passed = monobit.passed,
        "monobit test"
    );

    match &report.runs {
        RunsVerdict::Completed { verdict, runs, proportion } => info!(
            runs,
            proportion,
            p_value = verdict.p_value,
            passed = verdict.passed,
            "runs test"
        ),
        RunsVerdict::NotApplicable(NotApplicable::ProportionOutOfRange { proportion, tau }) => {
            warn!(proportion, tau, "runs test not applicable: frequency pre-test failed")
        }
        RunsVerdict::NotApplicable(NotApplicable::Degenerate) => {
            warn!("runs test not applicable: constant key stream")
        }
    }
}
