/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use stay75::config::Plan;
use stay75::scheduler::{LeaveResult, LeaveScheduler};
use stay75::store::UserDocument;

// ── CLI argument definition ───────────────────────────────────────────────────

/// stay75 leave planner.
///
/// Example:
///   stay75 --plan demos/plan.yaml --end-date 2026-12-18 --seed 7 \
///          --save account.json
#[derive(Debug, Parser)]
#[command(
    name = "stay75",
    about = "Attendance-floor leave planner – finds the weekdays a student can safely skip",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML attendance plan.
    #[arg(short, long, conflicts_with = "document")]
    plan: Option<PathBuf>,

    /// Load a previously saved account document (JSON) instead of a plan.
    #[arg(long)]
    document: Option<PathBuf>,

    /// Last day of the planning window (YYYY-MM-DD).  Overrides the end date
    /// stored in the input file.
    #[arg(short, long)]
    end_date: Option<NaiveDate>,

    /// Reference date the window starts after.  Defaults to the current
    /// local date.
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Seed for the candidate shuffle.  Omit for a fresh shuffle per run.
    #[arg(long)]
    seed: Option<u64>,

    /// Write the updated account document (JSON) to this path.
    #[arg(short, long)]
    save: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialise structured logging.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // ── Load input ────────────────────────────────────────────────────────────
    let (model, stored_end_date) = match (&cli.plan, &cli.document) {
        (Some(path), _) => {
            let plan = Plan::load_from_file(path)?;
            (plan.model, plan.end_date)
        }
        (None, Some(path)) => {
            let doc = UserDocument::load_from_file(path)?;
            let model = doc
                .to_model()
                .context("account document failed model validation")?;
            (model, doc.end_date)
        }
        (None, None) => bail!("either --plan or --document is required"),
    };

    // ── Resolve the window ────────────────────────────────────────────────────
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let end_date = match cli.end_date.or(stored_end_date) {
        Some(date) => date,
        None => bail!("no end date: pass --end-date or set end_date in the input file"),
    };

    // ── Compute ───────────────────────────────────────────────────────────────
    let scheduler = LeaveScheduler::new();
    let result = match cli.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            scheduler.compute_with(&model, today, end_date, &mut rng)?
        }
        None => scheduler.compute(&model, today, end_date)?,
    };

    report(&result);

    // ── Save the updated document ─────────────────────────────────────────────
    if let Some(path) = &cli.save {
        let doc = UserDocument::from_parts(&model, &result.leave_dates, Some(end_date));
        doc.save_to_file(path)?;
    }

    Ok(())
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn report(result: &LeaveResult) {
    if result.leave_dates.is_empty() {
        info!("No safe leave dates in the window");
    } else {
        info!("Safe leave dates ({}):", result.leave_dates.len());
        for date in &result.leave_dates {
            info!("  {}", date.format("%A %Y-%m-%d"));
        }
    }

    info!(
        "Safe subjects: {}",
        join_or_none(&result.safe_subjects)
    );
    info!(
        "Subjects that cannot afford leave: {}",
        join_or_none(&result.not_possible_subjects)
    );
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}
