//! Command-line clearance check
//!
//! Usage:
//!   pcb-clearance-cli <job.json> [--pretty]
//!
//! The job file holds `{ "board": ..., "rules": ..., "settings": ... }`;
//! `rules` and `settings` are optional. Violations are printed to stdout as
//! JSON together with the run summary. Set `RUST_LOG` to control logging.

use std::env;
use std::fs;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use pcb_clearance::drc::{
    Board, ClearanceProvider, DesignRules, DrcSettings, NoProgress, RunSummary, VecSink, Violation,
};

#[derive(Deserialize)]
struct Job {
    board: Board,
    #[serde(default)]
    rules: DesignRules,
    #[serde(default)]
    settings: DrcSettings,
}

#[derive(Serialize)]
struct Report {
    summary: RunSummary,
    violations: Vec<Violation>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pcb_clearance=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <job.json> [--pretty]", args[0]);
        bail!("missing job file");
    }
    let path = &args[1];
    let pretty = args[2..].iter().any(|a| a == "--pretty");

    let text = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let job: Job = serde_json::from_str(&text).with_context(|| format!("failed to parse {path}"))?;
    job.settings.validate().context("invalid settings")?;

    let sink = VecSink::new();
    let summary = ClearanceProvider::new(&job.board, &job.rules, &job.settings)
        .run(&sink, &NoProgress)
        .context("clearance check failed")?;

    let report = Report {
        summary,
        violations: sink.into_violations(),
    };
    let out = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{out}");

    Ok(())
}
