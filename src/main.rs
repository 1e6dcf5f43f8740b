mod bands;
mod calc;
mod config;
mod dataset;
mod ipc;
mod mock;
mod model;
mod query;

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cfg = config::Config::parse();

    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(cfg.level().into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let (dataset, source) = match &cfg.dataset {
        Some(path) => (
            dataset::Dataset::load_json(path)?,
            ipc::DataSource::File(path.clone()),
        ),
        None => (mock::dataset()?, ipc::DataSource::Fixture),
    };
    let gaps = dataset.report_coverage_gaps();
    info!(
        source = %source.describe(),
        students = dataset.students.len(),
        coverage_gaps = gaps.len(),
        "vedad ready"
    );

    let mut state = ipc::AppState { dataset, source };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to echo back.
                let _ = writeln!(stdout, "{}", ipc::bad_json(e.to_string()));
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    info!("stdin closed, shutting down");
    Ok(())
}
