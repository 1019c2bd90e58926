// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ArenaMap CLI - firing map statistics from JSON inputs.
//!
//! Usage:
//!   arenamap <command> <input.json> [options]
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::Context;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::Config;

fn main() -> ExitCode {
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.default_log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match commands::parse_args(&args) {
        Ok(Some(command)) => command,
        Ok(None) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&config, &command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "analysis failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: &commands::Command) -> anyhow::Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("failed to initialize rayon thread pool")?;
    tracing::debug!(worker_threads = config.worker_threads, "thread pool ready");

    let output = commands::run(command)?;
    let text = if config.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", text);
    Ok(())
}

fn print_usage() {
    println!(
        r#"ArenaMap - firing map statistics
================================

USAGE:
  arenamap <COMMAND> <input.json> [OPTIONS]

COMMANDS:
  autocorr            2D autocorrelogram of a firing map
                      input: rows of numbers (null = no data),
                      or {{"map": rows, "mask": rows of booleans}}
  border-coverage     Best coverage of the arena walls by firing fields
                      input: one field object or a list of them,
                      each with a "field_map" (and optional "mask")
  angular-occupancy   Histogram of head angles in radians
                      input: array of numbers

BORDER COVERAGE OPTIONS:
  --walls <spec>          Walls to check, any of t r b l (default: trbl)
  --search-width <n>      Rows/columns checked next to each wall (default: 8)
  --arena-shape <name>    square | rectangle | circle | linear (default: square)
  --config <file.json>    Coverage config; flags above take precedence

ANGULAR OCCUPANCY OPTIONS:
  --bins <n>              Number of angular bins (default: 180)
  --sigma <bins>          Gaussian smoothing width (default: none)

ENVIRONMENT:
  RUST_LOG                Log filter (default: info)
  ARENAMAP_THREADS        Worker threads (default: CPU count)
  ARENAMAP_PRETTY         Pretty-print output, 0/false to disable (default: 1)
"#
    );
}
