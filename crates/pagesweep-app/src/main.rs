// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PageSweep — Batch blank-page detection and PDF clean-up.
//
// Reads the TOML configuration, installs logging, and dispatches to the
// batch commands.

mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use pagesweep_core::AppConfig;
use pagesweep_core::error::Result;

use crate::cli::{Cli, Commands};
use crate::commands::{BatchSummary, ProcessFlags, print_human_error};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => {
            print_human_error(&err);
            return ExitCode::from(2);
        }
    };

    if let Err(err) = logging::init(config.log_file.as_deref()) {
        print_human_error(&err);
        return ExitCode::from(2);
    }

    tracing::info!(config = %cli.config.display(), "PageSweep starting");

    match dispatch(cli.command, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(%err, "Run failed");
            print_human_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Run one command. `Ok(false)` means some documents failed.
fn dispatch(command: Commands, config: &AppConfig) -> Result<bool> {
    let summary: BatchSummary = match command {
        Commands::Process {
            inputs,
            keep_blanks,
            no_size_check,
            ocr,
            drop_first_page,
            no_report,
        } => {
            let flags = ProcessFlags {
                keep_blanks,
                no_size_check,
                ocr,
                drop_first_page,
                no_report,
            };
            commands::process(config, &inputs, flags)?
        }
        Commands::Stats { inputs, json } => commands::stats(config, &inputs, json)?,
        Commands::Report { inputs } => commands::report(config, &inputs)?,
        Commands::Encode { input } => {
            commands::encode(&input)?;
            return Ok(true);
        }
        Commands::Decode { input, output } => {
            commands::decode(&input, &output)?;
            return Ok(true);
        }
    };
    Ok(summary.is_success())
}
