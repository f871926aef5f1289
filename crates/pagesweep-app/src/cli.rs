// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pagesweep")]
#[command(version, about = "Detect and remove blank PDF pages, with per-page statistics reports", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML). Defaults apply when it does not exist.
    #[arg(short, long, global = true, default_value = "pagesweep.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report every page, then clean up each document
    Process {
        /// Input PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Keep blank pages (skip blank-page removal)
        #[arg(long)]
        keep_blanks: bool,

        /// Skip the size limit checks
        #[arg(long)]
        no_size_check: bool,

        /// Add a text layer with OCR after blank-page removal
        #[arg(long)]
        ocr: bool,

        /// Drop the first page of every document (e.g. a scanner cover sheet)
        #[arg(long)]
        drop_first_page: bool,

        /// Do not write a page statistics report
        #[arg(long)]
        no_report: bool,
    },

    /// Print blank-page statistics for each document
    Stats {
        /// Input PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the per-page statistics report without changing any document
    Report {
        /// Input PDF files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Print a PDF as base64, ready to attach to a remote record
    Encode {
        /// Input PDF file
        input: PathBuf,
    },

    /// Write a PDF from a base64 attachment file
    Decode {
        /// File holding the base64 text
        input: PathBuf,

        /// Output PDF path
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn process_defaults() {
        let cli = Cli::try_parse_from(["pagesweep", "process", "a.pdf", "b.pdf"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("pagesweep.toml"));
        match cli.command {
            Commands::Process {
                inputs,
                keep_blanks,
                no_size_check,
                ocr,
                drop_first_page,
                no_report,
            } => {
                assert_eq!(inputs.len(), 2);
                assert!(!keep_blanks && !no_size_check && !ocr && !drop_first_page && !no_report);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["pagesweep", "stats", "x.pdf", "--config", "/etc/ps.toml", "--json"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/ps.toml"));
        assert!(matches!(cli.command, Commands::Stats { json: true, .. }));
    }

    #[test]
    fn inputs_are_required() {
        assert!(Cli::try_parse_from(["pagesweep", "report"]).is_err());
    }
}
