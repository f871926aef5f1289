// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagesweep-report — Durable, append-only audit output for page analysis.
//
// One `ReportSink` per run accumulates a CSV row for every analysed page,
// across however many documents the run touches.

pub mod sink;

pub use sink::{REPORT_HEADER, ReportSink};
