// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page analysis: pixel and layout signals per page, and the rule that turns
// them into a Blank/Content decision.

pub mod analyzer;
pub mod classifier;

pub use analyzer::PageStatAnalyzer;
pub use classifier::classify;
