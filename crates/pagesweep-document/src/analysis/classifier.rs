// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blank-page rule.

use pagesweep_core::{CONTENT_AREA_BLANK_LIMIT, NON_WHITE_BLANK_LIMIT, PageMetrics, PageStatus};

/// Label a page from its two signals.
///
/// A page is blank only when both the ink ratio and the text-block coverage
/// are strictly below their limits. NaN compares false and therefore yields
/// `Content`.
pub fn classify(non_white_percent: f64, content_area_percent: f64) -> PageStatus {
    if non_white_percent < NON_WHITE_BLANK_LIMIT && content_area_percent < CONTENT_AREA_BLANK_LIMIT {
        PageStatus::Blank
    } else {
        PageStatus::Content
    }
}

/// [`classify`] over a measured [`PageMetrics`].
pub fn classify_metrics(metrics: &PageMetrics) -> PageStatus {
    classify(metrics.non_white_percent, metrics.content_area_percent)
}
