use std::fmt;

use serde::{Deserialize, Serialize};

use scorefill_core::models::score::{MISSING_MARKER, NOT_AVAILABLE, RawScore, ScoreRecord};

/// Descriptive band for a percentile rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    ExtremelyLow,
    UnusuallyLow,
    LowAverage,
    Average,
    HighAverage,
    UnusuallyHigh,
    ExtremelyHigh,
    /// Unparseable input, or a value in the gaps between bands (e.g. 1.5).
    NotAvailable,
}

impl Classification {
    /// Bands are inclusive at both ends and checked in ascending order.
    pub fn from_percentile(p: f64) -> Self {
        if p <= 1.0 {
            Classification::ExtremelyLow
        } else if (2.0..=8.0).contains(&p) {
            Classification::UnusuallyLow
        } else if (9.0..=24.0).contains(&p) {
            Classification::LowAverage
        } else if (25.0..=74.0).contains(&p) {
            Classification::Average
        } else if (75.0..=90.0).contains(&p) {
            Classification::HighAverage
        } else if (91.0..=97.0).contains(&p) {
            Classification::UnusuallyHigh
        } else if p >= 98.0 {
            Classification::ExtremelyHigh
        } else {
            Classification::NotAvailable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::ExtremelyLow => "Extremely Low",
            Classification::UnusuallyLow => "Unusually Low",
            Classification::LowAverage => "Low Average",
            Classification::Average => "Average",
            Classification::HighAverage => "High Average",
            Classification::UnusuallyHigh => "Unusually High",
            Classification::ExtremelyHigh => "Extremely High",
            Classification::NotAvailable => NOT_AVAILABLE,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a raw percentile cell.
///
/// Any `>` characters are removed first, so `">99.9"` reads as 99.9.
/// Returns `None` for the "-" marker, empty or non-numeric text, and
/// non-finite values.
pub fn parse_percentile(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let value: f64 = if raw.contains('>') {
        raw.replace('>', "").trim().parse().ok()?
    } else if raw == NOT_AVAILABLE {
        return None;
    } else {
        raw.parse().ok()?
    };
    value.is_finite().then_some(value)
}

/// Classify a raw percentile. Never fails: bad input yields
/// [`Classification::NotAvailable`].
pub fn classify(raw: &str) -> Classification {
    parse_percentile(raw)
        .map(Classification::from_percentile)
        .unwrap_or(Classification::NotAvailable)
}

/// English ordinal suffix for `n`; 10 through 20 (mod 100) always take "th".
pub fn ordinal_suffix(n: i64) -> &'static str {
    if (10..=20).contains(&n.rem_euclid(100)) {
        return "th";
    }
    match n.rem_euclid(10) {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Render a raw percentile with its ordinal suffix: `"73"` → `"73rd"`.
///
/// Whole numbers print without a decimal point. Fractional values keep
/// their shortest decimal form and take the suffix of their first decimal
/// digit, so `"25.3"` → `"25.3rd"`. Unparseable input yields `"-"`.
pub fn format_percentile_with_suffix(raw: &str) -> String {
    let Some(value) = parse_percentile(raw) else {
        return NOT_AVAILABLE.to_string();
    };

    if value.fract() == 0.0 {
        // Only the last two digits pick the suffix; the value itself may not fit an i64.
        let tail = (value % 100.0) as i64;
        return format!("{value:.0}{}", ordinal_suffix(tail));
    }

    let printed = value.to_string();
    let digit = printed
        .split_once('.')
        .and_then(|(_, fraction)| fraction.chars().next())
        .and_then(|c| c.to_digit(10))
        .map(i64::from)
        .unwrap_or(0);
    format!("{printed}{}", ordinal_suffix(digit))
}

fn mark_missing(value: &str) -> String {
    if value == NOT_AVAILABLE {
        MISSING_MARKER.to_string()
    } else {
        value.to_string()
    }
}

/// Derive the classification and ordinal fields for one raw score. Every
/// field equal to "-" is rewritten to the missing marker.
pub fn derive_record(raw: &RawScore) -> ScoreRecord {
    ScoreRecord {
        name: raw.name.clone(),
        percentile: mark_missing(raw.percentile.trim()),
        classification: mark_missing(classify(&raw.percentile).label()),
        percentile_ordinal: mark_missing(&format_percentile_with_suffix(&raw.percentile)),
    }
}
