// ScopeTrace - core/timeline.rs
//
// Time-axis derivation: axis-label text, calendar-timestamp recognition for
// absolute-time files, and the wrapping-counter rebase used by
// `counter_correction`.

use crate::util::constants;
use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// How the time column encodes its values. Decided on the first data row
/// and held for the remainder of the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeEncoding {
    /// Numeric offsets relative to the start of the capture.
    Relative,

    /// Full calendar timestamps; the output axis is epoch milliseconds.
    Absolute,
}

// =============================================================================
// Axis label
// =============================================================================

/// Derive the X-axis label from the time column's header cell.
///
/// A header that already carries a recognisable unit annotation (`(ms)` or
/// `(s)`, any case) is passed through unchanged; otherwise a label is
/// synthesized from the configured unit. Absolute-timestamp files override
/// the result with the bare label after mode detection.
pub fn axis_label(header: &str, time_in_milliseconds: bool) -> String {
    let trimmed = header.trim();
    let lower = trimmed.to_lowercase();
    if lower.contains("(ms)") || lower.contains("(s)") {
        return trimmed.to_string();
    }
    if time_in_milliseconds {
        constants::AXIS_LABEL_MILLISECONDS.to_string()
    } else {
        constants::AXIS_LABEL_SECONDS.to_string()
    }
}

// =============================================================================
// Calendar timestamps
// =============================================================================

/// Parse a time cell as a calendar timestamp, returning epoch milliseconds.
///
/// The whole cell must match; tiers are tried from most precise (explicit
/// timezone) to least. Timestamps without a timezone are taken as UTC.
/// Comma fractional seconds are accepted alongside the dot form because
/// locales that write `1,5` in data columns write `12:00:00,500` in
/// timestamps too.
pub fn parse_calendar_timestamp(raw: &str) -> Option<f64> {
    /// A recognition tier: a regex that gates the cell shape, plus a parsing
    /// function that converts the text to epoch milliseconds.
    struct Tier {
        re: Regex,
        parse: fn(&str) -> Option<i64>,
    }

    static TIERS: OnceLock<Vec<Tier>> = OnceLock::new();

    let tiers = TIERS.get_or_init(|| {
        // Helper to compile a regex without panicking at runtime; the
        // patterns are exercised by the unit tests below.
        fn re(pat: &str) -> Regex {
            Regex::new(pat).expect("parse_calendar_timestamp: invalid regex")
        }

        vec![
            // ------------------------------------------------------------------
            // Tier 1 — RFC 3339 / ISO 8601 with explicit timezone
            // Examples: 2019-07-24T15:39:31Z, 2019-07-24T15:39:31.898+02:00
            // ------------------------------------------------------------------
            Tier {
                re: re(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:\d{2})$"),
                parse: |s| {
                    let s = s.replace(',', ".");
                    DateTime::parse_from_rfc3339(&s)
                        .ok()
                        .map(|dt| dt.timestamp_millis())
                },
            },
            // ------------------------------------------------------------------
            // Tier 2 — ISO 8601 without timezone, T or space separator
            // Examples: 2019-07-24 15:39:31.898, 2019-07-24T15:39:31,898
            // ------------------------------------------------------------------
            Tier {
                re: re(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?$"),
                parse: |s| {
                    let s = s.replace(',', ".").replace('T', " ");
                    NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.f")
                        .ok()
                        .map(|ndt| ndt.and_utc().timestamp_millis())
                },
            },
            // ------------------------------------------------------------------
            // Tier 3 — day-first dash: DD-MM-YYYY HH:MM:SS[.mmm]
            // The dialect scope exports use on day-first locales.
            // ------------------------------------------------------------------
            Tier {
                re: re(r"^\d{2}-\d{2}-\d{4} \d{2}:\d{2}:\d{2}(?:[.,]\d+)?$"),
                parse: |s| {
                    let s = s.replace(',', ".");
                    NaiveDateTime::parse_from_str(&s, "%d-%m-%Y %H:%M:%S%.f")
                        .ok()
                        .map(|ndt| ndt.and_utc().timestamp_millis())
                },
            },
            // ------------------------------------------------------------------
            // Tier 4 — day-first slash: DD/MM/YYYY HH:MM:SS[.mmm]
            // ------------------------------------------------------------------
            Tier {
                re: re(r"^\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}(?:[.,]\d+)?$"),
                parse: |s| {
                    let s = s.replace(',', ".");
                    NaiveDateTime::parse_from_str(&s, "%d/%m/%Y %H:%M:%S%.f")
                        .ok()
                        .map(|ndt| ndt.and_utc().timestamp_millis())
                },
            },
        ]
    });

    for tier in tiers {
        if tier.re.is_match(raw) {
            if let Some(millis) = (tier.parse)(raw) {
                return Some(millis as f64);
            }
        }
    }
    None
}

// =============================================================================
// Counter rebase
// =============================================================================

/// Rebase for a wrapping free-running device counter.
///
/// Raw values come from a 32-bit counter that overflows or resets to zero;
/// whenever a sample is lower than the immediately preceding accepted
/// sample, one wrap period is added to a running offset. The policy lives
/// entirely in this type so it can be revisited without touching the pass.
#[derive(Debug, Default)]
pub struct CounterRebase {
    offset: f64,
    previous_raw: Option<f64>,
}

impl CounterRebase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next accepted raw sample, returning the rebased value.
    /// Must only be called for rows that are actually kept.
    pub fn apply(&mut self, raw: f64) -> f64 {
        if let Some(previous) = self.previous_raw {
            if raw < previous {
                self.offset += constants::COUNTER_WRAP_MODULUS;
            }
        }
        self.previous_raw = Some(raw);
        raw + self.offset
    }
}
