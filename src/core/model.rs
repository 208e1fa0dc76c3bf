// ScopeTrace - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no platform
// dependencies. These types are the shared vocabulary across all layers.

use serde::Serialize;
use std::fmt;

// =============================================================================
// Dataset (normalised output of parsing)
// =============================================================================

/// One ingested data file: a shared time axis plus one value sequence per
/// series, with optional color and note metadata.
///
/// Created fresh per parse and owned by the caller after return. Alignment
/// invariant: `series_values.len() == series_labels.len()` and every inner
/// vector has the same length as `time_values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    /// X-axis label derived from the time column header and unit options.
    pub axis_label: String,

    /// One label per non-time column, in left-to-right column order.
    pub series_labels: Vec<String>,

    /// Time axis in milliseconds, one entry per accepted data row.
    /// Monotonicity is expected of well-formed input but not enforced.
    pub time_values: Vec<f64>,

    /// `series_values[i][r]` is the value of series `i` at `time_values[r]`.
    pub series_values: Vec<Vec<f64>>,

    /// Empty when the source carries no color metadata; else one entry per
    /// series. `None` means that series has no color — absence is meaningful
    /// to callers and is never replaced by a default.
    pub series_colors: Vec<Option<Rgb>>,

    /// Point annotations in order of appearance in the source.
    pub notes: Vec<Note>,
}

impl Dataset {
    /// Number of accepted data rows.
    pub fn row_count(&self) -> usize {
        self.time_values.len()
    }

    /// Number of data series (time column excluded).
    pub fn series_count(&self) -> usize {
        self.series_labels.len()
    }
}

// =============================================================================
// Note
// =============================================================================

/// A point annotation anchored on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    /// Position on the output time axis (milliseconds, or epoch milliseconds
    /// for absolute-timestamp files).
    pub key: f64,

    /// Y value the annotation points at.
    pub value: f64,

    /// Free annotation text.
    pub text: String,
}

// =============================================================================
// Rgb
// =============================================================================

/// 24-bit color carried by `#RRGGBB` metadata tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse a `#RRGGBB` token (hex digits case-insensitive).
    /// Returns `None` for anything else; callers report the anomaly.
    pub fn from_hex(token: &str) -> Option<Rgb> {
        let digits = token.strip_prefix('#')?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Rgb { r, g, b })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
