// ScopeTrace - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; all errors preserve the causal chain
// for diagnostic logging.
//
// Two tiers: fatal errors (`ParseError` and friends) abort an operation,
// recoverable anomalies (`Diagnostic`) are collected alongside the result
// and never abort the pass.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ScopeTrace operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ScopeTraceError {
    /// Options profile loading or compilation failed.
    Profile(ProfileError),

    /// Data file parsing failed fatally.
    Parse(ParseError),

    /// Export operation failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for ScopeTraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(e) => write!(f, "Profile error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ScopeTraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Profile(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Options profile errors
// ---------------------------------------------------------------------------

/// Errors related to options profile loading and compilation.
#[derive(Debug)]
pub enum ProfileError {
    /// TOML file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Profile file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A separator field must hold exactly one character.
    NotASingleCharacter {
        path: PathBuf,
        field: &'static str,
        value: String,
    },

    /// I/O error reading a profile file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Profile '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::NotASingleCharacter { path, field, value } => write!(
                f,
                "Profile '{}': '{field}' must be a single character, got '{value}'",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading profile '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ProfileError> for ScopeTraceError {
    fn from(e: ProfileError) -> Self {
        Self::Profile(e)
    }
}

// ---------------------------------------------------------------------------
// Fatal parse errors
// ---------------------------------------------------------------------------

/// Fatal parse failures: the pass aborts and no dataset is produced.
#[derive(Debug)]
pub enum ParseError {
    /// Two separator options hold the same character, which would make
    /// tokenizing or numeric conversion ambiguous.
    SeparatorConflict {
        first: &'static str,
        second: &'static str,
        value: char,
    },

    /// The data start row precedes the label row.
    RowOrderConflict { label_row: usize, data_row: usize },

    /// The configured time column does not exist in the header row.
    TimeColumnOutOfRange {
        time_column: usize,
        column_count: usize,
    },

    /// A data line was reached but the label row never produced a header
    /// (it was consumed as a comment, metadata, or blank line).
    HeaderRowMissing { label_row: usize, line_number: u64 },

    /// I/O error while reading the input stream.
    Stream { line_number: u64, source: io::Error },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeparatorConflict {
                first,
                second,
                value,
            } => write!(
                f,
                "{first} separator and {second} separator are both '{value}'"
            ),
            Self::RowOrderConflict {
                label_row,
                data_row,
            } => write!(
                f,
                "data row {data_row} precedes label row {label_row}"
            ),
            Self::TimeColumnOutOfRange {
                time_column,
                column_count,
            } => write!(
                f,
                "time column {time_column} is out of range (header has {column_count} columns)"
            ),
            Self::HeaderRowMissing {
                label_row,
                line_number,
            } => write!(
                f,
                "line {line_number}: data encountered but no header was found at label row {label_row}"
            ),
            Self::Stream {
                line_number,
                source,
            } => write!(f, "stream error at line {line_number}: {source}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stream { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ParseError> for ScopeTraceError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Recoverable diagnostics
// ---------------------------------------------------------------------------

/// A recoverable anomaly found during a parse.
///
/// Diagnostics never abort the pass: the affected row or token is dropped,
/// the anomaly is reported exactly once, and parsing continues. Line numbers
/// are 1-based physical line numbers in the input stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A data line's column count differs from the header's.
    ColumnCountMismatch {
        line_number: u64,
        expected: usize,
        actual: usize,
    },

    /// A series cell failed numeric conversion; the whole row is dropped.
    MalformedNumber {
        line_number: u64,
        column: usize,
        raw: String,
    },

    /// The time cell parsed neither as a number nor as a calendar timestamp.
    MalformedTime { line_number: u64, raw: String },

    /// A color metadata token is not a recognisable `#RRGGBB` value.
    MalformedColor { line_number: u64, token: String },

    /// The color metadata carries a different number of tokens than there
    /// are series.
    ColorCountMismatch {
        line_number: u64,
        colors: usize,
        series: usize,
    },

    /// A note metadata line is missing fields or has non-numeric key/value.
    MalformedNote { line_number: u64, raw: String },

    /// A metadata line carries an unrecognised keyword.
    UnknownMetadata { line_number: u64, keyword: String },
}

impl Diagnostic {
    /// The 1-based physical line the anomaly was found on.
    pub fn line_number(&self) -> u64 {
        match self {
            Self::ColumnCountMismatch { line_number, .. }
            | Self::MalformedNumber { line_number, .. }
            | Self::MalformedTime { line_number, .. }
            | Self::MalformedColor { line_number, .. }
            | Self::ColorCountMismatch { line_number, .. }
            | Self::MalformedNote { line_number, .. }
            | Self::UnknownMetadata { line_number, .. } => *line_number,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnCountMismatch {
                line_number,
                expected,
                actual,
            } => write!(
                f,
                "line {line_number}: expected {expected} columns, found {actual}; row skipped"
            ),
            Self::MalformedNumber {
                line_number,
                column,
                raw,
            } => write!(
                f,
                "line {line_number}: column {column} value '{raw}' is not a number; row skipped"
            ),
            Self::MalformedTime { line_number, raw } => write!(
                f,
                "line {line_number}: time value '{raw}' is neither a number nor a timestamp; row skipped"
            ),
            Self::MalformedColor { line_number, token } => write!(
                f,
                "line {line_number}: '{token}' is not a valid color token; series left uncolored"
            ),
            Self::ColorCountMismatch {
                line_number,
                colors,
                series,
            } => write!(
                f,
                "line {line_number}: {colors} color tokens for {series} series"
            ),
            Self::MalformedNote { line_number, raw } => {
                write!(f, "line {line_number}: malformed note '{raw}'; note dropped")
            }
            Self::UnknownMetadata {
                line_number,
                keyword,
            } => write!(
                f,
                "line {line_number}: unknown metadata keyword '{keyword}'; line skipped"
            ),
        }
    }
}

impl std::error::Error for Diagnostic {}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for ScopeTraceError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for ScopeTrace results.
pub type Result<T> = std::result::Result<T, ScopeTraceError>;
