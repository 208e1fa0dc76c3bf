// ScopeTrace - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ScopeTrace";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Default parse dialect
// =============================================================================

/// Default column separator for label and data lines.
pub const DEFAULT_FIELD_SEPARATOR: char = ';';

/// Default thousands-grouping character stripped before numeric conversion.
pub const DEFAULT_GROUP_SEPARATOR: char = ' ';

/// Default character standing for the decimal point in numeric fields.
pub const DEFAULT_DECIMAL_SEPARATOR: char = ',';

/// Default comment prefix. An empty prefix disables comment skipping.
pub const DEFAULT_COMMENT_PREFIX: &str = "//";

/// Default zero-based line index of the column-header row.
pub const DEFAULT_LABEL_ROW: usize = 0;

/// Default zero-based line index where data rows begin.
pub const DEFAULT_DATA_ROW: usize = 1;

/// Default zero-based column index of the time axis.
pub const DEFAULT_TIME_COLUMN: usize = 0;

// =============================================================================
// Metadata lines
// =============================================================================

/// Character that marks a metadata line, placed immediately after the comment
/// prefix: `//@colors;#112233` or, with comment skipping disabled, `@note;...`.
/// Documented in the README as a compatibility surface.
pub const METADATA_SIGIL: char = '@';

/// Metadata keyword for the per-series color list.
pub const COLORS_KEYWORD: &str = "colors";

/// Metadata keyword for a point annotation.
pub const NOTE_KEYWORD: &str = "note";

// =============================================================================
// Time axis
// =============================================================================

/// Scale factor applied to raw time values captured in seconds.
/// The output axis is always milliseconds.
pub const MILLISECONDS_PER_SECOND: f64 = 1_000.0;

/// Wrap modulus for the free-running device counter rebased by
/// `counter_correction`: the counter is 32 bits wide, so one full period
/// is 2^32 raw ticks.
pub const COUNTER_WRAP_MODULUS: f64 = 4_294_967_296.0;

/// Axis label when the time column holds absolute calendar timestamps.
pub const AXIS_LABEL_ABSOLUTE: &str = "Time";

/// Synthesized axis label for relative time in milliseconds.
pub const AXIS_LABEL_MILLISECONDS: &str = "Time (ms)";

/// Synthesized axis label for relative time captured in seconds.
pub const AXIS_LABEL_SECONDS: &str = "Time (s)";

// =============================================================================
// Options profiles
// =============================================================================

/// Maximum size of an options profile TOML file in bytes.
pub const MAX_PROFILE_FILE_SIZE: u64 = 64 * 1024; // 64 KB

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
