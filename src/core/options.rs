// ScopeTrace - core/options.rs
//
// Parse options: the dialect description for one ingestion run, plus the
// TOML profile layer that builds the same value from a file on disk.
// Core layer: accepts TOML strings, never touches the filesystem directly.

use crate::util::constants;
use crate::util::error::ProfileError;
use serde::Deserialize;
use std::path::PathBuf;

// =============================================================================
// ParseOptions (runtime representation)
// =============================================================================

/// Options for one parse run.
///
/// Plain data: nothing is validated on construction. The parser rejects
/// contradictory values where the problem is detected (conflicting
/// separators at entry, an out-of-range time column once the header is
/// known), which keeps incremental option assembly decoupled from semantic
/// checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Splits a label/data line into columns.
    pub field_separator: char,

    /// Thousands-grouping character stripped before numeric conversion.
    /// Must differ from `decimal_separator`.
    pub group_separator: char,

    /// Character standing for the decimal point in numeric fields.
    pub decimal_separator: char,

    /// Lines whose trimmed content starts with this prefix are skipped at
    /// any row position. Empty disables comment skipping.
    pub comment_prefix: String,

    /// Zero-based line index of the column-header row.
    pub label_row: usize,

    /// Zero-based line index where data rows begin. Must be >= `label_row`.
    pub data_row: usize,

    /// Zero-based column index of the time axis; every other column is a
    /// data series in left-to-right order.
    pub time_column: usize,

    /// Raw time values are milliseconds (false: seconds). The output axis is
    /// always milliseconds.
    pub time_in_milliseconds: bool,

    /// Rebase a wrapping free-running device counter into a monotonically
    /// extending timeline (see core::timeline::CounterRebase).
    pub counter_correction: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            field_separator: constants::DEFAULT_FIELD_SEPARATOR,
            group_separator: constants::DEFAULT_GROUP_SEPARATOR,
            decimal_separator: constants::DEFAULT_DECIMAL_SEPARATOR,
            comment_prefix: constants::DEFAULT_COMMENT_PREFIX.to_string(),
            label_row: constants::DEFAULT_LABEL_ROW,
            data_row: constants::DEFAULT_DATA_ROW,
            time_column: constants::DEFAULT_TIME_COLUMN,
            time_in_milliseconds: true,
            counter_correction: false,
        }
    }
}

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw TOML options profile as deserialized from a .toml file.
/// Every key is optional; omitted keys take the `ParseOptions::default()`
/// values. Unknown keys are ignored so profiles stay forward-compatible.
#[derive(Debug, Deserialize, Default)]
pub struct OptionsDefinition {
    #[serde(default)]
    pub separators: SeparatorsDef,
    #[serde(default)]
    pub layout: LayoutDef,
    #[serde(default)]
    pub time: TimeDef,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SeparatorsDef {
    pub field: String,
    pub group: String,
    pub decimal: String,
}

impl Default for SeparatorsDef {
    fn default() -> Self {
        Self {
            field: constants::DEFAULT_FIELD_SEPARATOR.to_string(),
            group: constants::DEFAULT_GROUP_SEPARATOR.to_string(),
            decimal: constants::DEFAULT_DECIMAL_SEPARATOR.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutDef {
    pub comment_prefix: String,
    pub label_row: usize,
    pub data_row: usize,
    pub time_column: usize,
}

impl Default for LayoutDef {
    fn default() -> Self {
        Self {
            comment_prefix: constants::DEFAULT_COMMENT_PREFIX.to_string(),
            label_row: constants::DEFAULT_LABEL_ROW,
            data_row: constants::DEFAULT_DATA_ROW,
            time_column: constants::DEFAULT_TIME_COLUMN,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimeDef {
    pub milliseconds: bool,
    pub counter_correction: bool,
}

impl Default for TimeDef {
    fn default() -> Self {
        Self {
            milliseconds: true,
            counter_correction: false,
        }
    }
}

// =============================================================================
// Profile compilation
// =============================================================================

/// Parse a TOML string into an `OptionsDefinition`.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_options_toml(
    toml_content: &str,
    source_path: &PathBuf,
) -> Result<OptionsDefinition, ProfileError> {
    toml::from_str(toml_content).map_err(|e| ProfileError::TomlParse {
        path: source_path.clone(),
        source: e,
    })
}

/// Compile an `OptionsDefinition` into runtime `ParseOptions`.
///
/// Separator fields must hold exactly one character; everything else is
/// taken as-is. Semantic conflicts (equal separators, row ordering) stay
/// deferred to the parser.
pub fn compile(
    def: OptionsDefinition,
    source_path: &PathBuf,
) -> Result<ParseOptions, ProfileError> {
    let field_separator = single_char(&def.separators.field, "separators.field", source_path)?;
    let group_separator = single_char(&def.separators.group, "separators.group", source_path)?;
    let decimal_separator =
        single_char(&def.separators.decimal, "separators.decimal", source_path)?;

    Ok(ParseOptions {
        field_separator,
        group_separator,
        decimal_separator,
        comment_prefix: def.layout.comment_prefix,
        label_row: def.layout.label_row,
        data_row: def.layout.data_row,
        time_column: def.layout.time_column,
        time_in_milliseconds: def.time.milliseconds,
        counter_correction: def.time.counter_correction,
    })
}

fn single_char(
    value: &str,
    field: &'static str,
    path: &PathBuf,
) -> Result<char, ProfileError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ProfileError::NotASingleCharacter {
            path: path.clone(),
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_toml(toml: &str) -> Result<ParseOptions, ProfileError> {
        let path = PathBuf::from("test.toml");
        parse_options_toml(toml, &path).and_then(|def| compile(def, &path))
    }

    #[test]
    fn test_empty_profile_gives_defaults() {
        let options = compile_toml("").unwrap();
        assert_eq!(options, ParseOptions::default());
    }

    #[test]
    fn test_full_profile() {
        let toml = r##"
[separators]
field = ","
group = " "
decimal = "."

[layout]
comment_prefix = "#"
label_row = 3
data_row = 5
time_column = 1

[time]
milliseconds = false
counter_correction = true
"##;
        let options = compile_toml(toml).unwrap();
        assert_eq!(options.field_separator, ',');
        assert_eq!(options.decimal_separator, '.');
        assert_eq!(options.comment_prefix, "#");
        assert_eq!(options.label_row, 3);
        assert_eq!(options.data_row, 5);
        assert_eq!(options.time_column, 1);
        assert!(!options.time_in_milliseconds);
        assert!(options.counter_correction);
    }

    #[test]
    fn test_partial_profile_keeps_other_defaults() {
        let toml = r#"
[layout]
label_row = 10
data_row = 11
"#;
        let options = compile_toml(toml).unwrap();
        assert_eq!(options.label_row, 10);
        assert_eq!(options.data_row, 11);
        assert_eq!(
            options.field_separator,
            ParseOptions::default().field_separator
        );
        assert!(options.time_in_milliseconds);
    }

    #[test]
    fn test_multi_char_separator_rejected() {
        let result = compile_toml("[separators]\nfield = \";;\"\n");
        assert!(
            matches!(
                result,
                Err(ProfileError::NotASingleCharacter { field: "separators.field", .. })
            ),
            "expected NotASingleCharacter, got {result:?}"
        );
    }

    #[test]
    fn test_empty_separator_rejected() {
        let result = compile_toml("[separators]\ndecimal = \"\"\n");
        assert!(matches!(
            result,
            Err(ProfileError::NotASingleCharacter { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = compile_toml("[separators\nfield = ;");
        assert!(matches!(result, Err(ProfileError::TomlParse { .. })));
    }

    /// Unknown tables and keys are tolerated so future profile versions can
    /// add sections without breaking older builds.
    #[test]
    fn test_unknown_keys_ignored() {
        let toml = r#"
[layout]
label_row = 2

[future_section]
whatever = true
"#;
        let options = compile_toml(toml).unwrap();
        assert_eq!(options.label_row, 2);
    }
}
