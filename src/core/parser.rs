// ScopeTrace - core/parser.rs
//
// Stream-oriented ingestion of delimiter-separated scope log files.
// Core layer: accepts BufRead sources, never touches the filesystem.
//
// One forward pass, line-oriented, no seeking. Fatal conditions (bad
// options, unreadable stream, out-of-range time column) abort with no
// partial dataset; per-row anomalies are collected as diagnostics and the
// pass continues — best-effort extraction with full auditability of what
// was dropped.

use crate::core::model::{Dataset, Note, Rgb};
use crate::core::options::ParseOptions;
use crate::core::timeline::{self, CounterRebase, TimeEncoding};
use crate::util::constants;
use crate::util::error::{Diagnostic, ParseError};
use std::io::BufRead;

/// Result of parsing a single data file.
#[derive(Debug)]
pub struct ParseResult {
    /// The extracted dataset. May hold zero rows; an empty dataset is not
    /// an error by itself.
    pub dataset: Dataset,

    /// Recoverable anomalies in line-number order. Every skipped row and
    /// dropped metadata token is represented exactly once.
    pub diagnostics: Vec<Diagnostic>,

    /// Total physical lines consumed from the stream.
    pub lines_processed: u64,
}

/// Time cell classification for one data row, before unit handling.
enum RowTime {
    Relative(f64),
    Absolute(f64),
}

/// Parse a data file from any buffered reader.
///
/// The reader is consumed until exhaustion or fatal failure; the caller
/// owns stream lifetime and can cancel by closing the underlying source,
/// which surfaces as `ParseError::Stream`. Re-entrant: no state is shared
/// across calls.
pub fn parse_reader<R: BufRead>(
    reader: R,
    options: &ParseOptions,
) -> Result<ParseResult, ParseError> {
    validate_options(options)?;

    let mut dataset = Dataset::default();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut lines_processed: u64 = 0;
    let mut expected_columns = 0usize;
    let mut header_seen = false;
    let mut encoding: Option<TimeEncoding> = None;
    let mut rebase = CounterRebase::new();
    let mut color_tokens: Vec<Option<Rgb>> = Vec::new();
    let mut colors_line: Option<u64> = None;

    for (line_idx, line_result) in reader.lines().enumerate() {
        let line_number = (line_idx as u64) + 1;
        let line = line_result.map_err(|e| ParseError::Stream {
            line_number,
            source: e,
        })?;
        lines_processed += 1;
        let trimmed = line.trim();

        // Metadata lines carry the sigil right after the comment prefix and
        // are recognised at any position, including before the label row.
        if let Some(body) = metadata_body(trimmed, &options.comment_prefix) {
            handle_metadata(
                body,
                line_number,
                options,
                &mut dataset.notes,
                &mut color_tokens,
                &mut colors_line,
                &mut diagnostics,
            );
            continue;
        }

        // Comments are recognised at any row position and never consume a
        // data-row slot.
        if !options.comment_prefix.is_empty() && trimmed.starts_with(&options.comment_prefix) {
            continue;
        }

        // Blank lines carry no data-row slot either.
        if trimmed.is_empty() {
            continue;
        }

        if line_idx < options.label_row {
            continue;
        }

        if line_idx == options.label_row {
            let cells: Vec<&str> = line.split(options.field_separator).collect();
            if options.time_column >= cells.len() {
                return Err(ParseError::TimeColumnOutOfRange {
                    time_column: options.time_column,
                    column_count: cells.len(),
                });
            }
            expected_columns = cells.len();
            for (column, cell) in cells.iter().enumerate() {
                if column != options.time_column {
                    dataset.series_labels.push(cell.trim().to_string());
                }
            }
            dataset.series_values = vec![Vec::new(); dataset.series_labels.len()];
            dataset.axis_label =
                timeline::axis_label(cells[options.time_column], options.time_in_milliseconds);
            header_seen = true;
            continue;
        }

        if line_idx < options.data_row {
            // Filler between header and data region.
            continue;
        }

        // Candidate data line.
        if !header_seen {
            // The label row was consumed as a comment, metadata, or blank
            // line; without a header there is no column structure to parse
            // against.
            return Err(ParseError::HeaderRowMissing {
                label_row: options.label_row,
                line_number,
            });
        }

        let cells: Vec<&str> = line.split(options.field_separator).collect();
        if cells.len() != expected_columns {
            diagnostics.push(Diagnostic::ColumnCountMismatch {
                line_number,
                expected: expected_columns,
                actual: cells.len(),
            });
            continue;
        }

        let raw_time = cells[options.time_column];
        let row_time = match classify_time(raw_time, options, &mut encoding) {
            Some(t) => t,
            None => {
                diagnostics.push(Diagnostic::MalformedTime {
                    line_number,
                    raw: raw_time.trim().to_string(),
                });
                continue;
            }
        };

        // Series cells, row-atomic: the first bad cell drops the whole row
        // so every kept row stays aligned across all series.
        let mut row = Vec::with_capacity(dataset.series_labels.len());
        let mut bad_cell: Option<(usize, &str)> = None;
        for (column, cell) in cells.iter().enumerate() {
            if column == options.time_column {
                continue;
            }
            match parse_locale_number(cell, options) {
                Some(value) => row.push(value),
                None => {
                    bad_cell = Some((column, cell));
                    break;
                }
            }
        }
        if let Some((column, cell)) = bad_cell {
            diagnostics.push(Diagnostic::MalformedNumber {
                line_number,
                column,
                raw: cell.trim().to_string(),
            });
            continue;
        }

        // Commit. The rebase only ever sees accepted rows.
        let time = match row_time {
            RowTime::Relative(raw) => {
                let raw = if options.counter_correction {
                    rebase.apply(raw)
                } else {
                    raw
                };
                if options.time_in_milliseconds {
                    raw
                } else {
                    raw * constants::MILLISECONDS_PER_SECOND
                }
            }
            RowTime::Absolute(millis) => millis,
        };
        dataset.time_values.push(time);
        for (series, value) in dataset.series_values.iter_mut().zip(row) {
            series.push(value);
        }
    }

    // Absolute-timestamp files get the bare axis label regardless of the
    // header text or unit options.
    if encoding == Some(TimeEncoding::Absolute) {
        dataset.axis_label = constants::AXIS_LABEL_ABSOLUTE.to_string();
    }

    // Map accumulated color tokens onto the series list. Tokens beyond the
    // series count and series beyond the token count are both reported once.
    if !color_tokens.is_empty() {
        let series = dataset.series_labels.len();
        if color_tokens.len() != series {
            diagnostics.push(Diagnostic::ColorCountMismatch {
                line_number: colors_line.unwrap_or(0),
                colors: color_tokens.len(),
                series,
            });
        }
        color_tokens.resize(series, None);
        dataset.series_colors = color_tokens;
    }

    // Metadata validated at end of pass still lands in line order.
    diagnostics.sort_by_key(|d| d.line_number());

    tracing::debug!(
        rows = dataset.row_count(),
        series = dataset.series_count(),
        diagnostics = diagnostics.len(),
        lines = lines_processed,
        "Ingestion complete"
    );

    Ok(ParseResult {
        dataset,
        diagnostics,
        lines_processed,
    })
}

/// Convenience wrapper for in-memory content.
pub fn parse_content(content: &str, options: &ParseOptions) -> Result<ParseResult, ParseError> {
    parse_reader(content.as_bytes(), options)
}

// =============================================================================
// Option validation
// =============================================================================

/// Reject contradictory options before touching the stream.
fn validate_options(options: &ParseOptions) -> Result<(), ParseError> {
    let pairs = [
        ("decimal", options.decimal_separator, "group", options.group_separator),
        ("field", options.field_separator, "decimal", options.decimal_separator),
        ("field", options.field_separator, "group", options.group_separator),
    ];
    for (first, a, second, b) in pairs {
        if a == b {
            return Err(ParseError::SeparatorConflict {
                first,
                second,
                value: a,
            });
        }
    }
    if options.data_row < options.label_row {
        return Err(ParseError::RowOrderConflict {
            label_row: options.label_row,
            data_row: options.data_row,
        });
    }
    Ok(())
}

// =============================================================================
// Cell parsing
// =============================================================================

/// Convert a cell to f64 under the configured locale: strip every group
/// separator, substitute the decimal separator with the canonical point,
/// trim, parse. No ambient process locale is involved.
fn parse_locale_number(cell: &str, options: &ParseOptions) -> Option<f64> {
    let normalised: String = cell
        .chars()
        .filter(|&c| c != options.group_separator)
        .map(|c| {
            if c == options.decimal_separator {
                '.'
            } else {
                c
            }
        })
        .collect();
    let trimmed = normalised.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Classify the time cell of one data row.
///
/// The first row whose cell parses decides the encoding for the whole file:
/// numeric wins over calendar timestamp, so plain numbers never flip a file
/// into absolute mode. Once decided, the other interpretation is no longer
/// attempted.
fn classify_time(
    raw: &str,
    options: &ParseOptions,
    encoding: &mut Option<TimeEncoding>,
) -> Option<RowTime> {
    match *encoding {
        Some(TimeEncoding::Relative) => {
            parse_locale_number(raw, options).map(RowTime::Relative)
        }
        Some(TimeEncoding::Absolute) => {
            timeline::parse_calendar_timestamp(raw.trim()).map(RowTime::Absolute)
        }
        None => {
            if let Some(value) = parse_locale_number(raw, options) {
                *encoding = Some(TimeEncoding::Relative);
                Some(RowTime::Relative(value))
            } else if let Some(millis) = timeline::parse_calendar_timestamp(raw.trim()) {
                *encoding = Some(TimeEncoding::Absolute);
                Some(RowTime::Absolute(millis))
            } else {
                None
            }
        }
    }
}

// =============================================================================
// Metadata lines
// =============================================================================

/// Return the metadata body (everything after the sigil) when the trimmed
/// line is a metadata line: comment prefix immediately followed by the
/// sigil. With an empty comment prefix the sigil alone marks the line.
fn metadata_body<'a>(trimmed: &'a str, comment_prefix: &str) -> Option<&'a str> {
    trimmed
        .strip_prefix(comment_prefix)
        .and_then(|rest| rest.strip_prefix(constants::METADATA_SIGIL))
}

/// Parse one metadata line. Anomalies become diagnostics; the pass never
/// stops here. Unknown keywords are reported once and skipped, keeping the
/// reader forgiving of extensions without being silent about them.
#[allow(clippy::too_many_arguments)]
fn handle_metadata(
    body: &str,
    line_number: u64,
    options: &ParseOptions,
    notes: &mut Vec<Note>,
    color_tokens: &mut Vec<Option<Rgb>>,
    colors_line: &mut Option<u64>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let keyword = body
        .split(options.field_separator)
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    if keyword == constants::COLORS_KEYWORD {
        if colors_line.is_none() {
            *colors_line = Some(line_number);
        }
        for token in body.split(options.field_separator).skip(1) {
            let token = token.trim();
            match Rgb::from_hex(token) {
                Some(color) => color_tokens.push(Some(color)),
                None => {
                    diagnostics.push(Diagnostic::MalformedColor {
                        line_number,
                        token: token.to_string(),
                    });
                    // The series keeps its slot but stays uncolored.
                    color_tokens.push(None);
                }
            }
        }
    } else if keyword == constants::NOTE_KEYWORD {
        // keyword ; key ; value ; text — the text field absorbs any further
        // separators so annotations can contain them freely.
        let mut parts = body.splitn(4, options.field_separator);
        parts.next(); // keyword
        match (parts.next(), parts.next(), parts.next()) {
            (Some(raw_key), Some(raw_value), Some(text)) => {
                match (
                    parse_locale_number(raw_key, options),
                    parse_locale_number(raw_value, options),
                ) {
                    (Some(key), Some(value)) => notes.push(Note {
                        key,
                        value,
                        text: text.trim().to_string(),
                    }),
                    _ => diagnostics.push(Diagnostic::MalformedNote {
                        line_number,
                        raw: body.to_string(),
                    }),
                }
            }
            _ => diagnostics.push(Diagnostic::MalformedNote {
                line_number,
                raw: body.to_string(),
            }),
        }
    } else {
        diagnostics.push(Diagnostic::UnknownMetadata {
            line_number,
            keyword,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    /// Export dialect on a day-first locale: semicolon fields, space
    /// grouping, comma decimals, ten comment/info lines before the header.
    const SCOPE_EXPORT: &str = "\
//ScopeTrace version;1.1.0
//Start time;2019-07-23 18:19:01
//End time;2019-07-23 18:19:06
//Slave IP;127.0.0.1;502
//Time-out;1000
//Poll time;1000
//Consecutive max;125
//Register count;3
//Export date;2019-07-23 18:19:10
//
Time (ms);Register 40001;Register 40002;Register 40003
25;6;12;18
1 024;8;16;24
2 025;10;20;30
3 025;0;0;0
4 024;2;4;6
";

    fn export_options() -> ParseOptions {
        ParseOptions {
            field_separator: ';',
            group_separator: ' ',
            decimal_separator: ',',
            comment_prefix: "//".to_string(),
            label_row: 10,
            data_row: 11,
            time_column: 0,
            time_in_milliseconds: true,
            counter_correction: false,
        }
    }

    /// Compact dialect: header on the first line, data from the second.
    fn compact_options() -> ParseOptions {
        ParseOptions {
            label_row: 0,
            data_row: 1,
            ..export_options()
        }
    }

    fn epoch_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> f64 {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
            .and_utc()
            .timestamp_millis() as f64
    }

    /// Alignment invariant shared by every successful parse.
    fn assert_aligned(result: &ParseResult) {
        let dataset = &result.dataset;
        assert_eq!(dataset.series_values.len(), dataset.series_labels.len());
        for series in &dataset.series_values {
            assert_eq!(series.len(), dataset.time_values.len());
        }
    }

    // -------------------------------------------------------------------------
    // Scope export dialect
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_scope_export() {
        let result = parse_content(SCOPE_EXPORT, &export_options()).unwrap();

        assert_eq!(result.dataset.axis_label, "Time (ms)");
        assert_eq!(
            result.dataset.time_values,
            vec![25.0, 1024.0, 2025.0, 3025.0, 4024.0]
        );
        assert_eq!(
            result.dataset.series_labels,
            vec!["Register 40001", "Register 40002", "Register 40003"]
        );
        assert_eq!(
            result.dataset.series_values,
            vec![
                vec![6.0, 8.0, 10.0, 0.0, 2.0],
                vec![12.0, 16.0, 20.0, 0.0, 4.0],
                vec![18.0, 24.0, 30.0, 0.0, 6.0],
            ]
        );
        assert!(result.dataset.series_colors.is_empty());
        assert!(result.dataset.notes.is_empty());
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.lines_processed, 16);
        assert_aligned(&result);
    }

    /// Re-parsing the same content yields an identical dataset.
    #[test]
    fn test_parse_is_deterministic() {
        let options = export_options();
        let first = parse_content(SCOPE_EXPORT, &options).unwrap();
        let second = parse_content(SCOPE_EXPORT, &options).unwrap();
        assert_eq!(first.dataset, second.dataset);
        assert_eq!(first.diagnostics, second.diagnostics);
    }

    /// Rewriting `,` decimals as `.` (and swapping the options to match)
    /// yields numerically identical output.
    #[test]
    fn test_decimal_separator_equivalence() {
        let comma = "Time (ms);R1;R2\n25;1,5;2,25\n50;3,5;4,75\n";
        let dot = "Time (ms);R1;R2\n25;1.5;2.25\n50;3.5;4.75\n";

        let comma_result = parse_content(comma, &compact_options()).unwrap();
        let dot_result = parse_content(
            dot,
            &ParseOptions {
                decimal_separator: '.',
                ..compact_options()
            },
        )
        .unwrap();

        assert_eq!(comma_result.dataset.time_values, dot_result.dataset.time_values);
        assert_eq!(
            comma_result.dataset.series_values,
            dot_result.dataset.series_values
        );
        assert!(comma_result.diagnostics.is_empty());
        assert!(dot_result.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_us_dialect() {
        let content = "Time (ms),R1,R2\n48,0.0,0.5\n12 059,0.25,0.5\n";
        let options = ParseOptions {
            field_separator: ',',
            decimal_separator: '.',
            ..compact_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert_eq!(result.dataset.time_values, vec![48.0, 12059.0]);
        assert_eq!(result.dataset.series_values[0], vec![0.0, 0.25]);
        assert_eq!(result.dataset.series_values[1], vec![0.5, 0.5]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_signed_values() {
        let content = "Time (ms);R1;R2\n48;-2;-2,6\n12 059;0;-1,5\n";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.series_values[0], vec![-2.0, 0.0]);
        assert_eq!(result.dataset.series_values[1], vec![-2.6, -1.5]);
        assert!(result.diagnostics.is_empty());
    }

    // -------------------------------------------------------------------------
    // Line classification
    // -------------------------------------------------------------------------

    /// Rows before the data start index and comment lines never contribute
    /// data, regardless of content.
    #[test]
    fn test_pre_data_and_comment_lines_excluded() {
        let content = "\
Time (ms);R1
9999;9999
--checkpoint reached
10;1
--another comment
20;2
";
        let options = ParseOptions {
            comment_prefix: "--".to_string(),
            label_row: 0,
            data_row: 2,
            ..export_options()
        };
        let result = parse_content(content, &options).unwrap();
        // Line index 1 (9999;9999) is filler between header and data start.
        assert_eq!(result.dataset.time_values, vec![10.0, 20.0]);
        assert!(result.diagnostics.is_empty());
        assert_aligned(&result);
    }

    #[test]
    fn test_blank_lines_skipped_everywhere() {
        let content = "Time (ms);R1\n\n10;1\n   \n20;2\n\n";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.time_values, vec![10.0, 20.0]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_comment_prefix_disables_comment_skipping() {
        // With comment skipping disabled, "//x;1" is a data row and fails
        // numeric conversion instead of vanishing silently.
        let content = "Time (ms);R1\n//x;1\n10;1\n";
        let options = ParseOptions {
            comment_prefix: String::new(),
            ..compact_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert_eq!(result.dataset.time_values, vec![10.0]);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::MalformedTime { line_number: 2, .. }
        ));
    }

    #[test]
    fn test_time_column_other_than_first() {
        let content = "R1;Time (ms);R2\n1;25;2\n3;50;4\n";
        let options = ParseOptions {
            time_column: 1,
            ..compact_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert_eq!(result.dataset.series_labels, vec!["R1", "R2"]);
        assert_eq!(result.dataset.time_values, vec![25.0, 50.0]);
        assert_eq!(result.dataset.series_values[0], vec![1.0, 3.0]);
        assert_eq!(result.dataset.series_values[1], vec![2.0, 4.0]);
    }

    // -------------------------------------------------------------------------
    // Recoverable anomalies
    // -------------------------------------------------------------------------

    /// One corrupted row among N: exactly N-1 rows survive and exactly one
    /// diagnostic cites the corrupted line.
    #[test]
    fn test_column_count_mismatch_skips_only_that_row() {
        let mut lines: Vec<&str> = SCOPE_EXPORT.lines().collect();
        lines.insert(13, "99;99"); // between data rows, wrong column count
        let content = lines.join("\n");

        let clean = parse_content(SCOPE_EXPORT, &export_options()).unwrap();
        let result = parse_content(&content, &export_options()).unwrap();

        assert_eq!(
            result.dataset.time_values.len(),
            clean.dataset.time_values.len()
        );
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::ColumnCountMismatch {
                line_number: 14,
                expected: 4,
                actual: 2,
            }
        ));
        // Rows on either side of the corruption are unaffected.
        assert_eq!(
            result.dataset.time_values,
            vec![25.0, 1024.0, 2025.0, 3025.0, 4024.0]
        );
        assert_aligned(&result);
    }

    /// A bad series cell drops the whole row (row-atomic), keeping every
    /// series aligned with the time axis.
    #[test]
    fn test_malformed_series_cell_drops_whole_row() {
        let content = "Time (ms);R1;R2\n10;1;2\n20;oops;3\n30;4;5\n";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.time_values, vec![10.0, 30.0]);
        assert_eq!(result.dataset.series_values[0], vec![1.0, 4.0]);
        assert_eq!(result.dataset.series_values[1], vec![2.0, 5.0]);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            &result.diagnostics[0],
            Diagnostic::MalformedNumber {
                line_number: 3,
                column: 1,
                raw,
            } if raw == "oops"
        ));
        assert_aligned(&result);
    }

    #[test]
    fn test_malformed_time_cell_drops_row() {
        let content = "Time (ms);R1\n10;1\nbad;2\n30;3\n";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.time_values, vec![10.0, 30.0]);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            &result.diagnostics[0],
            Diagnostic::MalformedTime { line_number: 3, raw } if raw == "bad"
        ));
    }

    #[test]
    fn test_diagnostics_reported_in_line_order() {
        let content = "Time (ms);R1\nbad;1\n20;2\n30;x\n40;4\n50\n";
        let result = parse_content(content, &compact_options()).unwrap();
        let lines: Vec<u64> = result.diagnostics.iter().map(|d| d.line_number()).collect();
        assert_eq!(lines, vec![2, 4, 6]);
        assert_eq!(result.dataset.time_values, vec![20.0, 40.0]);
    }

    // -------------------------------------------------------------------------
    // Metadata: colors and notes
    // -------------------------------------------------------------------------

    #[test]
    fn test_colors_and_note_metadata() {
        let content = "\
//ScopeTrace version;3.0.0
//@colors;#000000;#0000FF
//@note;800,605;1,667;Test
Time (ms);Register 40001;Register 40002
37;0;0
262;0;0
";
        let options = ParseOptions {
            label_row: 3,
            data_row: 4,
            ..export_options()
        };
        let result = parse_content(content, &options).unwrap();

        assert_eq!(result.dataset.time_values, vec![37.0, 262.0]);
        assert_eq!(
            result.dataset.series_colors,
            vec![
                Some(Rgb { r: 0, g: 0, b: 0 }),
                Some(Rgb { r: 0, g: 0, b: 255 }),
            ]
        );
        assert_eq!(result.dataset.notes.len(), 1);
        assert_eq!(result.dataset.notes[0].key, 800.605);
        assert_eq!(result.dataset.notes[0].value, 1.667);
        assert_eq!(result.dataset.notes[0].text, "Test");
        assert!(result.diagnostics.is_empty());
    }

    /// The note text absorbs further separators.
    #[test]
    fn test_note_text_keeps_embedded_separators() {
        let content = "//@note;10;2;left;right\nTime (ms);R1\n10;1\n";
        let options = ParseOptions {
            label_row: 1,
            data_row: 2,
            ..export_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert_eq!(result.dataset.notes[0].text, "left;right");
    }

    /// A malformed color token leaves that series uncolored rather than
    /// inventing a default.
    #[test]
    fn test_malformed_color_token_leaves_series_uncolored() {
        let content = "//@colors;#000000;nonsense\nTime (ms);R1;R2\n10;1;2\n";
        let options = ParseOptions {
            label_row: 1,
            data_row: 2,
            ..export_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert_eq!(
            result.dataset.series_colors,
            vec![Some(Rgb { r: 0, g: 0, b: 0 }), None]
        );
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            &result.diagnostics[0],
            Diagnostic::MalformedColor { line_number: 1, token } if token == "nonsense"
        ));
    }

    #[test]
    fn test_color_count_mismatch_reported() {
        let content = "//@colors;#000000\nTime (ms);R1;R2\n10;1;2\n";
        let options = ParseOptions {
            label_row: 1,
            data_row: 2,
            ..export_options()
        };
        let result = parse_content(content, &options).unwrap();
        // The aligned token still applies; the missing one stays absent.
        assert_eq!(
            result.dataset.series_colors,
            vec![Some(Rgb { r: 0, g: 0, b: 0 }), None]
        );
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::ColorCountMismatch {
                line_number: 1,
                colors: 1,
                series: 2,
            }
        ));
    }

    #[test]
    fn test_malformed_note_dropped_with_diagnostic() {
        let content = "//@note;not-a-number;2;text\n//@note;1;2\nTime (ms);R1\n10;1\n";
        let options = ParseOptions {
            label_row: 2,
            data_row: 3,
            ..export_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert!(result.dataset.notes.is_empty());
        assert_eq!(result.diagnostics.len(), 2);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::MalformedNote { line_number: 1, .. }
        ));
        assert!(matches!(
            result.diagnostics[1],
            Diagnostic::MalformedNote { line_number: 2, .. }
        ));
    }

    /// Unknown metadata keywords are reported, not silently swallowed, and
    /// the pass continues.
    #[test]
    fn test_unknown_metadata_keyword_reported() {
        let content = "//@markers;1;2\nTime (ms);R1\n10;1\n";
        let options = ParseOptions {
            label_row: 1,
            data_row: 2,
            ..export_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert_eq!(result.dataset.time_values, vec![10.0]);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            &result.diagnostics[0],
            Diagnostic::UnknownMetadata { line_number: 1, keyword } if keyword == "markers"
        ));
    }

    // -------------------------------------------------------------------------
    // Time axis
    // -------------------------------------------------------------------------

    /// Seconds input is scaled to the millisecond output axis; the label
    /// keeps advertising the raw unit.
    #[test]
    fn test_seconds_input_scaled_to_milliseconds() {
        let content = "Time;R1\n0;1\n0,5;2\n1;3\n";
        let options = ParseOptions {
            time_in_milliseconds: false,
            ..compact_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert_eq!(result.dataset.axis_label, "Time (s)");
        assert_eq!(result.dataset.time_values, vec![0.0, 500.0, 1000.0]);
    }

    #[test]
    fn test_absolute_timestamps_become_epoch_milliseconds() {
        let content = "\
Time;Register 40001;Register 40002
2019-07-24 15:39:31.898;0;6
2019-07-24 15:39:32.898;1;5
2019-07-24 15:39:37.035;6;0
";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.axis_label, "Time");
        assert_eq!(
            result.dataset.time_values,
            vec![
                epoch_ms(2019, 7, 24, 15, 39, 31, 898),
                epoch_ms(2019, 7, 24, 15, 39, 32, 898),
                epoch_ms(2019, 7, 24, 15, 39, 37, 35),
            ]
        );
        assert_eq!(result.dataset.series_values[0], vec![0.0, 1.0, 6.0]);
        assert_eq!(result.dataset.series_values[1], vec![6.0, 5.0, 0.0]);
        assert!(result.diagnostics.is_empty());
    }

    /// Absolute mode overrides a header unit annotation: the label is the
    /// bare "Time" and no unit scaling is applied.
    #[test]
    fn test_absolute_mode_overrides_header_annotation() {
        let content = "Time (ms);R1\n24-07-2019 15:39:31,898;1\n";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.axis_label, "Time");
        assert_eq!(
            result.dataset.time_values,
            vec![epoch_ms(2019, 7, 24, 15, 39, 31, 898)]
        );
    }

    /// Once a file is classified relative, a timestamp-shaped cell is a
    /// malformed time value, not a mode switch.
    #[test]
    fn test_encoding_is_sticky_after_first_row() {
        let content = "Time (ms);R1\n10;1\n2019-07-24 15:39:31;2\n30;3\n";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.time_values, vec![10.0, 30.0]);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::MalformedTime { line_number: 3, .. }
        ));
    }

    #[test]
    fn test_counter_correction_rebases_wrapped_counter() {
        let content = "Time (ms);R1\n4294967000;1\n4294967200;2\n100;3\n300;4\n";
        let options = ParseOptions {
            counter_correction: true,
            ..compact_options()
        };
        let result = parse_content(content, &options).unwrap();
        assert_eq!(
            result.dataset.time_values,
            vec![
                4_294_967_000.0,
                4_294_967_200.0,
                100.0 + constants::COUNTER_WRAP_MODULUS,
                300.0 + constants::COUNTER_WRAP_MODULUS,
            ]
        );

        // Without the correction the raw values pass through untouched.
        let raw = parse_content(content, &compact_options()).unwrap();
        assert_eq!(
            raw.dataset.time_values,
            vec![4_294_967_000.0, 4_294_967_200.0, 100.0, 300.0]
        );
    }

    /// A dropped row must not advance the rebase state: the wrap detection
    /// compares against the previous accepted sample only.
    #[test]
    fn test_counter_correction_ignores_dropped_rows() {
        let content = "Time (ms);R1\n500;1\n10;oops\n600;2\n";
        let options = ParseOptions {
            counter_correction: true,
            ..compact_options()
        };
        let result = parse_content(content, &options).unwrap();
        // Line 3 is dropped for its bad series cell; its low time value must
        // not have registered as a wrap.
        assert_eq!(result.dataset.time_values, vec![500.0, 600.0]);
        assert_eq!(result.diagnostics.len(), 1);
    }

    // -------------------------------------------------------------------------
    // Fatal errors
    // -------------------------------------------------------------------------

    #[test]
    fn test_equal_decimal_and_group_separator_is_fatal() {
        let options = ParseOptions {
            decimal_separator: ' ',
            ..export_options()
        };
        let result = parse_content(SCOPE_EXPORT, &options);
        assert!(matches!(
            result,
            Err(ParseError::SeparatorConflict { value: ' ', .. })
        ));
    }

    #[test]
    fn test_field_separator_clashing_with_decimal_is_fatal() {
        let options = ParseOptions {
            field_separator: ',',
            ..export_options()
        };
        let result = parse_content(SCOPE_EXPORT, &options);
        assert!(matches!(result, Err(ParseError::SeparatorConflict { .. })));
    }

    #[test]
    fn test_data_row_before_label_row_is_fatal() {
        let options = ParseOptions {
            label_row: 5,
            data_row: 2,
            ..export_options()
        };
        let result = parse_content(SCOPE_EXPORT, &options);
        assert!(matches!(
            result,
            Err(ParseError::RowOrderConflict {
                label_row: 5,
                data_row: 2,
            })
        ));
    }

    #[test]
    fn test_time_column_out_of_range_is_fatal() {
        let options = ParseOptions {
            time_column: 4,
            ..export_options()
        };
        let result = parse_content(SCOPE_EXPORT, &options);
        assert!(matches!(
            result,
            Err(ParseError::TimeColumnOutOfRange {
                time_column: 4,
                column_count: 4,
            })
        ));
    }

    /// The label row landing on a comment leaves no header to parse data
    /// against; detected at the first data line.
    #[test]
    fn test_header_consumed_as_comment_is_fatal() {
        let content = "//not a header\n10;1\n20;2\n";
        let options = ParseOptions {
            label_row: 0,
            data_row: 1,
            ..export_options()
        };
        let result = parse_content(content, &options);
        assert!(matches!(
            result,
            Err(ParseError::HeaderRowMissing {
                label_row: 0,
                line_number: 2,
            })
        ));
    }

    // -------------------------------------------------------------------------
    // Degenerate inputs
    // -------------------------------------------------------------------------

    /// Empty input is a valid, empty dataset — callers decide whether that
    /// is actionable.
    #[test]
    fn test_empty_content() {
        let result = parse_content("", &export_options()).unwrap();
        assert!(result.dataset.time_values.is_empty());
        assert!(result.dataset.series_labels.is_empty());
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.lines_processed, 0);
    }

    /// A header with no data rows is equally valid.
    #[test]
    fn test_header_only_content() {
        let content = "Time (ms);R1;R2\n";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.series_labels, vec!["R1", "R2"]);
        assert_eq!(result.dataset.axis_label, "Time (ms)");
        assert!(result.dataset.time_values.is_empty());
        assert!(result.diagnostics.is_empty());
        assert_aligned(&result);
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "Time (ms);R1\r\n10;1\r\n20;2\r\n";
        let result = parse_content(content, &compact_options()).unwrap();
        assert_eq!(result.dataset.time_values, vec![10.0, 20.0]);
        assert_eq!(result.dataset.series_values[0], vec![1.0, 2.0]);
        assert!(result.diagnostics.is_empty());
    }
}
