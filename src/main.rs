// ScopeTrace - main.rs
//
// CLI entry point. Handles:
// 1. Argument parsing
// 2. Logging initialisation (debug mode support)
// 3. Options resolution (profile file + flag overrides)
// 4. Per-file ingestion, summary output, and exports

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use scopetrace::app;
use scopetrace::core::options::ParseOptions;
use scopetrace::util;

/// ScopeTrace - configurable ingestion of delimiter-separated scope log
/// files into structured time-series data.
///
/// The file format is described entirely by the options: separators,
/// header/data row positions, time column, and time unit. Recoverable
/// anomalies are listed per file; parsing continues past them.
#[derive(Parser, Debug)]
#[command(name = "scopetrace", version, about)]
struct Cli {
    /// Data files to ingest.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Options profile (TOML). Individual flags below override its values.
    #[arg(short = 'p', long = "profile")]
    profile: Option<PathBuf>,

    /// Column separator for label and data lines.
    #[arg(long)]
    field_separator: Option<char>,

    /// Thousands-grouping character stripped before numeric conversion.
    #[arg(long)]
    group_separator: Option<char>,

    /// Character standing for the decimal point.
    #[arg(long)]
    decimal_separator: Option<char>,

    /// Comment prefix; pass an empty string to disable comment skipping.
    #[arg(long)]
    comment_prefix: Option<String>,

    /// Zero-based line number of the column-header row.
    #[arg(long)]
    label_row: Option<usize>,

    /// Zero-based line number where data rows begin.
    #[arg(long)]
    data_row: Option<usize>,

    /// Zero-based column holding the time axis.
    #[arg(long)]
    time_column: Option<usize>,

    /// Raw time values are seconds instead of milliseconds.
    #[arg(long)]
    seconds: bool,

    /// Rebase a wrapping device counter into a monotonic timeline.
    #[arg(long)]
    counter_correction: bool,

    /// Write the ingested dataset to a CSV file (single input file only).
    #[arg(long)]
    export_csv: Option<PathBuf>,

    /// Write the ingested dataset to a JSON file (single input file only).
    #[arg(long)]
    export_json: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long)]
    debug: bool,
}

impl Cli {
    /// Resolve the effective parse options: profile file (or defaults),
    /// then flag overrides.
    fn resolve_options(&self) -> Result<ParseOptions, util::error::ScopeTraceError> {
        let mut options = match &self.profile {
            Some(path) => app::profiles::load_profile(path)?,
            None => ParseOptions::default(),
        };

        if let Some(c) = self.field_separator {
            options.field_separator = c;
        }
        if let Some(c) = self.group_separator {
            options.group_separator = c;
        }
        if let Some(c) = self.decimal_separator {
            options.decimal_separator = c;
        }
        if let Some(prefix) = &self.comment_prefix {
            options.comment_prefix = prefix.clone();
        }
        if let Some(row) = self.label_row {
            options.label_row = row;
        }
        if let Some(row) = self.data_row {
            options.data_row = row;
        }
        if let Some(column) = self.time_column {
            options.time_column = column;
        }
        if self.seconds {
            options.time_in_milliseconds = false;
        }
        if self.counter_correction {
            options.counter_correction = true;
        }

        Ok(options)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    util::logging::init(cli.debug);

    tracing::info!(
        version = util::constants::APP_VERSION,
        files = cli.files.len(),
        "ScopeTrace starting"
    );

    if (cli.export_csv.is_some() || cli.export_json.is_some()) && cli.files.len() != 1 {
        eprintln!("Error: --export-csv/--export-json require exactly one input file");
        return ExitCode::FAILURE;
    }

    let options = match cli.resolve_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    for path in &cli.files {
        let result = match app::runner::parse_file(path, &options) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        };

        println!(
            "{}: {} rows x {} series ({}), {} notes, {} diagnostics",
            path.display(),
            result.dataset.row_count(),
            result.dataset.series_count(),
            result.dataset.axis_label,
            result.dataset.notes.len(),
            result.diagnostics.len(),
        );
        for diagnostic in &result.diagnostics {
            println!("  {diagnostic}");
        }

        if let Some(csv_path) = &cli.export_csv {
            if let Err(e) = app::runner::export_csv_file(&result.dataset, csv_path) {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
        if let Some(json_path) = &cli.export_json {
            if let Err(e) = app::runner::export_json_file(&result.dataset, json_path) {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
