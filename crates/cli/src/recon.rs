//! `shelfcheck run|validate|config`: duplicate detection against a store export.

use std::path::{Path, PathBuf};

use log::info;
use shelfcheck_recon::export::{default_filtered_path, render_filtered, FilterStats};
use shelfcheck_recon::report::render_report;
use shelfcheck_recon::{load_records, InputFormat, ReconConfig, Reconciler, RecordSet};

use crate::exit_codes::{EXIT_DUPLICATES_FOUND, EXIT_ERROR};
use crate::CliError;

pub const DEFAULT_REPORT_NAME: &str = "duplicate_detection_report.txt";

pub struct RunArgs {
    pub import: PathBuf,
    pub existing: PathBuf,
    pub format: Option<InputFormat>,
    pub existing_format: Option<InputFormat>,
    pub config: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub output_report: Option<PathBuf>,
    pub output_filtered: Option<PathBuf>,
    pub json: bool,
    pub fail_on_duplicates: bool,
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
            Ok(ReconConfig::from_toml(&text)?)
        }
        None => Ok(ReconConfig::default()),
    }
}

/// Explicit format wins; otherwise the file extension decides.
fn resolve_format(path: &Path, explicit: Option<InputFormat>, flag: &str) -> Result<InputFormat, CliError> {
    explicit
        .or_else(|| InputFormat::from_path(path))
        .ok_or_else(|| {
            CliError::args(format!("cannot tell the format of {}", path.display()))
                .with_hint(format!("pass {flag} json or {flag} csv"))
        })
}

fn read_records(path: &Path, format: InputFormat) -> Result<RecordSet, CliError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
    let set = load_records(&bytes, format).map_err(|e| {
        CliError::from(e).with_hint(format!("{} was read as {format}", path.display()))
    })?;
    info!("loaded {} record(s) from {}", set.len(), path.display());
    Ok(set)
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    std::fs::write(path, contents)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(threshold) = args.threshold {
        config = config.with_threshold(threshold)?;
    }

    let import_format = resolve_format(&args.import, args.format, "--format")?;
    let existing_format = args
        .existing_format
        .or_else(|| InputFormat::from_path(&args.existing))
        .unwrap_or(import_format);

    let imports = read_records(&args.import, import_format)?;
    let existing = read_records(&args.existing, existing_format)?;

    let reconciler = Reconciler::new(&config)?;
    let outcome = reconciler.reconcile(&imports.records, &existing.records);

    let report_path = args.output_report.unwrap_or_else(|| {
        args.import
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_REPORT_NAME)
    });
    write_output(&report_path, &render_report(&outcome))?;
    eprintln!("wrote report {}", report_path.display());

    if outcome.has_duplicates() {
        let filtered_path = args
            .output_filtered
            .unwrap_or_else(|| default_filtered_path(&args.import, import_format));
        let today = chrono::Local::now().date_naive();
        let filtered = render_filtered(&imports, &outcome, today)?;
        write_output(&filtered_path, &filtered)?;
        let stats = FilterStats::from_outcome(&outcome);
        eprintln!(
            "wrote filtered import {} ({} of {} kept, {} removed)",
            filtered_path.display(),
            stats.filtered_count,
            stats.original_count,
            stats.removed,
        );
    } else {
        eprintln!("no duplicates found - original file can be imported as-is");
    }

    if args.json {
        let json_str = serde_json::to_string_pretty(&outcome)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &outcome.summary;
    eprintln!(
        "{} import(s) vs {} existing: {} exact matches, {} potential duplicates, {} unique",
        s.total_import_products,
        s.total_existing_products,
        s.exact_matches_count,
        s.potential_duplicates_count,
        s.unique_imports_count,
    );

    if args.fail_on_duplicates && outcome.has_duplicates() {
        return Err(CliError::new(EXIT_DUPLICATES_FOUND, "duplicates found"));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "valid: threshold {}, {} prefix(es), {} suffix(es), {} model pattern(s)",
        config.threshold,
        config.normalize.prefixes.len(),
        config.normalize.suffixes.len(),
        config.model.patterns.len(),
    );
    Ok(())
}

pub fn cmd_config(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_beats_extension() {
        let f = resolve_format(Path::new("data.json"), Some(InputFormat::Csv), "--format").unwrap();
        assert_eq!(f, InputFormat::Csv);
    }

    #[test]
    fn unknown_extension_is_usage_error() {
        let err = resolve_format(Path::new("data.txt"), None, "--format").unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
        assert!(err.hint.unwrap().contains("--format json"));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/shelfcheck.toml"))).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_IO);
    }
}
