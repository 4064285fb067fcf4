//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Description                                        |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (unspecified)                        |
//! | 2    | CLI usage error (bad args, unknown input format)   |
//! | 3    | IO error (cannot read input, cannot write output)  |
//! | 4    | Input file is not valid JSON/CSV                   |
//! | 5    | Invalid config (TOML, threshold, model patterns)   |
//! | 6    | Duplicates found (only with `--fail-on-duplicates`)|
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use shelfcheck_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, input format cannot be determined.
pub const EXIT_USAGE: u8 = 2;

/// Cannot read an input file or write an output file.
pub const EXIT_IO: u8 = 3;

/// Import or existing-products file is not parseable in its format.
pub const EXIT_DATA_FORMAT: u8 = 4;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 5;

/// Duplicates were found and `--fail-on-duplicates` was given.
pub const EXIT_DUPLICATES_FOUND: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_)
        | ReconError::ConfigValidation(_)
        | ReconError::InvalidPattern { .. } => EXIT_INVALID_CONFIG,
        ReconError::DataFormat { .. } => EXIT_DATA_FORMAT,
        ReconError::Io(_) => EXIT_IO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_IO,
            EXIT_DATA_FORMAT,
            EXIT_INVALID_CONFIG,
            EXIT_DUPLICATES_FOUND,
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn engine_errors_map() {
        assert_eq!(
            recon_exit_code(&ReconError::ConfigValidation("x".into())),
            EXIT_INVALID_CONFIG
        );
        assert_eq!(
            recon_exit_code(&ReconError::DataFormat { format: "JSON".into(), message: "x".into() }),
            EXIT_DATA_FORMAT
        );
        assert_eq!(recon_exit_code(&ReconError::Io("x".into())), EXIT_IO);
    }
}
