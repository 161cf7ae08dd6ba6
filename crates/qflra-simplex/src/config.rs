//! Solver configuration and the option-error taxonomy.

use thiserror::Error;

const OPTION_ERROR_PREFIX: &str = "error in option parsing: ";

/// Failure modes of the string-keyed option setter.
///
/// These are the only recoverable errors in the crate; every other
/// outcome is either a SAT/UNSAT verdict or a fatal precondition
/// violation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    /// A known option received a value it cannot parse.
    #[error("{OPTION_ERROR_PREFIX}malformed value `{value}` for option `{key}`")]
    Malformed {
        /// The option key.
        key: String,
        /// The rejected value.
        value: String,
    },
    /// The option key itself is unrecognized.
    #[error("{OPTION_ERROR_PREFIX}unrecognized option `{key}`")]
    Unknown {
        /// The unrecognized key.
        key: String,
    },
}

/// Tunables of the simplex engine.
#[derive(Debug, Clone)]
pub struct SimplexConfig {
    /// Scan the queued violations for a cheap conflict before starting to
    /// pivot.
    pub early_conflict_selection: bool,
    /// Re-verify the tableau-consistency invariant inside every update
    /// and main-loop iteration. Very expensive; aborts on violation.
    pub paranoid_checks: bool,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        SimplexConfig {
            early_conflict_selection: true,
            paranoid_checks: false,
        }
    }
}

impl SimplexConfig {
    /// Set an option from its string key and value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), OptionError> {
        match key {
            "early-conflict-selection" => {
                self.early_conflict_selection = parse_bool(key, value)?;
            }
            "paranoid-checks" => {
                self.paranoid_checks = parse_bool(key, value)?;
            }
            _ => {
                return Err(OptionError::Unknown {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, OptionError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(OptionError::Malformed {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
