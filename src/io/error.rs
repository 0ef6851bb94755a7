//! Error types for statistics loading, derivation and model construction

use std::fmt;
use std::path::PathBuf;

/// Main error type for all statistics operations
#[derive(Debug)]
pub enum StatsError {
    /// A required table is absent from the statistics store
    MissingStatistics {
        /// Store key of the absent table
        key: &'static str,
    },

    /// A stored table failed to decode or violates its shape invariants
    CorruptStatistics {
        /// Store key of the offending table
        key: &'static str,
        /// Description of what's wrong with the table
        reason: String,
    },

    /// Statistics could not be derived from a molecule dataset
    ///
    /// Occurs when the dataset is:
    /// - Empty or blank
    /// - Entirely unparsable
    /// - Lacking the bonds needed to populate a rule table
    StatisticsDerivation {
        /// Description of the derivation failure
        reason: String,
    },

    /// Renormalization target is unreachable because a subset has no mass
    DegenerateDistribution {
        /// Name of the rule subset being rescaled
        subset: &'static str,
        /// Current probability mass of the subset
        mass: f64,
        /// Requested probability mass of the subset
        target: f64,
    },

    /// Final bundle check failed
    InvariantViolation {
        /// Name of the violated invariant
        invariant: &'static str,
        /// Observed values that break it
        observed: String,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to encode statistics for export
    Serialization {
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying JSON error
        source: serde_json::Error,
    },
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStatistics { key } => {
                write!(f, "Missing statistics table '{key}'")
            }
            Self::CorruptStatistics { key, reason } => {
                write!(f, "Corrupt statistics table '{key}': {reason}")
            }
            Self::StatisticsDerivation { reason } => {
                write!(f, "Failed to derive statistics from dataset: {reason}")
            }
            Self::DegenerateDistribution {
                subset,
                mass,
                target,
            } => {
                write!(
                    f,
                    "Cannot rescale {subset} rules to probability {target}: subset mass is {mass}"
                )
            }
            Self::InvariantViolation {
                invariant,
                observed,
            } => {
                write!(f, "Invariant violated ({invariant}): {observed}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { operation, source } => {
                write!(f, "Serialization error during {operation}: {source}")
            }
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for statistics results
pub type Result<T> = std::result::Result<T, StatsError>;

impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> StatsError {
    StatsError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create an invariant violation error
pub fn invariant_violation(invariant: &'static str, observed: &impl ToString) -> StatsError {
    StatsError::InvariantViolation {
        invariant,
        observed: observed.to_string(),
    }
}

/// Create a corrupt table error
pub fn corrupt_statistics(key: &'static str, reason: &impl ToString) -> StatsError {
    StatsError::CorruptStatistics {
        key,
        reason: reason.to_string(),
    }
}

/// Create a dataset derivation error
pub fn derivation_error(reason: &impl ToString) -> StatsError {
    StatsError::StatisticsDerivation {
        reason: reason.to_string(),
    }
}
