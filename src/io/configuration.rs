//! Model constants and runtime configuration defaults

use crate::io::error::{Result, invalid_parameter};

// Observed usage fixes the double-bond share of ring closures at 0.8
/// Default aggregate probability for double-bond ring-closing rules
pub const DEFAULT_TARGET_DOUBLE_BOND_PROBABILITY: f64 = 0.8;

/// Allowed deviation from 1 when checking that a probability vector sums to 1
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// Character whose presence in a rule pattern marks a double bond
pub const DOUBLE_BOND_SYMBOL: char = '=';

// Store keys, one table per quantity
/// Key of the `[average, std_dev]` molecule size table
pub const SIZE_STATS_KEY: &str = "size_stats";
/// Key of the ring-forming rule table
pub const RING_FORMING_RULES_KEY: &str = "ring_forming_rules";
/// Key of the ring-closing rule table
pub const RING_CLOSING_RULES_KEY: &str = "ring_closing_rules";
/// Key of the ring-closing probability table
pub const RING_CLOSING_PROBABILITIES_KEY: &str = "ring_closing_probabilities";
/// Key of the general rule table
pub const GENERAL_RULES_KEY: &str = "general_rules";
/// Key of the general probability table
pub const GENERAL_PROBABILITIES_KEY: &str = "general_probabilities";

/// Every key a complete statistics store holds
pub const STORE_KEYS: [&str; 6] = [
    SIZE_STATS_KEY,
    RING_FORMING_RULES_KEY,
    RING_CLOSING_RULES_KEY,
    RING_CLOSING_PROBABILITIES_KEY,
    GENERAL_RULES_KEY,
    GENERAL_PROBABILITIES_KEY,
];

/// Extension of table files in a directory store
pub const STORE_FILE_EXTENSION: &str = "json";

// Progress bar display settings
/// Records scanned between progress bar refreshes
pub const PROGRESS_REFRESH_RECORDS: usize = 512;
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Fixed seed for reproducible rule sampling
pub const DEFAULT_SEED: u64 = 42;

/// Parameters supplied by the caller constructing a probability model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    /// Aggregate probability the double-bond ring-closing rules are rescaled to
    pub target_double_bond_probability: f64,
    /// Allowed deviation from 1 for probability sums
    pub tolerance: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            target_double_bond_probability: DEFAULT_TARGET_DOUBLE_BOND_PROBABILITY,
            tolerance: DISTRIBUTION_TOLERANCE,
        }
    }
}

impl ModelConfig {
    /// Configuration with the given target and the default tolerance
    pub fn with_target(target_double_bond_probability: f64) -> Self {
        Self {
            target_double_bond_probability,
            ..Self::default()
        }
    }

    /// Check that the target is a probability and the tolerance is usable
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` naming the first field out of range
    pub fn validate(&self) -> Result<()> {
        let target = self.target_double_bond_probability;
        if !(0.0..=1.0).contains(&target) {
            return Err(invalid_parameter(
                "target_double_bond_probability",
                &target,
                &"must lie in [0, 1]",
            ));
        }

        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance >= 1.0 {
            return Err(invalid_parameter(
                "tolerance",
                &self.tolerance,
                &"must be a positive number below 1",
            ));
        }

        Ok(())
    }
}
