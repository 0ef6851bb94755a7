//! Raw statistics from a source and the validated bundle handed to the generator

use crate::io::error::{Result, StatsError, invariant_violation};
use crate::math::probability::{distribution_defect, total};
use crate::math::statistics::SizeStatistics;
use crate::model::rule::Rule;
use serde::{Deserialize, Serialize};

/// Unscaled statistics as produced by a [`StatsSource`](crate::source::StatsSource)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStatistics {
    /// Mean molecule size
    pub average_size: f64,
    /// Standard deviation of molecule size
    pub size_std_dev: f64,
    /// Rules that create a new ring bond
    pub ring_forming_rules: Vec<Rule>,
    /// Rules that close an opened ring, paired with `ring_closing_probabilities`
    pub ring_closing_rules: Vec<Rule>,
    /// Probability of each ring-closing rule
    pub ring_closing_probabilities: Vec<f64>,
    /// Pairwise fragment-joining rules, paired with `general_probabilities`
    pub general_rules: Vec<Rule>,
    /// Probability of each general rule
    pub general_probabilities: Vec<f64>,
}

impl RawStatistics {
    /// Size parameters as a pair
    pub const fn size_statistics(&self) -> SizeStatistics {
        SizeStatistics {
            average: self.average_size,
            std_dev: self.size_std_dev,
        }
    }

    /// Check lengths, distributions and size parameters
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` describing the first broken invariant
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        if !self.size_statistics().is_well_formed() {
            return Err(invariant_violation(
                "size statistics are finite with non-negative deviation",
                &format!(
                    "average {}, std dev {}",
                    self.average_size, self.size_std_dev
                ),
            ));
        }

        if let Some(defect) = table_defect(
            &self.ring_closing_rules,
            &self.ring_closing_probabilities,
            tolerance,
        ) {
            return Err(invariant_violation(
                "ring-closing probabilities form a distribution over ring-closing rules",
                &defect,
            ));
        }

        if let Some(defect) = table_defect(
            &self.general_rules,
            &self.general_probabilities,
            tolerance,
        ) {
            return Err(invariant_violation(
                "general probabilities form a distribution over general rules",
                &defect,
            ));
        }

        Ok(())
    }
}

/// Describe why a rule table is not a distribution over its rules, if it isn't
pub fn table_defect(rules: &[Rule], probabilities: &[f64], tolerance: f64) -> Option<String> {
    if rules.len() != probabilities.len() {
        return Some(format!(
            "{} rules but {} probabilities",
            rules.len(),
            probabilities.len()
        ));
    }

    distribution_defect(probabilities, tolerance)
}

/// Immutable statistics consumed by the molecule generator
///
/// Only obtainable through [`StatisticsBundle::assemble`], so every instance
/// satisfies the table invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsBundle {
    average_size: f64,
    size_std_dev: f64,
    ring_forming_rules: Vec<Rule>,
    ring_closing_rules: Vec<Rule>,
    ring_closing_probabilities: Vec<f64>,
    general_rules: Vec<Rule>,
    general_probabilities: Vec<f64>,
}

impl StatisticsBundle {
    /// Freeze already-rescaled statistics into a bundle
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if lengths differ, a probability vector
    /// does not sum to 1 within `tolerance`, or size statistics are unusable
    pub fn assemble(statistics: RawStatistics, tolerance: f64) -> Result<Self> {
        statistics.validate(tolerance)?;

        let RawStatistics {
            average_size,
            size_std_dev,
            ring_forming_rules,
            ring_closing_rules,
            ring_closing_probabilities,
            general_rules,
            general_probabilities,
        } = statistics;

        Ok(Self {
            average_size,
            size_std_dev,
            ring_forming_rules,
            ring_closing_rules,
            ring_closing_probabilities,
            general_rules,
            general_probabilities,
        })
    }

    /// Mean molecule size
    pub const fn average_size(&self) -> f64 {
        self.average_size
    }

    /// Standard deviation of molecule size
    pub const fn size_std_dev(&self) -> f64 {
        self.size_std_dev
    }

    /// Rules that create a new ring bond
    pub fn ring_forming_rules(&self) -> &[Rule] {
        &self.ring_forming_rules
    }

    /// Ring-closing rules, index-paired with [`Self::ring_closing_probabilities`]
    pub fn ring_closing_rules(&self) -> &[Rule] {
        &self.ring_closing_rules
    }

    /// Rescaled ring-closing probabilities
    pub fn ring_closing_probabilities(&self) -> &[f64] {
        &self.ring_closing_probabilities
    }

    /// General rules, index-paired with [`Self::general_probabilities`]
    pub fn general_rules(&self) -> &[Rule] {
        &self.general_rules
    }

    /// General rule probabilities
    pub fn general_probabilities(&self) -> &[f64] {
        &self.general_probabilities
    }

    /// Aggregate probability of ring-closing rules that introduce a double bond
    pub fn double_bond_mass(&self) -> f64 {
        total(
            self.ring_closing_rules
                .iter()
                .zip(&self.ring_closing_probabilities)
                .filter_map(|(rule, &p)| rule.denotes_double_bond().then_some(p)),
        )
    }

    /// Serialize the bundle as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| StatsError::Serialization {
            operation: "bundle export",
            source,
        })
    }
}
