//! Builds the final statistics bundle from a statistics source

use crate::io::configuration::ModelConfig;
use crate::io::error::{Result, invariant_violation};
use crate::math::probability::total;
use crate::model::bundle::{RawStatistics, StatisticsBundle};
use crate::model::rescale::rescale;
use crate::source::StatsSource;

/// Turns raw statistics into a rescaled, validated [`StatisticsBundle`]
#[derive(Debug, Clone, Default)]
pub struct ProbabilityModelBuilder {
    config: ModelConfig,
}

impl ProbabilityModelBuilder {
    /// Create a builder for the given configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration fails validation
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration this builder applies
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Load statistics from `source` and build a bundle
    ///
    /// # Errors
    ///
    /// Propagates source failures and any error from [`Self::assemble`]
    pub fn build<S>(&self, source: &S) -> Result<StatisticsBundle>
    where
        S: StatsSource + ?Sized,
    {
        let raw = source.load()?;
        tracing::info!(
            source = %source.describe(),
            ring_closing_rules = raw.ring_closing_rules.len(),
            general_rules = raw.general_rules.len(),
            "Loaded raw statistics"
        );
        self.assemble(raw)
    }

    /// Rescale the ring-closing distribution and freeze the result
    ///
    /// # Errors
    ///
    /// - `InvariantViolation` if the raw statistics are not valid distributions,
    ///   or if the ring-closing sum is off by less than the tolerance but
    ///   rescaling would stretch that error past it
    /// - `DegenerateDistribution` if the target cannot be reached
    pub fn assemble(&self, raw: RawStatistics) -> Result<StatisticsBundle> {
        raw.validate(self.config.tolerance)?;
        self.check_rescaled_deviation(&raw)?;

        let ring_closing_probabilities = rescale(
            &raw.ring_closing_rules,
            &raw.ring_closing_probabilities,
            self.config.target_double_bond_probability,
        )?;

        let bundle = StatisticsBundle::assemble(
            RawStatistics {
                ring_closing_probabilities,
                ..raw
            },
            self.config.tolerance,
        )?;

        tracing::info!(
            target = self.config.target_double_bond_probability,
            double_bond_mass = bundle.double_bond_mass(),
            "Built statistics bundle"
        );

        Ok(bundle)
    }

    /// Reject ring-closing tables whose sum error rescaling would push past
    /// the tolerance
    ///
    /// The complement is multiplied by `(1 - target) / (1 - double_mass)`, so
    /// any deviation of the raw sum from 1 grows by that factor.
    fn check_rescaled_deviation(&self, raw: &RawStatistics) -> Result<()> {
        let probabilities = &raw.ring_closing_probabilities;
        let double_mass = total(
            raw.ring_closing_rules
                .iter()
                .zip(probabilities)
                .filter_map(|(rule, &p)| rule.denotes_double_bond().then_some(p)),
        );
        let complement = 1.0 - double_mass;
        // Empty complements are reported by rescale as degenerate
        if complement <= 0.0 {
            return Ok(());
        }

        let factor = ((1.0 - self.config.target_double_bond_probability) / complement).max(1.0);
        let deviation = (total(probabilities.iter().copied()) - 1.0).abs();
        if deviation * factor > self.config.tolerance {
            return Err(invariant_violation(
                "ring-closing probabilities sum to 1 closely enough to survive rescaling",
                &format!(
                    "sum deviates by {deviation:e}, rescaling by {factor} gives {:e} against tolerance {:e}",
                    deviation * factor,
                    self.config.tolerance
                ),
            ));
        }

        Ok(())
    }
}
