//! Weighted rule draws over a bundle's probability tables

use crate::io::error::{Result, invariant_violation};
use crate::model::bundle::StatisticsBundle;
use crate::model::rule::Rule;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

/// Draws rules with probability proportional to their table entry
pub struct RuleSampler<'a> {
    rules: &'a [Rule],
    index: WeightedIndex<f64>,
}

impl<'a> RuleSampler<'a> {
    /// Sampler over an arbitrary rule table
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if lengths differ or the table has no
    /// positive mass
    pub fn from_table(rules: &'a [Rule], probabilities: &[f64]) -> Result<Self> {
        if rules.len() != probabilities.len() {
            return Err(invariant_violation(
                "rules and probabilities have equal length",
                &format!(
                    "{} rules, {} probabilities",
                    rules.len(),
                    probabilities.len()
                ),
            ));
        }

        let index = WeightedIndex::new(probabilities).map_err(|e| {
            invariant_violation("sampling table has positive finite weights", &e)
        })?;

        Ok(Self { rules, index })
    }

    /// Sampler over the general fragment-joining rules
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::from_table`]
    pub fn general(bundle: &'a StatisticsBundle) -> Result<Self> {
        Self::from_table(bundle.general_rules(), bundle.general_probabilities())
    }

    /// Sampler over the rescaled ring-closing rules
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::from_table`]
    pub fn ring_closing(bundle: &'a StatisticsBundle) -> Result<Self> {
        Self::from_table(
            bundle.ring_closing_rules(),
            bundle.ring_closing_probabilities(),
        )
    }

    /// Draw the index of a rule
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.index.sample(rng)
    }

    /// Draw a rule
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'a Rule> {
        self.rules.get(self.sample_index(rng))
    }
}
