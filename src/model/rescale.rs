//! Targeted renormalization of the ring-closing distribution
//!
//! Ring-closing rules split into those that introduce a double bond and the
//! rest. Rescaling pins the double-bond subset to a configured aggregate
//! probability and stretches the complement to cover what remains, keeping
//! the ratios inside each subset intact.

use crate::io::error::{Result, StatsError, invalid_parameter, invariant_violation};
use crate::math::probability::total;
use crate::model::rule::{Rule, classify_rules};

/// Rescale `probs` so double-bond rules carry `target` in aggregate
///
/// # Errors
///
/// - `InvalidParameter` when `target` is outside `[0, 1]`
/// - `InvariantViolation` when lengths differ or an entry is negative or non-finite
/// - `DegenerateDistribution` when a subset with no mass is asked to carry some
pub fn rescale(rules: &[Rule], probs: &[f64], target: f64) -> Result<Vec<f64>> {
    rescale_with(rules, probs, target, Rule::denotes_double_bond)
}

/// Rescale `probs` using an explicit double-bond classifier
///
/// # Errors
///
/// Same conditions as [`rescale`]
pub fn rescale_with<C>(rules: &[Rule], probs: &[f64], target: f64, classify: C) -> Result<Vec<f64>>
where
    C: Fn(&Rule) -> bool,
{
    if !(0.0..=1.0).contains(&target) {
        return Err(invalid_parameter(
            "target_double_bond_probability",
            &target,
            &"must lie in [0, 1]",
        ));
    }

    if rules.len() != probs.len() {
        return Err(invariant_violation(
            "rules and probabilities have equal length",
            &format!("{} rules, {} probabilities", rules.len(), probs.len()),
        ));
    }

    if let Some((index, p)) = probs
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p < 0.0)
    {
        return Err(invariant_violation(
            "probabilities are finite and non-negative",
            &format!("probability {index} is {p}"),
        ));
    }

    let double_bond = classify_rules(rules, classify);

    let double_mass = total(
        probs
            .iter()
            .zip(double_bond.iter().by_vals())
            .filter_map(|(&p, is_double)| is_double.then_some(p)),
    );
    let single_mass = total(
        probs
            .iter()
            .zip(double_bond.iter().by_vals())
            .filter_map(|(&p, is_double)| (!is_double).then_some(p)),
    );

    // The complement is normalized against 1 - double_mass, not single_mass.
    // The two agree only when probs sums to exactly 1.
    let scale_double = subset_scale("double-bond", target, double_mass, double_mass)?;
    let scale_single = subset_scale("single-bond", 1.0 - target, single_mass, 1.0 - double_mass)?;

    tracing::debug!(
        rules = rules.len(),
        double_mass,
        single_mass,
        scale_double,
        scale_single,
        "Rescaling ring-closing distribution"
    );

    Ok(probs
        .iter()
        .zip(double_bond.iter().by_vals())
        .map(|(&p, is_double)| {
            if is_double {
                p * scale_double
            } else {
                p * scale_single
            }
        })
        .collect())
}

/// Scale factor taking a subset from its current mass to `share`
///
/// `mass` is what the subset's members actually hold and decides degeneracy;
/// `denominator` is what the share is divided by.
fn subset_scale(subset: &'static str, share: f64, mass: f64, denominator: f64) -> Result<f64> {
    if mass > 0.0 && denominator > 0.0 {
        return Ok(share / denominator);
    }

    // An empty subset asked to stay empty keeps its zero entries
    if share <= 0.0 {
        return Ok(0.0);
    }

    Err(StatsError::DegenerateDistribution {
        subset,
        mass,
        target: share,
    })
}

