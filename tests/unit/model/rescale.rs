//! Tests for ring-closing renormalization
//!
//! Property checks draw random distributions from seeded generators so any
//! failure reproduces.

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rxnstats::StatsError;
    use rxnstats::math::probability::total;
    use rxnstats::model::rescale::{rescale, rescale_with};
    use rxnstats::model::rule::Rule;

    const SINGLE: &str = "[#6;!R;!H0:1].[#6;!R;!H0:2]>>[#6:1]-[#6:2]";
    const DOUBLE: &str = "[#6;!R;!H0;!H1:1].[#6;!R;!H0;!H1:2]>>[#6:1]=[#6:2]";

    /// Random table with at least one rule of each kind, normalized to 1
    fn random_table(rng: &mut StdRng) -> (Vec<Rule>, Vec<f64>) {
        let len = rng.random_range(2..40);
        let mut rules: Vec<Rule> = (0..len)
            .map(|_| Rule::from(if rng.random_bool(0.3) { DOUBLE } else { SINGLE }))
            .collect();
        if let Some(first) = rules.first_mut() {
            *first = Rule::from(DOUBLE);
        }
        if let Some(last) = rules.last_mut() {
            *last = Rule::from(SINGLE);
        }

        let weights: Vec<f64> = (0..len).map(|_| rng.random_range(0.01..1.0)).collect();
        let sum = total(weights.iter().copied());
        (rules, weights.iter().map(|w| w / sum).collect())
    }

    fn subset_mass(rules: &[Rule], probs: &[f64], double: bool) -> f64 {
        total(
            rules
                .iter()
                .zip(probs)
                .filter(|(rule, _)| rule.denotes_double_bond() == double)
                .map(|(_, &p)| p),
        )
    }

    // Tests three-rule example from the model description
    // Verified by normalizing the complement by single-bond mass
    #[test]
    fn test_worked_example() {
        let rules = vec![Rule::from(SINGLE), Rule::from(DOUBLE), Rule::from(SINGLE)];
        let out = rescale(&rules, &[0.5, 0.3, 0.2], 0.8).unwrap();

        let expected = [0.142_857_142_857, 0.8, 0.057_142_857_143];
        for (value, want) in out.iter().zip(expected) {
            assert!((value - want).abs() < 1e-9, "got {out:?}");
        }
    }

    // Tests normalization and target are preserved over random tables
    // Verified by skipping the single-bond scale
    #[test]
    fn test_normalization_and_target() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let (rules, probs) = random_table(&mut rng);
            let target = rng.random_range(0.0..=1.0);
            let out = rescale(&rules, &probs, target).unwrap();

            assert!((total(out.iter().copied()) - 1.0).abs() < 1e-9);
            assert!((subset_mass(&rules, &out, true) - target).abs() < 1e-9);
            assert!((subset_mass(&rules, &out, false) - (1.0 - target)).abs() < 1e-9);
            assert!(out.iter().all(|p| p.is_finite() && *p >= 0.0));
        }
    }

    // Tests ratios inside each subset are unchanged
    // Verified by adding a constant instead of scaling
    #[test]
    fn test_proportionality() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let (rules, probs) = random_table(&mut rng);
            let out = rescale(&rules, &probs, 0.8).unwrap();

            for double in [true, false] {
                let members: Vec<(f64, f64)> = rules
                    .iter()
                    .zip(probs.iter().zip(&out))
                    .filter(|(rule, _)| rule.denotes_double_bond() == double)
                    .map(|(_, (&before, &after))| (before, after))
                    .collect();

                if let Some(&(first_before, first_after)) = members.first() {
                    let ratio = first_after / first_before;
                    for (before, after) in &members {
                        assert!((after / before - ratio).abs() < 1e-9);
                    }
                }
            }
        }
    }

    // Tests rescaling to the current mass is the identity
    // Verified by using the single-bond mass as complement denominator
    #[test]
    fn test_idempotent_at_current_mass() {
        let mut rng = StdRng::seed_from_u64(13);

        for _ in 0..100 {
            let (rules, probs) = random_table(&mut rng);
            let current = subset_mass(&rules, &probs, true);
            let out = rescale(&rules, &probs, current).unwrap();

            for (before, after) in probs.iter().zip(&out) {
                assert!((before - after).abs() < 1e-12);
            }
        }
    }

    // Tests zero double-bond mass cannot reach a positive target
    // Verified by returning NaN-scaled probabilities
    #[test]
    fn test_degenerate_double_bond_subset() {
        let rules = vec![Rule::from(SINGLE), Rule::from(SINGLE)];
        let result = rescale(&rules, &[0.4, 0.6], 0.8);

        assert!(matches!(
            result,
            Err(StatsError::DegenerateDistribution {
                subset: "double-bond",
                ..
            })
        ));
    }

    // Tests all mass on double bonds cannot leave room for single bonds
    // Verified by removing the single-bond degeneracy check
    #[test]
    fn test_degenerate_single_bond_subset() {
        let rules = vec![Rule::from(DOUBLE), Rule::from(SINGLE)];
        let result = rescale(&rules, &[1.0, 0.0], 0.8);

        assert!(matches!(
            result,
            Err(StatsError::DegenerateDistribution {
                subset: "single-bond",
                ..
            })
        ));
    }

    // Tests a target of 1 empties an existing single-bond subset
    // Verified by rejecting targets at the bound
    #[test]
    fn test_target_one_zeroes_single_bonds() {
        let rules = vec![Rule::from(SINGLE), Rule::from(DOUBLE)];
        let out = rescale(&rules, &[0.5, 0.5], 1.0).unwrap();

        assert!(out.first().unwrap().abs() < 1e-12);
        assert!((out.get(1).unwrap() - 1.0).abs() < 1e-12);
    }

    // Tests mismatched lengths are rejected
    // Verified by zipping without a length check
    #[test]
    fn test_length_mismatch() {
        let rules = vec![Rule::from(SINGLE), Rule::from(DOUBLE)];
        let result = rescale(&rules, &[1.0], 0.8);

        assert!(matches!(
            result,
            Err(StatsError::InvariantViolation { .. })
        ));
    }

    // Tests out-of-range targets and negative entries are rejected
    // Verified by clamping the target
    #[test]
    fn test_invalid_inputs() {
        let rules = vec![Rule::from(SINGLE), Rule::from(DOUBLE)];

        assert!(matches!(
            rescale(&rules, &[0.5, 0.5], 1.2),
            Err(StatsError::InvalidParameter { .. })
        ));
        assert!(matches!(
            rescale(&rules, &[1.5, -0.5], 0.8),
            Err(StatsError::InvariantViolation { .. })
        ));
        assert!(matches!(
            rescale(&rules, &[f64::NAN, 0.5], 0.8),
            Err(StatsError::InvariantViolation { .. })
        ));
    }

    // Tests classifier injection independent of rule text
    // Verified by ignoring the classifier
    #[test]
    fn test_rescale_with_custom_classifier() {
        let rules: Vec<Rule> = ["a", "b", "c", "d"].into_iter().map(Rule::from).collect();
        let out = rescale_with(&rules, &[0.1, 0.2, 0.3, 0.4], 0.5, |rule| {
            matches!(rule.as_str(), "a" | "b")
        })
        .unwrap();

        let expected = [0.5 / 3.0, 1.0 / 3.0, 0.5 * 0.3 / 0.7, 0.5 * 0.4 / 0.7];
        for (value, want) in out.iter().zip(expected) {
            assert!((value - want).abs() < 1e-12);
        }
    }
}
