use num_traits::Float;

/// Compensated (Neumaier) summation over a sequence of probabilities
pub fn total<F, I>(values: I) -> F
where
    F: Float,
    I: IntoIterator<Item = F>,
{
    let mut sum = F::zero();
    let mut compensation = F::zero();

    for value in values {
        let t = sum + value;
        if sum.abs() >= value.abs() {
            compensation = compensation + ((sum - t) + value);
        } else {
            compensation = compensation + ((value - t) + sum);
        }
        sum = t;
    }

    sum + compensation
}

/// Check whether `a` and `b` differ by at most `tolerance`
pub fn approx_eq<F: Float>(a: F, b: F, tolerance: F) -> bool {
    (a - b).abs() <= tolerance
}

/// Describe why `values` is not a probability distribution, if it isn't
///
/// A distribution has only finite non-negative entries and sums to 1 within
/// `tolerance`. An empty slice sums to 0 and is rejected.
pub fn distribution_defect<F: Float + std::fmt::Display>(
    values: &[F],
    tolerance: F,
) -> Option<String> {
    if let Some((index, value)) = values
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < F::zero())
    {
        return Some(format!("entry {index} is {value}"));
    }

    let sum = total(values.iter().copied());
    if approx_eq(sum, F::one(), tolerance) {
        None
    } else {
        Some(format!("sums to {sum} over {} entries", values.len()))
    }
}

/// Convert occurrence counts into frequency shares summing to 1
///
/// Returns all zeros when every count is zero.
pub fn frequency_shares(counts: &[usize]) -> Vec<f64> {
    let total_count: usize = counts.iter().sum();
    if total_count == 0 {
        return vec![0.0; counts.len()];
    }

    let denominator = total_count as f64;
    counts
        .iter()
        .map(|&count| count as f64 / denominator)
        .collect()
}
