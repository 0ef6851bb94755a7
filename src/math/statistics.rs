//! Summary statistics over molecule sizes

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Mean and spread of heavy-atom counts across a dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeStatistics {
    /// Mean heavy-atom count
    pub average: f64,
    /// Population standard deviation of the heavy-atom count
    pub std_dev: f64,
}

impl SizeStatistics {
    /// Compute size statistics, `None` for an empty sample
    pub fn from_sizes(sizes: &[usize]) -> Option<Self> {
        let values: Array1<f64> = sizes.iter().map(|&size| size as f64).collect();
        let average = values.mean()?;
        // Population deviation (ddof = 0)
        let std_dev = values.std(0.0);

        Some(Self { average, std_dev })
    }

    /// Whether both parameters are usable by a size sampler
    pub fn is_well_formed(&self) -> bool {
        self.average.is_finite() && self.std_dev.is_finite() && self.std_dev >= 0.0
    }
}
