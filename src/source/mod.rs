//! Statistics sources: persisted table stores and dataset-derived calculators

use crate::io::error::Result;
use crate::model::bundle::RawStatistics;

/// Rule-frequency estimation from a molecule dataset
pub mod calculator;
/// Dataset-backed statistics source
pub mod dataset;
/// Minimal SMILES reader producing heavy-atom graphs
pub mod smiles;
/// Key-addressed table stores and the store-backed source
pub mod store;

pub use calculator::SmilesStatsCalculator;
pub use dataset::{DatasetStatsSource, StatsCalculator};
pub use store::{DirectoryStore, MemoryStore, StoreStatsSource, TableStore};

/// Anything that can produce the raw, unscaled statistics
///
/// Callers depend only on this trait; whether numbers come from a persisted
/// store or a dataset scan is the implementor's business.
pub trait StatsSource {
    /// Produce the raw statistics
    ///
    /// # Errors
    ///
    /// Store-backed sources return `MissingStatistics` or `CorruptStatistics`;
    /// dataset-backed sources return `StatisticsDerivation`
    fn load(&self) -> Result<RawStatistics>;

    /// Short human-readable description used in logs
    fn describe(&self) -> String;
}
