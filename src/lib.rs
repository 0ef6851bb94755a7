//! Reaction-rule probability tables for fragment-based molecular graph generation
//!
//! Raw statistics come from a persisted table store or from a scan over a
//! SMILES dataset. The model builder rescales the ring-closing distribution so
//! double-bond closures carry a fixed aggregate probability and freezes the
//! result into an immutable bundle for the generator.

#![forbid(unsafe_code)]

/// Command-line, configuration, logging and error handling
pub mod io;
/// Summation, distribution checks and size statistics
pub mod math;
/// Rules, renormalization, bundles and rule sampling
pub mod model;
/// Statistics sources backed by table stores or molecule datasets
pub mod source;

pub use io::configuration::ModelConfig;
pub use io::error::{Result, StatsError};
pub use model::{ProbabilityModelBuilder, RawStatistics, Rule, StatisticsBundle, rescale};
pub use source::StatsSource;
