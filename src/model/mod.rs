//! Probability model construction: rules, renormalization and bundle assembly

/// Bundle assembly from source statistics
pub mod builder;
/// Raw and validated statistics containers
pub mod bundle;
/// Ring-closing renormalization
pub mod rescale;
/// Reaction rules and classification
pub mod rule;
/// Weighted rule sampling
pub mod sampling;

pub use builder::ProbabilityModelBuilder;
pub use bundle::{RawStatistics, StatisticsBundle};
pub use rescale::{rescale, rescale_with};
pub use rule::Rule;
pub use sampling::RuleSampler;
