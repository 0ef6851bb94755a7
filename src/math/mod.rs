//! Numeric utilities shared by the model and the dataset calculator

/// Summation and distribution checks over probability vectors
pub mod probability;
/// Molecule size statistics
pub mod statistics;
