//! Reaction rules and their bond-order classification

use crate::io::configuration::DOUBLE_BOND_SYMBOL;
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque transformation pattern, a reaction SMARTS string
///
/// The model only classifies rules and pairs them with probabilities by
/// index; it never interprets the pattern beyond that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rule(String);

impl Rule {
    /// Wrap a pattern string
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into())
    }

    /// The encoded pattern
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the pattern denotes a double bond
    pub fn denotes_double_bond(&self) -> bool {
        self.0.contains(DOUBLE_BOND_SYMBOL)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Rule {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Rule {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for Rule {
    fn from(pattern: String) -> Self {
        Self(pattern)
    }
}

/// Mark each rule the classifier accepts
///
/// Bit `i` is set when `classify(&rules[i])` holds.
pub fn classify_rules<C>(rules: &[Rule], classify: C) -> BitVec
where
    C: Fn(&Rule) -> bool,
{
    rules.iter().map(classify).collect()
}
