//! Rule-frequency estimation over SMILES datasets
//!
//! Every bond between two heavy atoms is tallied under a [`BondKey`]. The
//! tallies over all bonds become the general rule table, the tallies over ring
//! bonds become the ring-closing table, and each observed ring bond kind also
//! yields a ring-forming rule.

use crate::io::error::{Result, derivation_error};
use crate::io::progress::ScanProgress;
use crate::math::probability::frequency_shares;
use crate::math::statistics::SizeStatistics;
use crate::model::bundle::RawStatistics;
use crate::model::rule::Rule;
use crate::source::dataset::StatsCalculator;
use crate::source::smiles::{Bond, BondOrder, MoleculeGraph, parse_smiles};
use std::collections::BTreeMap;

/// Unordered element pair joined by a bond of a given order
///
/// `left <= right` always holds, so both directions of a bond share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BondKey {
    /// Smaller atomic number
    pub left: u8,
    /// Larger atomic number
    pub right: u8,
    /// Bond multiplicity
    pub order: BondOrder,
}

impl BondKey {
    /// Key for a pair of atomic numbers, in either order
    pub fn new(a: u8, b: u8, order: BondOrder) -> Self {
        Self {
            left: a.min(b),
            right: a.max(b),
            order,
        }
    }

    /// Key of `bond`, `None` when either end is an explicit hydrogen
    pub fn of(graph: &MoleculeGraph, bond: &Bond) -> Option<Self> {
        let begin = graph.atom(bond.begin)?;
        let end = graph.atom(bond.end)?;
        if begin.atomic_number == 1 || end.atomic_number == 1 {
            return None;
        }
        Some(Self::new(begin.atomic_number, end.atomic_number, bond.order))
    }

    const fn hydrogen_query(self) -> &'static str {
        match self.order.hydrogen_cost() {
            1 => "!H0",
            2 => "!H0;!H1",
            _ => "!H0;!H1;!H2",
        }
    }

    /// Rule growing a `right` atom off an existing `left` atom
    pub fn general_rule(self) -> Rule {
        let Self { left, right, order } = self;
        let h = self.hydrogen_query();
        let bond = order.symbol();
        Rule::new(format!("[#{left};{h}:1]>>[#{left}:1]{bond}[#{right}]"))
    }

    /// Rule bonding two non-ring atoms, which closes the ring between them
    pub fn ring_closing_rule(self) -> Rule {
        let Self { left, right, order } = self;
        let h = self.hydrogen_query();
        let bond = order.symbol();
        Rule::new(format!(
            "[#{left};!R;{h}:1].[#{right};!R;{h}:2]>>[#{left}:1]{bond}[#{right}:2]"
        ))
    }

    /// Rule turning an existing chain bond into a three-membered ring
    pub fn ring_forming_rule(self) -> Rule {
        let Self { left, right, order } = self;
        let h = self.hydrogen_query();
        let bond = order.symbol();
        Rule::new(format!(
            "[#{left};!R;{h}:1]~[#{right};!R;{h}:2]>>[#{left}:1]1~[#{right}:2]{bond}[#6]1"
        ))
    }
}

#[derive(Debug, Default)]
struct BondTally {
    sizes: Vec<usize>,
    all_bonds: BTreeMap<BondKey, usize>,
    ring_bonds: BTreeMap<BondKey, usize>,
    skipped: usize,
}

impl BondTally {
    fn record(&mut self, graph: &MoleculeGraph) {
        self.sizes.push(graph.heavy_atom_count());

        let in_ring = graph.ring_bond_mask();
        for (bond, ring) in graph.bonds().iter().zip(in_ring.iter().by_vals()) {
            let Some(key) = BondKey::of(graph, bond) else {
                continue;
            };
            *self.all_bonds.entry(key).or_default() += 1;
            if ring {
                *self.ring_bonds.entry(key).or_default() += 1;
            }
        }
    }

    fn into_statistics(self) -> Result<RawStatistics> {
        let size = SizeStatistics::from_sizes(&self.sizes).ok_or_else(|| {
            derivation_error(&format!(
                "none of {} records could be parsed",
                self.skipped
            ))
        })?;

        if self.all_bonds.is_empty() {
            return Err(derivation_error(&"dataset molecules contain no bonds"));
        }
        if self.ring_bonds.is_empty() {
            return Err(derivation_error(&"dataset molecules contain no ring bonds"));
        }

        let (general_rules, general_counts): (Vec<Rule>, Vec<usize>) = self
            .all_bonds
            .iter()
            .map(|(key, &count)| (key.general_rule(), count))
            .unzip();
        let ring_forming_rules: Vec<Rule> = self
            .ring_bonds
            .keys()
            .map(|key| key.ring_forming_rule())
            .collect();
        let (ring_closing_rules, ring_counts): (Vec<Rule>, Vec<usize>) = self
            .ring_bonds
            .iter()
            .map(|(key, &count)| (key.ring_closing_rule(), count))
            .unzip();

        tracing::info!(
            molecules = self.sizes.len(),
            skipped = self.skipped,
            general_rules = general_rules.len(),
            ring_closing_rules = ring_closing_rules.len(),
            "Derived rule statistics"
        );

        Ok(RawStatistics {
            average_size: size.average,
            size_std_dev: size.std_dev,
            ring_forming_rules,
            ring_closing_rules,
            ring_closing_probabilities: frequency_shares(&ring_counts),
            general_rules,
            general_probabilities: frequency_shares(&general_counts),
        })
    }
}

/// Frequency-counting [`StatsCalculator`] over SMILES records
///
/// Records that fail to parse are skipped with a warning; derivation fails
/// only when nothing usable remains.
#[derive(Clone, Default)]
pub struct SmilesStatsCalculator {
    progress: ScanProgress,
}

impl SmilesStatsCalculator {
    /// Calculator that reports no progress
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator that reports scan progress to `progress`
    pub const fn with_progress(progress: ScanProgress) -> Self {
        Self { progress }
    }
}

impl StatsCalculator for SmilesStatsCalculator {
    fn calculate(&self, records: &[String]) -> Result<RawStatistics> {
        let mut progress = self.progress.clone();
        progress.start(records.len(), "Scanning molecules");

        let mut tally = BondTally::default();
        for record in records {
            match parse_smiles(record) {
                Ok(graph) => tally.record(&graph),
                Err(error) => {
                    tally.skipped += 1;
                    tracing::warn!(record = %record, error = %error, "Skipping unparsable molecule");
                }
            }
            progress.advance();
        }

        progress.finish(&format!(
            "Scanned {} molecules ({} skipped)",
            records.len(),
            tally.skipped
        ));
        tally.into_statistics()
    }
}
