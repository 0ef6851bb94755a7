//! Minimal SMILES reader producing heavy-atom graphs
//!
//! Covers what rule statistics need: element, aromaticity and bond order of
//! every atom and bond, plus ring membership of bonds. Charges, isotopes,
//! chirality and hydrogen counts inside brackets are read past and dropped.
//!
//! Aromatic bonds exist only inside rings: a bond between aromatic atoms that
//! is not on a cycle, such as the link in biphenyl `c1ccccc1c1ccccc1`, is
//! read as single.

use bitvec::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Bond multiplicity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BondOrder {
    /// Single bond, including directional `/` and `\`
    Single,
    /// Double bond
    Double,
    /// Triple bond
    Triple,
    /// Aromatic bond, explicit `:` or implied between aromatic atoms
    Aromatic,
}

impl BondOrder {
    /// SMARTS symbol for this order
    pub const fn symbol(self) -> char {
        match self {
            Self::Single => '-',
            Self::Double => '=',
            Self::Triple => '#',
            Self::Aromatic => ':',
        }
    }

    /// Hydrogens each end gives up to form the bond
    pub const fn hydrogen_cost(self) -> u8 {
        match self {
            Self::Single | Self::Aromatic => 1,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }

    /// Parse an explicit bond symbol
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '-' | '/' | '\\' => Some(Self::Single),
            '=' => Some(Self::Double),
            '#' => Some(Self::Triple),
            ':' => Some(Self::Aromatic),
            _ => None,
        }
    }

    const fn implied(a: Atom, b: Atom) -> Self {
        if a.aromatic && b.aromatic {
            Self::Aromatic
        } else {
            Self::Single
        }
    }
}

/// Graph vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    /// Atomic number, 0 for the `*` wildcard
    pub atomic_number: u8,
    /// Written in lowercase aromatic form
    pub aromatic: bool,
}

/// Graph edge between two atom indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// First atom
    pub begin: usize,
    /// Second atom
    pub end: usize,
    /// Bond multiplicity
    pub order: BondOrder,
}

/// Atoms and bonds of one parsed record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoleculeGraph {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

/// Why a SMILES string was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmilesError {
    /// Byte offset where parsing stopped
    pub position: usize,
    /// What was wrong there
    pub reason: &'static str,
}

impl fmt::Display for SmilesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.reason, self.position)
    }
}

impl std::error::Error for SmilesError {}

const fn reject(position: usize, reason: &'static str) -> SmilesError {
    SmilesError { position, reason }
}

/// Atomic number of an element symbol, `None` if unknown
pub fn atomic_number(symbol: &str) -> Option<u8> {
    let number = match symbol {
        "H" => 1,
        "He" => 2,
        "Li" => 3,
        "Be" => 4,
        "B" => 5,
        "C" => 6,
        "N" => 7,
        "O" => 8,
        "F" => 9,
        "Ne" => 10,
        "Na" => 11,
        "Mg" => 12,
        "Al" => 13,
        "Si" => 14,
        "P" => 15,
        "S" => 16,
        "Cl" => 17,
        "Ar" => 18,
        "K" => 19,
        "Ca" => 20,
        "Mn" => 25,
        "Fe" => 26,
        "Co" => 27,
        "Ni" => 28,
        "Cu" => 29,
        "Zn" => 30,
        "Ga" => 31,
        "Ge" => 32,
        "As" => 33,
        "Se" => 34,
        "Br" => 35,
        "Kr" => 36,
        "Rb" => 37,
        "Sr" => 38,
        "Ag" => 47,
        "Cd" => 48,
        "Sn" => 50,
        "Sb" => 51,
        "Te" => 52,
        "I" => 53,
        "Xe" => 54,
        "Cs" => 55,
        "Ba" => 56,
        "Pt" => 78,
        "Au" => 79,
        "Hg" => 80,
        "Pb" => 82,
        "Bi" => 83,
        _ => return None,
    };
    Some(number)
}

impl MoleculeGraph {
    /// All atoms in input order
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// All bonds in input order
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Atom at `index`
    pub fn atom(&self, index: usize) -> Option<Atom> {
        self.atoms.get(index).copied()
    }

    /// Number of atoms other than explicit hydrogens
    pub fn heavy_atom_count(&self) -> usize {
        self.atoms
            .iter()
            .filter(|atom| atom.atomic_number != 1)
            .count()
    }

    /// Bit `i` is set when bond `i` lies on a cycle
    ///
    /// A bond lies on a cycle exactly when it is not a bridge; bridges are
    /// found with an iterative lowlink search.
    pub fn ring_bond_mask(&self) -> BitVec {
        let mut adjacency: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.atoms.len()];
        for (bond_index, bond) in self.bonds.iter().enumerate() {
            if let Some(edges) = adjacency.get_mut(bond.begin) {
                edges.push((bond.end, bond_index));
            }
            if let Some(edges) = adjacency.get_mut(bond.end) {
                edges.push((bond.begin, bond_index));
            }
        }

        let mut in_ring = bitvec![1; self.bonds.len()];
        let mut lowlink = Lowlink::new(self.atoms.len());

        for root in 0..self.atoms.len() {
            if lowlink.discovered(root).is_some() {
                continue;
            }

            lowlink.visit(root);
            let mut stack = vec![Frame {
                node: root,
                parent_bond: None,
                cursor: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                let node = frame.node;
                let next_edge = adjacency
                    .get(node)
                    .and_then(|edges| edges.get(frame.cursor))
                    .copied();

                if let Some((neighbor, bond_index)) = next_edge {
                    frame.cursor += 1;
                    if frame.parent_bond == Some(bond_index) {
                        continue;
                    }

                    if let Some(seen) = lowlink.discovered(neighbor) {
                        lowlink.lower(node, seen);
                    } else {
                        lowlink.visit(neighbor);
                        stack.push(Frame {
                            node: neighbor,
                            parent_bond: Some(bond_index),
                            cursor: 0,
                        });
                    }
                } else if let Some(child) = stack.pop() {
                    let Some(parent) = stack.last() else {
                        continue;
                    };
                    let child_low = lowlink.low(child.node);
                    lowlink.lower(parent.node, child_low);

                    let parent_discovery = lowlink.discovered(parent.node).unwrap_or(0);
                    if child_low > parent_discovery {
                        if let Some(bridge) = child.parent_bond {
                            in_ring.set(bridge, false);
                        }
                    }
                }
            }
        }

        in_ring
    }
}

struct Frame {
    node: usize,
    parent_bond: Option<usize>,
    cursor: usize,
}

struct Lowlink {
    discovery: Vec<Option<usize>>,
    low: Vec<usize>,
    clock: usize,
}

impl Lowlink {
    fn new(nodes: usize) -> Self {
        Self {
            discovery: vec![None; nodes],
            low: vec![0; nodes],
            clock: 0,
        }
    }

    fn visit(&mut self, node: usize) {
        if let Some(slot) = self.discovery.get_mut(node) {
            *slot = Some(self.clock);
        }
        if let Some(slot) = self.low.get_mut(node) {
            *slot = self.clock;
        }
        self.clock += 1;
    }

    fn discovered(&self, node: usize) -> Option<usize> {
        self.discovery.get(node).copied().flatten()
    }

    fn low(&self, node: usize) -> usize {
        self.low.get(node).copied().unwrap_or(0)
    }

    fn lower(&mut self, node: usize, value: usize) {
        if let Some(slot) = self.low.get_mut(node) {
            *slot = (*slot).min(value);
        }
    }
}

#[derive(Default)]
struct GraphBuilder {
    graph: MoleculeGraph,
    previous: Option<usize>,
    branches: Vec<usize>,
    pending_bond: Option<BondOrder>,
    open_rings: HashMap<u16, (usize, Option<BondOrder>)>,
}

impl GraphBuilder {
    fn add_atom(&mut self, atom: Atom, position: usize) -> Result<(), SmilesError> {
        let index = self.graph.atoms.len();
        self.graph.atoms.push(atom);

        match self.previous {
            Some(previous) => {
                let order = match (self.pending_bond.take(), self.graph.atom(previous)) {
                    (Some(order), _) => order,
                    (None, Some(neighbor)) => BondOrder::implied(neighbor, atom),
                    (None, None) => BondOrder::Single,
                };
                self.graph.bonds.push(Bond {
                    begin: previous,
                    end: index,
                    order,
                });
            }
            None if self.pending_bond.is_some() => {
                return Err(reject(position, "bond without preceding atom"));
            }
            None => {}
        }

        self.previous = Some(index);
        Ok(())
    }

    fn set_bond(&mut self, order: BondOrder, position: usize) -> Result<(), SmilesError> {
        if self.pending_bond.is_some() {
            return Err(reject(position, "consecutive bond symbols"));
        }
        self.pending_bond = Some(order);
        Ok(())
    }

    fn open_branch(&mut self, position: usize) -> Result<(), SmilesError> {
        let previous = self
            .previous
            .ok_or_else(|| reject(position, "branch without preceding atom"))?;
        if self.pending_bond.is_some() {
            return Err(reject(position, "bond symbol before branch"));
        }
        self.branches.push(previous);
        Ok(())
    }

    fn close_branch(&mut self, position: usize) -> Result<(), SmilesError> {
        if self.pending_bond.is_some() {
            return Err(reject(position, "dangling bond"));
        }
        let anchor = self
            .branches
            .pop()
            .ok_or_else(|| reject(position, "unbalanced ')'"))?;
        self.previous = Some(anchor);
        Ok(())
    }

    fn disconnect(&mut self, position: usize) -> Result<(), SmilesError> {
        if self.pending_bond.is_some() {
            return Err(reject(position, "dangling bond"));
        }
        self.previous = None;
        Ok(())
    }

    fn ring_closure(&mut self, label: u16, position: usize) -> Result<(), SmilesError> {
        let current = self
            .previous
            .ok_or_else(|| reject(position, "ring closure without preceding atom"))?;
        let written = self.pending_bond.take();

        let Some((partner, opening)) = self.open_rings.remove(&label) else {
            self.open_rings.insert(label, (current, written));
            return Ok(());
        };

        if partner == current {
            return Err(reject(position, "ring closes on its own atom"));
        }

        let order = match (written, opening) {
            (Some(a), Some(b)) if a != b => {
                return Err(reject(position, "conflicting ring bond orders"));
            }
            (Some(order), _) | (None, Some(order)) => order,
            (None, None) => match (self.graph.atom(partner), self.graph.atom(current)) {
                (Some(a), Some(b)) => BondOrder::implied(a, b),
                _ => BondOrder::Single,
            },
        };

        self.graph.bonds.push(Bond {
            begin: partner,
            end: current,
            order,
        });
        Ok(())
    }

    fn finish(self, position: usize) -> Result<MoleculeGraph, SmilesError> {
        if self.pending_bond.is_some() {
            return Err(reject(position, "dangling bond"));
        }
        if !self.branches.is_empty() {
            return Err(reject(position, "unclosed branch"));
        }
        if !self.open_rings.is_empty() {
            return Err(reject(position, "unclosed ring"));
        }
        if self.graph.atoms.is_empty() {
            return Err(reject(position, "no atoms"));
        }

        let mut graph = self.graph;
        let in_ring = graph.ring_bond_mask();
        for (bond, ring) in graph.bonds.iter_mut().zip(in_ring.iter().by_vals()) {
            if bond.order == BondOrder::Aromatic && !ring {
                bond.order = BondOrder::Single;
            }
        }
        Ok(graph)
    }
}

type Cursor<'s> = Peekable<CharIndices<'s>>;

fn read_organic_atom(first: char, chars: &mut Cursor<'_>) -> Option<Atom> {
    let two_letter = match (first, chars.peek().map(|&(_, c)| c)) {
        ('C', Some('l')) => Some("Cl"),
        ('B', Some('r')) => Some("Br"),
        _ => None,
    };

    if let Some(symbol) = two_letter {
        chars.next();
        return atomic_number(symbol).map(|atomic_number| Atom {
            atomic_number,
            aromatic: false,
        });
    }

    let (symbol, aromatic) = match first {
        'B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I' => (first.to_string(), false),
        'b' | 'c' | 'n' | 'o' | 'p' | 's' => (first.to_ascii_uppercase().to_string(), true),
        _ => return None,
    };

    atomic_number(&symbol).map(|atomic_number| Atom {
        atomic_number,
        aromatic,
    })
}

fn read_bracket_atom(chars: &mut Cursor<'_>, open: usize) -> Result<Atom, SmilesError> {
    while chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {}

    let (position, first) = chars
        .next()
        .ok_or_else(|| reject(open, "unclosed bracket atom"))?;

    let atom = if first == '*' {
        Atom {
            atomic_number: 0,
            aromatic: false,
        }
    } else {
        let aromatic = first.is_ascii_lowercase();
        let mut symbol = first.to_ascii_uppercase().to_string();

        // Prefer the two-letter reading: [Cl], [se], [Na]
        if let Some(&(_, second)) = chars.peek() {
            if second.is_ascii_lowercase() {
                let candidate = format!("{symbol}{second}");
                if atomic_number(&candidate).is_some() {
                    symbol = candidate;
                    chars.next();
                } else if !aromatic {
                    // Uppercase then lowercase is always one two-letter symbol: [Pd], [Cr]
                    return Err(reject(position, "unknown element"));
                }
            }
        }

        let atomic_number =
            atomic_number(&symbol).ok_or_else(|| reject(position, "unknown element"))?;
        Atom {
            atomic_number,
            aromatic,
        }
    };

    for (_, c) in chars.by_ref() {
        if c == ']' {
            return Ok(atom);
        }
    }

    Err(reject(open, "unclosed bracket atom"))
}

fn read_ring_label(chars: &mut Cursor<'_>, position: usize) -> Result<u16, SmilesError> {
    let mut label = 0;
    for _ in 0..2 {
        let digit = chars
            .next()
            .and_then(|(_, c)| c.to_digit(10))
            .ok_or_else(|| reject(position, "'%' must be followed by two digits"))?;
        label = label * 10 + digit as u16;
    }
    Ok(label)
}

/// Parse one SMILES string
///
/// # Errors
///
/// Returns a [`SmilesError`] at the first construct that cannot be read
pub fn parse_smiles(smiles: &str) -> Result<MoleculeGraph, SmilesError> {
    let mut builder = GraphBuilder::default();
    let mut chars = smiles.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '(' => builder.open_branch(position)?,
            ')' => builder.close_branch(position)?,
            '.' => builder.disconnect(position)?,
            '[' => {
                let atom = read_bracket_atom(&mut chars, position)?;
                builder.add_atom(atom, position)?;
            }
            '%' => {
                let label = read_ring_label(&mut chars, position)?;
                builder.ring_closure(label, position)?;
            }
            '0'..='9' => {
                let label = c.to_digit(10).unwrap_or(0) as u16;
                builder.ring_closure(label, position)?;
            }
            '*' => builder.add_atom(
                Atom {
                    atomic_number: 0,
                    aromatic: false,
                },
                position,
            )?,
            '-' | '/' | '\\' | '=' | '#' | ':' => {
                let order = BondOrder::from_symbol(c).unwrap_or(BondOrder::Single);
                builder.set_bond(order, position)?;
            }
            _ => {
                let atom = read_organic_atom(c, &mut chars)
                    .ok_or_else(|| reject(position, "unexpected character"))?;
                builder.add_atom(atom, position)?;
            }
        }
    }

    builder.finish(smiles.len())
}
