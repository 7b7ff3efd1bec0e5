use std::fmt;

use tracing::{debug, trace};

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// A single code bit.
///
/// Every node gets its bit at the moment it is merged: the first pick of a
/// merge step becomes the left child (`Zero`), the second pick the right
/// child (`One`). The root is never merged and keeps the default `Zero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bit {
    #[default]
    Zero,
    One,
}

impl Bit {
    pub fn as_u8(self) -> u8 {
        match self {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl From<bool> for Bit {
    fn from(b: bool) -> Self {
        if b { Bit::One } else { Bit::Zero }
    }
}

impl From<Bit> for bool {
    fn from(bit: Bit) -> Self {
        bit == Bit::One
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Greedily merges the two lightest nodes until one root remains.
    ///
    /// Selection is a linear scan over the working nodes with a fixed
    /// tie-break, so the same table always yields the same tree:
    ///
    /// - the first two nodes seed candidate 1 and candidate 2, unordered;
    /// - a node strictly lighter than candidate 1 displaces it, and the old
    ///   candidate 1 becomes candidate 2 without being compared again;
    /// - otherwise a node strictly lighter than candidate 2 replaces it;
    /// - equal weights never displace an earlier pick.
    ///
    /// Both candidates leave the working set and their parent is appended
    /// at the end. Leaves enter in the table's iteration order.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(HuffmanError::EmptyFrequencyTable);
        }

        let mut nodes: Vec<HuffNode> = table
            .iter()
            .map(|(symbol, count)| HuffNode::new(symbol, count))
            .collect();

        debug!(leaves = nodes.len(), weight = table.total(), "building encoding tree");

        while nodes.len() > 1 {
            let (first, second) = select_pair(&nodes);

            // remove the higher index first so the lower one stays valid
            let (left, right) = if first < second {
                let right = nodes.remove(second);
                (nodes.remove(first), right)
            } else {
                let left = nodes.remove(first);
                (left, nodes.remove(second))
            };

            trace!(left = left.weight(), right = right.weight(), "merge");
            nodes.push(HuffNode::merge(left, right));
        }

        let root = nodes.pop().ok_or(HuffmanError::EmptyFrequencyTable)?;
        Ok(HuffmanTree { root })
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Total weight, equal to the number of symbols counted.
    pub fn weight(&self) -> usize {
        self.root.weight()
    }

    /// Number of node levels; a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// `(symbol, weight)` of every leaf, left before right.
    pub fn leaves(&self) -> Vec<(u8, usize)> {
        let mut leaves = Vec::with_capacity(self.leaf_count());
        self.root.collect_leaves(&mut leaves);
        leaves
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_level(f, 0)
    }
}

/// Indices of the two nodes to merge next. `nodes` holds at least two.
fn select_pair(nodes: &[HuffNode]) -> (usize, usize) {
    let mut first = 0;
    let mut second = 1;

    for (i, node) in nodes.iter().enumerate().skip(2) {
        if node.weight() < nodes[first].weight() {
            second = first;
            first = i;
        } else if node.weight() < nodes[second].weight() {
            second = i;
        }
    }

    (first, second)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: usize,
        symbol: u8,
    },
    Internal {
        weight: usize,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: u8, weight: usize) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// `a` takes the left slot (bit 0), `b` the right slot (bit 1).
    pub fn merge(a: Self, b: Self) -> Self {
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn collect_leaves(&self, leaves: &mut Vec<(u8, usize)>) {
        match self {
            HuffNode::Leaf { symbol, weight } => leaves.push((*symbol, *weight)),
            HuffNode::Internal { left, right, .. } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }

    fn fmt_level(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let indent = "   ".repeat(level);
        match self {
            HuffNode::Leaf { symbol, weight } => {
                writeln!(f, "{}{}:{}", indent, symbol.escape_ascii(), weight)
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{}Value:{}", indent, weight)?;
                left.fmt_level(f, level + 1)?;
                right.fmt_level(f, level + 1)
            }
        }
    }
}
