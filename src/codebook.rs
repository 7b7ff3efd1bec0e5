//! Symbol lookup: which bits go out for each input byte.
//!
//! Two code shapes are supported. [`CodeMode::LeafBit`] emits the assigned
//! bit of the symbol's own leaf widened to a full byte (`0x00` or `0x01`),
//! which is the artifact format this crate was built to produce. It is not
//! a prefix code and cannot be decoded. [`CodeMode::Path`] emits the usual
//! root-to-leaf Huffman path instead.

use std::collections::BTreeMap;

use bitvec::prelude::*;

use crate::error::{HuffmanError, Result};
use crate::hufftree::{Bit, HuffNode, HuffmanTree};

pub type Code = BitVec<u8, Msb0>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeMode {
    /// One byte per symbol, holding the leaf's assigned bit.
    #[default]
    LeafBit,
    /// Concatenated branch bits from the root, left = 0, right = 1.
    Path,
}

/// Depth-first search, left before right, for the leaf holding `symbol`.
/// Returns that leaf's assigned bit, or `None` if no leaf matches.
pub fn resolve_leaf_bit(tree: &HuffmanTree, symbol: u8) -> Option<Bit> {
    search(tree.root(), symbol, Bit::Zero)
}

fn search(node: &HuffNode, target: u8, bit: Bit) -> Option<Bit> {
    match node {
        HuffNode::Leaf { symbol, .. } => (*symbol == target).then_some(bit),
        HuffNode::Internal { left, right, .. } => {
            search(left, target, Bit::Zero).or_else(|| search(right, target, Bit::One))
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodeBook {
    mode: CodeMode,
    codes: BTreeMap<u8, Code>,
}

impl CodeBook {
    pub fn new(tree: &HuffmanTree, mode: CodeMode) -> Self {
        let mut codes = BTreeMap::new();
        match mode {
            CodeMode::LeafBit => leaf_bit_codes(tree.root(), Bit::Zero, &mut codes),
            CodeMode::Path => match tree.root() {
                // a lone leaf still needs one bit per symbol
                HuffNode::Leaf { symbol, .. } => {
                    codes.insert(*symbol, bitvec![u8, Msb0; 0]);
                }
                root => path_codes(root, &mut Code::new(), &mut codes),
            },
        }
        CodeBook { mode, codes }
    }

    pub fn mode(&self) -> CodeMode {
        self.mode
    }

    pub fn code(&self, symbol: u8) -> Result<&BitSlice<u8, Msb0>> {
        self.codes
            .get(&symbol)
            .map(|code| code.as_bitslice())
            .ok_or(HuffmanError::UnknownSymbol(symbol))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice<u8, Msb0>)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_bitslice()))
    }
}

fn leaf_bit_codes(node: &HuffNode, bit: Bit, codes: &mut BTreeMap<u8, Code>) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            // fixed-width 8-bit rendering of the value 0 or 1
            codes.insert(*symbol, bit.as_u8().view_bits::<Msb0>().to_bitvec());
        }
        HuffNode::Internal { left, right, .. } => {
            leaf_bit_codes(left, Bit::Zero, codes);
            leaf_bit_codes(right, Bit::One, codes);
        }
    }
}

fn path_codes(node: &HuffNode, prefix: &mut Code, codes: &mut BTreeMap<u8, Code>) {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, prefix.clone());
        }
        HuffNode::Internal { left, right, .. } => {
            prefix.push(false);
            path_codes(left, prefix, codes);
            prefix.pop();

            prefix.push(true);
            path_codes(right, prefix, codes);
            prefix.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;

    fn tree_of(pairs: &[(u8, usize)]) -> HuffmanTree {
        let table: FrequencyTable = pairs.iter().copied().collect();
        HuffmanTree::build(&table).unwrap()
    }

    #[test]
    fn resolves_assigned_bits() {
        let tree = tree_of(&[(b'a', 2), (b'b', 5)]);
        assert_eq!(resolve_leaf_bit(&tree, b'a'), Some(Bit::Zero));
        assert_eq!(resolve_leaf_bit(&tree, b'b'), Some(Bit::One));
        assert_eq!(resolve_leaf_bit(&tree, b'c'), None);
    }

    #[test]
    fn lone_leaf_keeps_default_bit() {
        let tree = tree_of(&[(b'a', 3)]);
        assert_eq!(resolve_leaf_bit(&tree, b'a'), Some(Bit::Zero));
    }

    #[test]
    fn only_the_leaf_bit_counts() {
        // root(b, I(c, a)): a sits under a left-hand internal node but is itself a right child
        let tree = tree_of(&[(b'a', 3), (b'b', 2), (b'c', 1)]);
        assert_eq!(resolve_leaf_bit(&tree, b'a'), Some(Bit::One));
        assert_eq!(resolve_leaf_bit(&tree, b'b'), Some(Bit::Zero));
        assert_eq!(resolve_leaf_bit(&tree, b'c'), Some(Bit::Zero));
    }

    #[test]
    fn leaf_bit_book_agrees_with_resolver() {
        let tree = HuffmanTree::build(&FrequencyTable::from_text(b"the quick brown fox")).unwrap();
        let book = CodeBook::new(&tree, CodeMode::LeafBit);
        assert_eq!(book.len(), tree.leaf_count());
        for (symbol, code) in book.iter() {
            let bit = resolve_leaf_bit(&tree, symbol).unwrap();
            assert_eq!(code.len(), 8);
            assert_eq!(code.load_be::<u8>(), bit.as_u8());
        }
    }

    #[test]
    fn path_codes_follow_branches() {
        let tree = tree_of(&[(b'a', 3), (b'b', 2), (b'c', 1)]);
        let book = CodeBook::new(&tree, CodeMode::Path);
        assert_eq!(book.code(b'b').unwrap(), bits![u8, Msb0; 0]);
        assert_eq!(book.code(b'c').unwrap(), bits![u8, Msb0; 1, 0]);
        assert_eq!(book.code(b'a').unwrap(), bits![u8, Msb0; 1, 1]);
    }

    #[test]
    fn path_codes_are_prefix_free() {
        let tree = HuffmanTree::build(&FrequencyTable::from_text(b"abracadabra alakazam")).unwrap();
        let book = CodeBook::new(&tree, CodeMode::Path);
        let codes: Vec<_> = book.iter().map(|(_, code)| code).collect();
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.starts_with(a), "{a:?} is a prefix of {b:?}");
                }
            }
        }
    }

    #[test]
    fn lone_leaf_path_code_is_one_bit() {
        let book = CodeBook::new(&tree_of(&[(b'x', 4)]), CodeMode::Path);
        assert_eq!(book.code(b'x').unwrap(), bits![u8, Msb0; 0]);
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let book = CodeBook::new(&tree_of(&[(b'x', 4)]), CodeMode::LeafBit);
        assert!(matches!(book.code(b'y'), Err(HuffmanError::UnknownSymbol(b'y'))));
    }
}
