use std::io::{BufRead, Write};

use tracing::debug;

use crate::bit_writer::BitWriter;
use crate::codebook::{CodeBook, CodeMode};
use crate::error::Result;
use crate::frequency::{read_lines, text_lines, FrequencyTable};
use crate::hufftree::HuffmanTree;

/// Counters for one encoded input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeStats {
    /// Input symbols consumed, terminators excluded.
    pub symbols: usize,
    /// Code bits emitted before padding.
    pub bits: usize,
    /// Bytes written to the sink, padding included.
    pub bytes: usize,
}

/// Encodes text with a fixed tree. The tree is only read, so one encoder
/// can be reused for any number of inputs over the same alphabet.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder {
    tree: HuffmanTree,
    code_book: CodeBook,
}

impl HuffmanEncoder {
    pub fn new(tree: HuffmanTree, mode: CodeMode) -> Self {
        let code_book = CodeBook::new(&tree, mode);
        HuffmanEncoder { tree, code_book }
    }

    pub fn from_table(table: &FrequencyTable, mode: CodeMode) -> Result<Self> {
        let tree = HuffmanTree::build(table)?;
        Ok(Self::new(tree, mode))
    }

    /// Builds the tree from the symbol counts of `text`.
    pub fn from_text(text: &[u8], mode: CodeMode) -> Result<Self> {
        Self::from_table(&FrequencyTable::from_text(text), mode)
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn code_book(&self) -> &CodeBook {
        &self.code_book
    }

    pub fn encode_lines<I, L, W>(&self, lines: I, sink: &mut W) -> Result<EncodeStats>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
        W: Write,
    {
        let mut writer = BitWriter::new(sink);
        let mut symbols = 0;
        for line in lines {
            symbols += self.encode_line(&mut writer, line.as_ref())?;
        }
        self.finish(writer, symbols)
    }

    /// Second pass: re-reads the text line by line and packs its codes.
    pub fn encode_reader<R, W>(&self, reader: R, sink: &mut W) -> Result<EncodeStats>
    where
        R: BufRead,
        W: Write,
    {
        let mut writer = BitWriter::new(sink);
        let mut symbols = 0;
        for line in read_lines(reader) {
            symbols += self.encode_line(&mut writer, &line?)?;
        }
        self.finish(writer, symbols)
    }

    pub fn encode_to_vec(&self, text: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_lines(text_lines(text), &mut out)?;
        Ok(out)
    }

    fn encode_line<W: Write>(&self, writer: &mut BitWriter<W>, line: &[u8]) -> Result<usize> {
        for &symbol in line {
            writer.write_bits(self.code_book.code(symbol)?)?;
        }
        Ok(line.len())
    }

    fn finish<W: Write>(&self, writer: BitWriter<W>, symbols: usize) -> Result<EncodeStats> {
        let bits = writer.bits_written();
        let full_bytes = writer.bytes_written();
        writer.finish()?;

        let stats = EncodeStats {
            symbols,
            bits,
            bytes: full_bytes + usize::from(bits % 8 != 0),
        };
        debug!(symbols = stats.symbols, bits = stats.bits, bytes = stats.bytes, "encoded");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HuffmanError;
    use std::io::Cursor;

    #[test]
    fn one_byte_per_symbol() {
        let encoder = HuffmanEncoder::from_text(b"ab", CodeMode::LeafBit).unwrap();
        assert_eq!(encoder.encode_to_vec(b"ab").unwrap(), vec![0x00, 0x01]);
    }

    #[test]
    fn lone_symbol_encodes_to_zero_bytes() {
        let encoder = HuffmanEncoder::from_text(b"aaa", CodeMode::LeafBit).unwrap();
        assert_eq!(encoder.tree().leaf_count(), 1);
        assert_eq!(encoder.encode_to_vec(b"aaa").unwrap(), vec![0x00; 3]);
    }

    #[test]
    fn terminators_are_skipped() {
        let encoder = HuffmanEncoder::from_text(b"ab\r\nba\n", CodeMode::LeafBit).unwrap();
        let mut out = Vec::new();
        let stats = encoder
            .encode_reader(Cursor::new(&b"ab\r\nba\n"[..]), &mut out)
            .unwrap();
        assert_eq!(out, vec![0x00, 0x01, 0x01, 0x00]);
        assert_eq!(stats, EncodeStats { symbols: 4, bits: 32, bytes: 4 });
    }

    #[test]
    fn path_mode_packs_variable_length_codes() {
        // tree: root(b, I(c, a)) so b=0, c=10, a=11
        let text = b"aaabbc";
        let table: FrequencyTable = [(b'a', 3), (b'b', 2), (b'c', 1)].into_iter().collect();
        let encoder = HuffmanEncoder::from_table(&table, CodeMode::Path).unwrap();
        assert_eq!(encoder.code_book().mode(), CodeMode::Path);

        let mut out = Vec::new();
        let stats = encoder.encode_lines([&text[..]], &mut out).unwrap();
        // 11 11 11 0 0 10 -> 1111_1100 10(00_0000)
        assert_eq!(out, vec![0b1111_1100, 0b1000_0000]);
        assert_eq!(stats, EncodeStats { symbols: 6, bits: 10, bytes: 2 });
    }

    #[test]
    fn lone_carriage_return_is_not_encoded() {
        let encoder = HuffmanEncoder::from_text(b"ab\rab", CodeMode::LeafBit).unwrap();
        assert_eq!(encoder.code_book().mode(), CodeMode::LeafBit);
        assert_eq!(encoder.encode_to_vec(b"ab\rab").unwrap(), vec![0x00, 0x01, 0x00, 0x01]);

        let mut out = Vec::new();
        let stats = encoder.encode_reader(Cursor::new(&b"ab\rab\r"[..]), &mut out).unwrap();
        assert_eq!(stats.symbols, 4);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn empty_table_has_no_encoder() {
        let err = HuffmanEncoder::from_table(&FrequencyTable::default(), CodeMode::LeafBit);
        assert!(matches!(err, Err(HuffmanError::EmptyFrequencyTable)));
    }

    #[test]
    fn foreign_symbol_fails() {
        let encoder = HuffmanEncoder::from_text(b"abc", CodeMode::LeafBit).unwrap();
        let err = encoder.encode_to_vec(b"abd").unwrap_err();
        assert!(matches!(err, HuffmanError::UnknownSymbol(b'd')));
    }

    #[test]
    fn encoder_is_reusable() {
        let encoder = HuffmanEncoder::from_text(b"abc", CodeMode::LeafBit).unwrap();
        let first = encoder.encode_to_vec(b"cab").unwrap();
        let second = encoder.encode_to_vec(b"cab").unwrap();
        assert_eq!(first, second);
    }
}
