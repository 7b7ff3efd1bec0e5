//! Symbol counting over line-oriented text.
//!
//! Input is consumed line by line and line terminators (`\n`, `\r\n` and a
//! lone `\r`) are dropped, so they never show up in a [`FrequencyTable`]
//! and never get encoded.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{HuffmanError, Result};

/// Occurrence count of every distinct byte in a text.
///
/// Iteration is in ascending byte order. Tree construction relies on that
/// order being stable, see [`crate::hufftree::HuffmanTree::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u8, usize>,
}

impl FrequencyTable {
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let counts = lines
            .into_iter()
            .fold(BTreeMap::new(), |mut acc, line| {
                for &byte in line.as_ref() {
                    *acc.entry(byte).or_insert(0) += 1;
                }
                acc
            });

        FrequencyTable { counts }
    }

    pub fn from_text(text: &[u8]) -> Self {
        Self::from_lines(text_lines(text))
    }

    /// Counts every line of `reader`. Read errors abort the count.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut counts = BTreeMap::new();
        for line in read_lines(reader) {
            for byte in line? {
                *counts.entry(byte).or_insert(0) += 1;
            }
        }
        Ok(FrequencyTable { counts })
    }

    /// First pass over a file. Open and read failures carry `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| HuffmanError::io(path, e))?;
        Self::from_reader(BufReader::new(file)).map_err(|e| HuffmanError::io(path, e))
    }

    pub fn count(&self, symbol: u8) -> Option<usize> {
        self.counts.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the number of symbols in the text.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl FromIterator<(u8, usize)> for FrequencyTable {
    /// Builds a table from explicit counts. Zero counts are skipped and
    /// repeated symbols accumulate.
    fn from_iter<T: IntoIterator<Item = (u8, usize)>>(iter: T) -> Self {
        let mut counts = BTreeMap::new();
        for (symbol, count) in iter.into_iter().filter(|(_, count)| *count > 0) {
            *counts.entry(symbol).or_insert(0) += count;
        }
        FrequencyTable { counts }
    }
}

fn is_terminator(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Splits in-memory text into lines without their terminators.
pub fn text_lines(text: &[u8]) -> TextLines<'_> {
    TextLines { rest: text }
}

/// Streams lines out of `reader` without their terminators.
pub fn read_lines<R: BufRead>(reader: R) -> ReadLines<R> {
    ReadLines {
        reader,
        after_cr: false,
    }
}

/// Iterator returned by [`text_lines`].
///
/// A terminator after the last line does not start another, empty line.
#[derive(Debug, Clone)]
pub struct TextLines<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for TextLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.rest.is_empty() {
            return None;
        }

        let rest = self.rest;
        match rest.iter().position(|&b| is_terminator(b)) {
            Some(i) => {
                let crlf = rest[i] == b'\r' && rest.get(i + 1) == Some(&b'\n');
                self.rest = &rest[i + if crlf { 2 } else { 1 }..];
                Some(&rest[..i])
            }
            None => {
                self.rest = &[];
                Some(rest)
            }
        }
    }
}

/// Iterator returned by [`read_lines`]. Splits on the same terminators as
/// [`text_lines`], including a `\r\n` pair torn across two buffer fills.
#[derive(Debug)]
pub struct ReadLines<R> {
    reader: R,
    // the previous line ended in `\r`, so a leading `\n` belongs to it
    after_cr: bool,
}

impl<R: BufRead> Iterator for ReadLines<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            };

            if buf.is_empty() {
                return (!line.is_empty()).then_some(Ok(line));
            }

            if self.after_cr {
                self.after_cr = false;
                if buf[0] == b'\n' {
                    self.reader.consume(1);
                    continue;
                }
            }

            match buf.iter().position(|&b| is_terminator(b)) {
                Some(i) => {
                    line.extend_from_slice(&buf[..i]);
                    self.after_cr = buf[i] == b'\r';
                    self.reader.consume(i + 1);
                    return Some(Ok(line));
                }
                None => {
                    let n = buf.len();
                    line.extend_from_slice(buf);
                    self.reader.consume(n);
                }
            }
        }
    }
}
