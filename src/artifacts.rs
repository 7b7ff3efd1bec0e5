//! Files produced next to each input: the packed stream and the frequency
//! dump, plus the size ratio between an input and its packed stream.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

pub const COMPRESSED_SUFFIX: &str = "_comp.bin";
pub const FREQUENCY_SUFFIX: &str = "_freq.txt";

/// Writes one `<symbol> <count>` line per table entry. The symbol byte is
/// written as is.
pub fn write_frequency_dump<W: Write>(table: &FrequencyTable, mut out: W) -> io::Result<()> {
    for (symbol, count) in table.iter() {
        out.write_all(&[symbol, b' '])?;
        writeln!(out, "{}", count)?;
    }
    out.flush()
}

/// `1 - original_bits / result_bits`.
///
/// Positive when the result is larger than the original, negative when it
/// is smaller.
pub fn compression_ratio(original_len: u64, result_len: u64) -> Result<f64> {
    if result_len == 0 {
        return Err(HuffmanError::EmptyArtifact);
    }
    let original_bits = (original_len * 8) as f64;
    let result_bits = (result_len * 8) as f64;
    Ok(1.0 - original_bits / result_bits)
}

pub fn compression_ratio_of_files(original: &Path, result: &Path) -> Result<f64> {
    let original_len = file_len(original)?;
    let result_len = file_len(result)?;
    compression_ratio(original_len, result_len)
}

fn file_len(path: &Path) -> Result<u64> {
    fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|e| HuffmanError::io(path, e))
}

/// Derives an artifact path from an input path: `dir/name.txt` becomes
/// `dir/name<suffix>`, any other file name just gets `suffix` appended.
/// With `out_dir` set the artifact lands there instead of next to the
/// input.
pub fn artifact_path(input: &Path, suffix: &str, out_dir: Option<&Path>) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.strip_suffix(".txt").unwrap_or(&file_name);
    let artifact = format!("{}{}", stem, suffix);

    match out_dir {
        Some(dir) => dir.join(artifact),
        None => input.with_file_name(artifact),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_lists_symbol_and_count() {
        let table = FrequencyTable::from_text(b"abca b");
        let mut out = Vec::new();
        write_frequency_dump(&table, &mut out).unwrap();
        assert_eq!(out, b"  1\na 2\nb 2\nc 1\n");
    }

    #[test]
    fn ratio_uses_inverted_fraction() {
        let ratio = compression_ratio(10, 30).unwrap();
        assert!((ratio - (1.0 - 80.0 / 240.0)).abs() < 1e-12);
        assert!((ratio - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_is_negative_for_smaller_results() {
        assert!(compression_ratio(30, 10).unwrap() < 0.0);
        assert_eq!(compression_ratio(12, 12).unwrap(), 0.0);
    }

    #[test]
    fn empty_result_has_no_ratio() {
        assert!(matches!(compression_ratio(10, 0), Err(HuffmanError::EmptyArtifact)));
    }

    #[test]
    fn artifact_names_replace_txt() {
        let input = Path::new("data/alice.txt");
        assert_eq!(
            artifact_path(input, COMPRESSED_SUFFIX, None),
            PathBuf::from("data/alice_comp.bin")
        );
        assert_eq!(
            artifact_path(input, FREQUENCY_SUFFIX, Some(Path::new("out"))),
            PathBuf::from("out/alice_freq.txt")
        );
        assert_eq!(
            artifact_path(Path::new("notes.md"), COMPRESSED_SUFFIX, None),
            PathBuf::from("notes.md_comp.bin")
        );
    }
}
