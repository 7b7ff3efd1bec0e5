//! Runs the full pipeline over a list of independent input files.
//!
//! For every input: count symbols, build the tree, pack the text into
//! `<name>_comp.bin`, dump the counts into `<name>_freq.txt` and measure
//! the size ratio. A failing input is logged and reported; it never stops
//! the remaining inputs.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::artifacts::{
    artifact_path, compression_ratio_of_files, write_frequency_dump, COMPRESSED_SUFFIX,
    FREQUENCY_SUFFIX,
};
use crate::codebook::CodeMode;
use crate::encoder::{EncodeStats, HuffmanEncoder};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::hufftree::HuffmanTree;

#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    pub inputs: Vec<PathBuf>,
    pub code_mode: CodeMode,
    /// Where artifacts go; next to each input when `None`.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct InputReport {
    pub compressed: PathBuf,
    pub frequencies: PathBuf,
    pub distinct_symbols: usize,
    pub tree: HuffmanTree,
    pub stats: EncodeStats,
    pub ratio: f64,
}

#[derive(Debug)]
pub struct InputOutcome {
    pub input: PathBuf,
    pub result: Result<InputReport>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<InputOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

pub fn run_batch(config: &BatchConfig) -> BatchReport {
    let mut report = BatchReport::default();

    for input in &config.inputs {
        let result = process_input(input, config);
        match &result {
            Ok(done) => info!(
                input = %input.display(),
                output = %done.compressed.display(),
                symbols = done.stats.symbols,
                bytes = done.stats.bytes,
                ratio = done.ratio,
                "compressed"
            ),
            Err(e) => error!(input = %input.display(), error = %e, "skipping input"),
        }
        report.outcomes.push(InputOutcome {
            input: input.clone(),
            result,
        });
    }

    report
}

pub fn process_input(input: &Path, config: &BatchConfig) -> Result<InputReport> {
    let out_dir = config.output_dir.as_deref();
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir).map_err(|e| HuffmanError::io(dir, e))?;
    }

    let table = FrequencyTable::from_file(input)?;
    let encoder = HuffmanEncoder::from_table(&table, config.code_mode)?;
    debug!(
        input = %input.display(),
        distinct = table.len(),
        depth = encoder.tree().depth(),
        "tree built"
    );

    let compressed = artifact_path(input, COMPRESSED_SUFFIX, out_dir);
    let stats = encode_file(&encoder, input, &compressed)?;

    let frequencies = artifact_path(input, FREQUENCY_SUFFIX, out_dir);
    {
        let file = File::create(&frequencies).map_err(|e| HuffmanError::io(&frequencies, e))?;
        write_frequency_dump(&table, BufWriter::new(file))
            .map_err(|e| HuffmanError::io(&frequencies, e))?;
    }

    let ratio = compression_ratio_of_files(input, &compressed)?;

    Ok(InputReport {
        compressed,
        frequencies,
        distinct_symbols: table.len(),
        tree: encoder.tree().clone(),
        stats,
        ratio,
    })
}

/// Second pass over `input`. A failure part way through leaves whatever
/// was written so far in `output`.
fn encode_file(encoder: &HuffmanEncoder, input: &Path, output: &Path) -> Result<EncodeStats> {
    let reader = File::open(input).map_err(|e| HuffmanError::io(input, e))?;
    let sink = File::create(output).map_err(|e| HuffmanError::io(output, e))?;
    let mut sink = BufWriter::new(sink);

    encoder.encode_reader(BufReader::new(reader), &mut sink)
}
