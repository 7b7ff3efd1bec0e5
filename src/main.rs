use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::info;

use leafbit_huffman::{run_batch, BatchConfig, CodeMode};

const DEFAULT_LOG_FILTER: &str = "leafbit_huffman=info,leafbit=info";

/// Packs text files with a frequency-built code tree
#[derive(Parser, Debug)]
#[command(name = "leafbit", version)]
#[command(about = "Count byte frequencies, build the code tree and pack each input file")]
struct Args {
    /// Input text files, processed independently
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Code written for each input byte
    #[arg(long, value_enum, default_value_t = Mode::LeafBit, env = "LEAFBIT_MODE")]
    mode: Mode,

    /// Directory for the `_comp.bin` and `_freq.txt` artifacts (default: next to each input)
    #[arg(long, env = "LEAFBIT_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Print each encoding tree to stdout
    #[arg(long)]
    print_tree: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// One byte per symbol holding its leaf bit
    LeafBit,
    /// Root-to-leaf prefix codes
    Path,
}

impl From<Mode> for CodeMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::LeafBit => CodeMode::LeafBit,
            Mode::Path => CodeMode::Path,
        }
    }
}

fn main() -> ExitCode {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = BatchConfig {
        inputs: args.inputs,
        code_mode: args.mode.into(),
        output_dir: args.out_dir,
    };

    info!(inputs = config.inputs.len(), mode = ?config.code_mode, "starting batch");
    let report = run_batch(&config);

    for outcome in &report.outcomes {
        if let Ok(done) = &outcome.result {
            println!(
                "{}: {} symbols -> {} ({} bytes), ratio {:.4}",
                outcome.input.display(),
                done.stats.symbols,
                done.compressed.display(),
                done.stats.bytes,
                done.ratio
            );
            if args.print_tree {
                print!("{}", done.tree);
                println!("depth: {}", done.tree.depth());
            }
        }
    }

    info!(succeeded = report.succeeded(), failed = report.failed(), "batch finished");
    if report.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
