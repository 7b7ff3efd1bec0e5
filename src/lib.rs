//! # leafbit_huffman
//!
//! Builds a binary code tree from the byte frequencies of a text and packs
//! the text into a bitstream with it.
//!
//! ## Quick Start
//!
//! ```rust
//! use leafbit_huffman::{CodeMode, HuffmanEncoder};
//!
//! let encoder = HuffmanEncoder::from_text(b"ab", CodeMode::LeafBit)?;
//! assert_eq!(encoder.encode_to_vec(b"ab")?, vec![0x00, 0x01]);
//! # Ok::<(), leafbit_huffman::HuffmanError>(())
//! ```
//!
//! The default [`CodeMode::LeafBit`] writes one byte per input symbol and
//! keeps no header or tree in the output, so the packed stream cannot be
//! decoded on its own. [`CodeMode::Path`] writes proper prefix codes.

pub mod artifacts;
pub mod batch;
pub mod codebook;
pub mod encoder;
pub mod error;
pub mod frequency;
pub mod hufftree;

mod bit_writer;

// Re-export main types for convenience
pub use batch::{run_batch, BatchConfig, BatchReport};
pub use codebook::{resolve_leaf_bit, CodeBook, CodeMode};
pub use encoder::{EncodeStats, HuffmanEncoder};
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyTable;
pub use hufftree::{Bit, HuffNode, HuffmanTree};
