use std::io::{self, Write};

use bitvec::prelude::*;

/// Packs single bits MSB-first into bytes and writes every completed byte
/// to the sink.
///
/// [`finish`](BitWriter::finish) consumes the writer, so nothing can be
/// written after the stream is closed and it cannot be closed twice.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    sink: W,
    current: u8,
    bit_count: usize,
    bytes_written: usize,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        BitWriter {
            sink,
            current: 0,
            bit_count: 0,
            bytes_written: 0,
        }
    }

    /// Appends one bit. When it completes a byte and the sink rejects that
    /// byte, the error is returned and the byte is lost; `bits_written`
    /// still counts its bits while `bytes_written` does not.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        let bit_offset = self.bit_count % 8; // position inside the pending byte

        if bit {
            self.current |= 1 << (7 - bit_offset);
        }
        self.bit_count += 1;

        if bit_offset == 7 {
            self.flush_byte()?;
        }
        Ok(())
    }

    pub fn write_bits(&mut self, bits: &BitSlice<u8, Msb0>) -> io::Result<()> {
        for bit in bits.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Bits accepted so far, padding excluded.
    pub fn bits_written(&self) -> usize {
        self.bit_count
    }

    /// Full bytes handed to the sink so far.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Pads a partial byte with zero low-order bits, writes it, flushes
    /// the sink and hands it back.
    pub fn finish(mut self) -> io::Result<W> {
        if self.bit_count % 8 != 0 {
            self.flush_byte()?;
        }
        self.sink.flush()?;
        Ok(self.sink)
    }

    // The pending byte is cleared before the write, so after a sink error
    // it is dropped rather than merged into the next byte.
    fn flush_byte(&mut self) -> io::Result<()> {
        let byte = std::mem::take(&mut self.current);
        self.sink.write_all(&[byte])?;
        self.bytes_written += 1;
        Ok(())
    }
}
