// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Single-error-correcting Hamming code over byte-aligned blocks.
//!
//! A code with `r` redundant bits packs `k = 8 * floor((2^r - r - 1) / 8)`
//! data bits into each full block of `k + r` bits: r = 4 gives the classic
//! (12, 8) code with one byte per block, r = 5 carries three bytes, and so
//! on up to r = 8 (thirty bytes). Parity bits sit at the 1-based positions
//! 1, 2, 4, ... and make every check group even; data bits fill the other
//! positions in order, MSB of each byte first.
//!
//! A trailing block with fewer bytes is shortened and carries the minimal
//! parity count for its length. All block bits are concatenated and packed
//! MSB-first, zero-padded to a whole byte.
//!
//! Decoding computes the syndrome (XOR of the 1-based positions of all set
//! bits): zero means clean, a position inside the block is flipped, anything
//! else cannot be a single-bit error and fails the block. Two flipped bits in
//! one block are not detected reliably; they may decode to wrong data.

use crate::stego::ecc::map_chunks;
use crate::stego::error::StegoError;
use crate::stego::frame::{bits_to_bytes, bytes_to_bits};

/// Smallest supported redundancy (the (12, 8) code).
pub const MIN_REDUNDANT_BITS: u8 = 4;
/// Largest supported redundancy.
pub const MAX_REDUNDANT_BITS: u8 = 8;

/// Smallest `r` with `2^r >= data_bits + r + 1`.
fn parity_bits_for(data_bits: usize) -> usize {
    let mut r = 1;
    while (1usize << r) < data_bits + r + 1 {
        r += 1;
    }
    r
}

/// Encode one block of data bytes into `8 * data.len() + r` code bits.
fn encode_block(data: &[u8]) -> Vec<u8> {
    let data_bits = bytes_to_bits(data);
    let r = parity_bits_for(data_bits.len());
    let n = data_bits.len() + r;

    let mut code = vec![0u8; n];
    let mut next = data_bits.iter();
    for pos in 1..=n {
        if !pos.is_power_of_two() {
            code[pos - 1] = next.next().copied().unwrap_or(0);
        }
    }

    for i in 0..r {
        let mask = 1usize << i;
        let parity = (1..=n)
            .filter(|&pos| pos & mask != 0 && pos != mask)
            .fold(0u8, |acc, pos| acc ^ code[pos - 1]);
        code[mask - 1] = parity;
    }
    code
}

/// Outcome of decoding one block.
struct BlockDecode {
    data_bits: Vec<u8>,
    corrected: bool,
}

/// Correct at most one bit and strip the parity positions.
///
/// Returns `None` when the syndrome points outside the block.
fn decode_block(block: &[u8]) -> Option<BlockDecode> {
    let n = block.len();
    let syndrome = (1..=n)
        .filter(|&pos| block[pos - 1] & 1 == 1)
        .fold(0usize, |acc, pos| acc ^ pos);

    let mut code = block.to_vec();
    let corrected = syndrome != 0;
    if corrected {
        if syndrome > n {
            return None;
        }
        code[syndrome - 1] ^= 1;
    }

    let data_bits = (1..=n)
        .filter(|pos| !pos.is_power_of_two())
        .map(|pos| code[pos - 1] & 1)
        .collect();
    Some(BlockDecode { data_bits, corrected })
}

/// Statistics from decoding a Hamming-protected payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HammingStats {
    /// Blocks in which a single bit was corrected.
    pub corrected_blocks: usize,
    /// Number of blocks decoded.
    pub num_blocks: usize,
}

/// Block layout derived from an encoded length.
struct Layout {
    full_blocks: usize,
    /// Bytes in the shortened trailing block (0 if none).
    tail_bytes: usize,
}

/// A Hamming code with a fixed redundancy per full block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hamming {
    redundant_bits: usize,
    block_bytes: usize,
}

impl Hamming {
    /// # Errors
    /// [`StegoError::UnsupportedConfiguration`] unless `4 <= redundant_bits <= 8`.
    pub fn new(redundant_bits: u8) -> Result<Self, StegoError> {
        if !(MIN_REDUNDANT_BITS..=MAX_REDUNDANT_BITS).contains(&redundant_bits) {
            return Err(StegoError::UnsupportedConfiguration(
                "Hamming redundant_bits must be in 4..=8",
            ));
        }
        let r = redundant_bits as usize;
        Ok(Self {
            redundant_bits: r,
            block_bytes: ((1usize << r) - r - 1) / 8,
        })
    }

    pub fn redundant_bits(&self) -> usize {
        self.redundant_bits
    }

    /// Data bytes carried by one full block.
    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }

    fn full_block_bits(&self) -> usize {
        self.block_bytes * 8 + self.redundant_bits
    }

    fn tail_block_bits(tail_bytes: usize) -> usize {
        tail_bytes * 8 + parity_bits_for(tail_bytes * 8)
    }

    fn encoded_bits(&self, data_len: usize) -> usize {
        let full_blocks = data_len / self.block_bytes;
        let tail = data_len % self.block_bytes;
        let mut bits = full_blocks * self.full_block_bits();
        if tail > 0 {
            bits += Self::tail_block_bits(tail);
        }
        bits
    }

    /// Encoded length in bytes for `data_len` payload bytes.
    pub fn encoded_len(&self, data_len: usize) -> usize {
        self.encoded_bits(data_len).div_ceil(8)
    }

    /// Recover the block layout from an encoded length.
    ///
    /// Greedy is exact: a shortened block plus under 8 padding bits is
    /// always shorter than a full block.
    fn layout(&self, encoded_len: usize) -> Result<Layout, StegoError> {
        let total_bits = encoded_len * 8;
        let full_bits = self.full_block_bits();
        let full_blocks = total_bits / full_bits;
        let rest = total_bits % full_bits;

        let tail_bytes = (1..self.block_bytes)
            .rev()
            .find(|&j| Self::tail_block_bits(j) <= rest)
            .unwrap_or(0);

        let data_len = full_blocks * self.block_bytes + tail_bytes;
        if self.encoded_len(data_len) != encoded_len {
            return Err(StegoError::UncorrectableBlock {
                block: full_blocks + usize::from(tail_bytes > 0),
            });
        }
        Ok(Layout { full_blocks, tail_bytes })
    }

    /// Payload length recovered from an encoded length.
    pub fn decoded_len(&self, encoded_len: usize) -> Result<usize, StegoError> {
        let layout = self.layout(encoded_len)?;
        Ok(layout.full_blocks * self.block_bytes + layout.tail_bytes)
    }

    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let bits = map_chunks(data, self.block_bytes, |_, chunk| encode_block(chunk)).concat();
        bits_to_bytes(&bits)
    }

    /// # Errors
    /// [`StegoError::UncorrectableBlock`] naming the first block whose
    /// syndrome points outside the block, or the trailing block if the length
    /// cannot come from [`encode`](Self::encode).
    pub fn decode(&self, encoded: &[u8]) -> Result<(Vec<u8>, HammingStats), StegoError> {
        let layout = self.layout(encoded.len())?;
        let bits = bytes_to_bits(encoded);
        let full_bits = self.full_block_bits();
        let full_end = layout.full_blocks * full_bits;

        let mut results = map_chunks(&bits[..full_end], full_bits, |i, block| (i, decode_block(block)));
        if layout.tail_bytes > 0 {
            let tail_end = full_end + Self::tail_block_bits(layout.tail_bytes);
            results.push((layout.full_blocks, decode_block(&bits[full_end..tail_end])));
        }

        let mut data_bits = Vec::with_capacity(bits.len());
        let mut stats = HammingStats::default();
        for (block, result) in results {
            let decoded = result.ok_or(StegoError::UncorrectableBlock { block })?;
            if decoded.corrected {
                tracing::trace!(block, "corrected Hamming block");
                stats.corrected_blocks += 1;
            }
            data_bits.extend_from_slice(&decoded.data_bits);
            stats.num_blocks += 1;
        }
        Ok((bits_to_bytes(&data_bits), stats))
    }
}
