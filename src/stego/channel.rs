// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit channel: maps a flat bit sequence onto low-order carrier bits.
//!
//! The usable carrier bytes are `0, stride, 2*stride, ...` (exactly
//! `floor(len / stride)` of them). Each usable byte carries the next
//! `bits_per_byte` bits of the sequence in its lowest bits, the first bit of
//! each chunk in the most significant of those positions. Higher-order bits
//! are never touched.
//!
//! Embed and extract both address the carrier through [`bit_slot`], so the
//! ordering cannot drift between the two directions.

use crate::stego::config::EmbeddingConfig;
use crate::stego::error::StegoError;

/// Number of carrier bytes selected by `stride`.
pub fn usable_bytes(carrier_len: usize, stride: usize) -> usize {
    carrier_len.checked_div(stride).unwrap_or(0)
}

/// Maximum number of bits the carrier can hold under `config`.
///
/// Pure: depends only on the carrier length and the configuration.
pub fn capacity_bits(carrier_len: usize, config: &EmbeddingConfig) -> usize {
    usable_bytes(carrier_len, config.stride) * config.bits_per_byte as usize
}

/// Carrier byte index and bit shift holding the `bit_index`-th channel bit.
#[inline]
fn bit_slot(bit_index: usize, config: &EmbeddingConfig) -> (usize, u32) {
    let bpb = config.bits_per_byte as usize;
    let byte = (bit_index / bpb) * config.stride;
    let shift = (bpb - 1 - bit_index % bpb) as u32;
    (byte, shift)
}

/// Write `bits` (values 0/1) into the carrier.
///
/// With `repeat_fill` the sequence is tiled until the whole capacity is
/// overwritten; the final tile is truncated. The first tile always sits where
/// a plain embed would put it, so extraction is unaffected.
///
/// Returns the number of channel bits written.
///
/// # Errors
/// - [`StegoError::UnsupportedConfiguration`] for an invalid `config`.
/// - [`StegoError::CapacityExceeded`] if `bits` does not fit. The carrier is
///   left untouched in that case.
pub fn embed(carrier: &mut [u8], bits: &[u8], config: &EmbeddingConfig) -> Result<usize, StegoError> {
    config.validate()?;
    let capacity = capacity_bits(carrier.len(), config);
    if bits.len() > capacity {
        return Err(StegoError::CapacityExceeded {
            needed_bits: bits.len(),
            capacity_bits: capacity,
        });
    }

    let total = if config.repeat_fill && !bits.is_empty() { capacity } else { bits.len() };
    for i in 0..total {
        let bit = bits[i % bits.len()] & 1;
        let (byte, shift) = bit_slot(i, config);
        carrier[byte] = (carrier[byte] & !(1u8 << shift)) | (bit << shift);
    }
    Ok(total)
}

/// Read the first `num_bits` channel bits back out of the carrier.
///
/// # Errors
/// - [`StegoError::UnsupportedConfiguration`] for an invalid `config`.
/// - [`StegoError::InsufficientCarrier`] if `num_bits` exceeds the capacity.
pub fn extract(carrier: &[u8], num_bits: usize, config: &EmbeddingConfig) -> Result<Vec<u8>, StegoError> {
    config.validate()?;
    let capacity = capacity_bits(carrier.len(), config);
    if num_bits > capacity {
        return Err(StegoError::InsufficientCarrier {
            requested_bits: num_bits,
            capacity_bits: capacity,
        });
    }

    Ok((0..num_bits)
        .map(|i| {
            let (byte, shift) = bit_slot(i, config);
            (carrier[byte] >> shift) & 1
        })
        .collect())
}
