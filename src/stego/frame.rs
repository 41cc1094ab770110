// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload frame construction and parsing.
//!
//! The frame is the only structure written into the carrier:
//!
//! ```text
//! [4 bytes ] payload length in bytes (big-endian u32)
//! [N bytes ] payload (after encryption and error correction)
//! ```
//!
//! The length counts the post-ECC bytes, so the decoder knows exactly how
//! many channel bits to read before running error correction.

use crate::stego::error::StegoError;

/// Width of the length header in bytes.
pub const HEADER_BYTES: usize = 4;

/// Width of the length header in bits.
pub const HEADER_BITS: usize = HEADER_BYTES * 8;

/// Total channel bits occupied by a frame around `payload_len` bytes.
pub fn frame_bits(payload_len: usize) -> Option<usize> {
    payload_len.checked_mul(8)?.checked_add(HEADER_BITS)
}

/// Prefix `payload` with its big-endian u32 length.
///
/// # Errors
/// Returns [`StegoError::UnsupportedConfiguration`] if the payload length
/// does not fit the 32-bit header.
pub fn build_frame(payload: &[u8]) -> Result<Vec<u8>, StegoError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| StegoError::UnsupportedConfiguration("payload exceeds 32-bit length header"))?;

    let mut frame = Vec::with_capacity(HEADER_BYTES + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Read the payload length from the first [`HEADER_BITS`] channel bits.
pub fn parse_header(bits: &[u8]) -> Result<usize, StegoError> {
    if bits.len() < HEADER_BITS {
        return Err(StegoError::InsufficientCarrier {
            requested_bits: HEADER_BITS,
            capacity_bits: bits.len(),
        });
    }
    let bytes = bits_to_bytes(&bits[..HEADER_BITS]);
    let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    Ok(len as usize)
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    bits
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len().div_ceil(8));
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_big_endian_byte_count() {
        let frame = build_frame(b"My secret!").unwrap();
        assert_eq!(&frame[..4], &[0, 0, 0, 10]);
        assert_eq!(&frame[4..], b"My secret!");
        assert_eq!(frame.len(), 14);
    }

    #[test]
    fn header_parses_back() {
        let frame = build_frame(&vec![0u8; 70_000]).unwrap();
        let bits = bytes_to_bits(&frame[..HEADER_BYTES]);
        assert_eq!(parse_header(&bits).unwrap(), 70_000);
    }

    #[test]
    fn short_header_rejected() {
        assert!(matches!(
            parse_header(&[0u8; 31]),
            Err(StegoError::InsufficientCarrier { requested_bits: 32, capacity_bits: 31 })
        ));
    }

    #[test]
    fn frame_bits_counts_header() {
        assert_eq!(frame_bits(0), Some(32));
        assert_eq!(frame_bits(10), Some(112));
        assert_eq!(frame_bits(usize::MAX), None);
    }

    #[test]
    fn bytes_bits_msb_first() {
        assert_eq!(bytes_to_bits(&[0xA1]), vec![1, 0, 1, 0, 0, 0, 0, 1]);
        assert_eq!(bits_to_bytes(&bytes_to_bits(&[0xDE, 0xAD])), vec![0xDE, 0xAD]);
    }

    #[test]
    fn bits_to_bytes_partial_byte() {
        // 10110_000 = 0xB0
        assert_eq!(bits_to_bytes(&[1, 0, 1, 1, 0]), vec![0xB0]);
    }
}
