// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Capacity planning.
//!
//! The channel capacity of a carrier is fixed by its length and the
//! [`EmbeddingConfig`](crate::stego::config::EmbeddingConfig). How much of it
//! a plaintext message may use depends on everything stacked on top:
//! - the 32-bit length header
//! - cipher overhead (salt, nonce, tag, Fernet token framing, wrapped RSA key)
//! - ECC expansion

use crate::stego::config::StegoConfig;
use crate::stego::error::StegoError;
use crate::stego::frame;

pub use crate::stego::channel::capacity_bits;

/// Channel bits a `message_len`-byte message occupies under `config`.
///
/// # Errors
/// [`StegoError::UnsupportedConfiguration`] if the ECC or cipher settings
/// are invalid, or the length overflows.
pub fn framed_bits(message_len: usize, config: &StegoConfig) -> Result<usize, StegoError> {
    let sealed = config.security.sealed_len(message_len)?;
    let encoded = config.ecc.encoded_len(sealed)?;
    frame::frame_bits(encoded).ok_or(StegoError::UnsupportedConfiguration("message length overflows"))
}

/// Largest plaintext length in bytes that still fits into a carrier of
/// `carrier_len` bytes.
///
/// # Errors
/// - [`StegoError::UnsupportedConfiguration`] for invalid settings.
/// - [`StegoError::CapacityExceeded`] if not even an empty message fits.
pub fn max_message_len(carrier_len: usize, config: &StegoConfig) -> Result<usize, StegoError> {
    config.embedding.validate()?;
    let capacity = capacity_bits(carrier_len, &config.embedding);

    let empty = framed_bits(0, config)?;
    if empty > capacity {
        return Err(StegoError::CapacityExceeded { needed_bits: empty, capacity_bits: capacity });
    }

    // Framed size grows monotonically with the message, so bisect.
    let mut lo = 0usize;
    let mut hi = capacity / 8;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        match framed_bits(mid, config) {
            Ok(bits) if bits <= capacity => lo = mid,
            _ => hi = mid - 1,
        }
    }
    Ok(lo)
}
