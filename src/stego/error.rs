// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers all failure modes from WAV parsing through
//! error correction and encryption. Decode either returns the exact
//! message or one of these; there is no best-effort result.

use core::fmt;

/// Errors that can occur during steganographic encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The carrier could not be parsed as a valid PCM WAV file.
    InvalidWav(crate::wav::error::WavError),
    /// The framed payload does not fit into the carrier. Reported before
    /// any carrier byte is modified.
    CapacityExceeded { needed_bits: usize, capacity_bits: usize },
    /// More bits were requested from the carrier than it can hold.
    InsufficientCarrier { requested_bits: usize, capacity_bits: usize },
    /// An ECC block or codeword carries more corruption than the code can
    /// correct (or is structurally malformed).
    UncorrectableBlock { block: usize },
    /// Invalid parameter or key combination, rejected before any work.
    UnsupportedConfiguration(&'static str),
    /// Encryption or decryption failed (wrong key or corrupted ciphertext).
    EncryptionError(&'static str),
    /// Key derivation rejected its parameters.
    KeyDerivationError(&'static str),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWav(e) => write!(f, "invalid WAV: {e}"),
            Self::CapacityExceeded { needed_bits, capacity_bits } => write!(
                f,
                "message too large for this carrier ({needed_bits} bits needed, {capacity_bits} available)"
            ),
            Self::InsufficientCarrier { requested_bits, capacity_bits } => write!(
                f,
                "carrier holds {capacity_bits} bits, {requested_bits} requested"
            ),
            Self::UncorrectableBlock { block } => {
                write!(f, "error correction failed in block {block}")
            }
            Self::UnsupportedConfiguration(msg) => write!(f, "unsupported configuration: {msg}"),
            Self::EncryptionError(msg) => write!(f, "encryption error: {msg}"),
            Self::KeyDerivationError(msg) => write!(f, "key derivation error: {msg}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidWav(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::wav::error::WavError> for StegoError {
    fn from(e: crate::wav::error::WavError) -> Self {
        Self::InvalidWav(e)
    }
}
