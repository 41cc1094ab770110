// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error-correcting codes applied between encryption and embedding.
//!
//! [`EccConfig`] selects one of:
//!
//! - **None**: identity in both directions.
//! - **Hamming** ([`hamming`]): corrects one flipped bit per block.
//! - **Reed-Solomon** ([`reed_solomon`]): corrects up to `floor(p / 2)`
//!   corrupted bytes per 255-byte codeword.
//!
//! Blocks and codewords are independent. With the `parallel` feature they
//! are processed on the rayon thread pool; output order is unchanged.

pub mod hamming;
pub mod reed_solomon;

use crate::stego::config::EccConfig;
use crate::stego::error::StegoError;

use hamming::Hamming;
use reed_solomon::ReedSolomon;

/// Apply `f` to each `size`-element chunk of `data`, preserving order.
#[cfg(feature = "parallel")]
pub(crate) fn map_chunks<T, R, F>(data: &[T], size: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &[T]) -> R + Sync + Send,
{
    use rayon::prelude::*;
    data.par_chunks(size).enumerate().map(|(i, chunk)| f(i, chunk)).collect()
}

/// Apply `f` to each `size`-element chunk of `data`, preserving order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn map_chunks<T, R, F>(data: &[T], size: usize, f: F) -> Vec<R>
where
    F: Fn(usize, &[T]) -> R,
{
    data.chunks(size).enumerate().map(|(i, chunk)| f(i, chunk)).collect()
}

/// Result of an ECC decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EccDecoded {
    pub data: Vec<u8>,
    /// Corrections applied: flipped bits for Hamming (one per corrected
    /// block), symbol errors for Reed-Solomon.
    pub corrected: usize,
}

/// Instantiated code for one call.
enum Codec {
    Identity,
    Hamming(Hamming),
    ReedSolomon(ReedSolomon),
}

impl EccConfig {
    fn codec(&self) -> Result<Codec, StegoError> {
        Ok(match *self {
            EccConfig::None => Codec::Identity,
            EccConfig::Hamming { redundant_bits } => Codec::Hamming(Hamming::new(redundant_bits)?),
            EccConfig::ReedSolomon { parity_symbols } => {
                Codec::ReedSolomon(ReedSolomon::new(parity_symbols as usize)?)
            }
        })
    }

    /// # Errors
    /// [`StegoError::UnsupportedConfiguration`] for an out-of-range parameter.
    pub fn validate(&self) -> Result<(), StegoError> {
        self.codec().map(|_| ())
    }

    /// Add redundancy to `data`.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>, StegoError> {
        Ok(match self.codec()? {
            Codec::Identity => data.to_vec(),
            Codec::Hamming(code) => code.encode(data),
            Codec::ReedSolomon(code) => code.encode(data),
        })
    }

    /// Correct and strip redundancy.
    ///
    /// # Errors
    /// [`StegoError::UncorrectableBlock`] if any block exceeds the code's
    /// correction bound. No partial data is returned.
    pub fn decode(&self, encoded: &[u8]) -> Result<EccDecoded, StegoError> {
        Ok(match self.codec()? {
            Codec::Identity => EccDecoded { data: encoded.to_vec(), corrected: 0 },
            Codec::Hamming(code) => {
                let (data, stats) = code.decode(encoded)?;
                EccDecoded { data, corrected: stats.corrected_blocks }
            }
            Codec::ReedSolomon(code) => {
                let (data, stats) = code.decode(encoded)?;
                EccDecoded { data, corrected: stats.total_errors }
            }
        })
    }

    /// Encoded length for `data_len` input bytes.
    pub fn encoded_len(&self, data_len: usize) -> Result<usize, StegoError> {
        Ok(match self.codec()? {
            Codec::Identity => data_len,
            Codec::Hamming(code) => code.encoded_len(data_len),
            Codec::ReedSolomon(code) => code.encoded_len(data_len),
        })
    }

    /// Input length that encodes to exactly `encoded_len` bytes.
    pub fn decoded_len(&self, encoded_len: usize) -> Result<usize, StegoError> {
        match self.codec()? {
            Codec::Identity => Ok(encoded_len),
            Codec::Hamming(code) => code.decoded_len(encoded_len),
            Codec::ReedSolomon(code) => code.decoded_len(encoded_len),
        }
    }
}
