// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic encoding and decoding over a flat carrier byte buffer.
//!
//! Layers, leaf-first:
//!
//! - **Bit channel** (`channel`): maps a bit sequence onto the low
//!   `bits_per_byte` bits of every `stride`-th carrier byte. One shared
//!   position function serves both directions.
//!
//! - **Error correction** (`ecc`): Hamming (single-bit correction per block)
//!   or Reed-Solomon over GF(2^8) (`p/2` symbol errors per codeword).
//!
//! - **Pipeline** (`pipeline`): key derivation, encryption, ECC, the 32-bit
//!   length frame and embedding, in that order; decode mirrors it exactly.

pub mod capacity;
pub mod channel;
pub mod config;
pub mod crypto;
pub mod ecc;
pub mod error;
pub mod frame;
mod pipeline;

pub use error::StegoError;

pub use capacity::{capacity_bits, max_message_len};
pub use config::{EccConfig, EmbeddingConfig, Encryption, Hashing, KeyMaterial, SecurityConfig, StegoConfig};
pub use crypto::Direction;
pub use pipeline::{decode, decode_wav, encode, encode_wav, validate, EmbedReport};
