// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # wavsteg-core
//!
//! LSB steganography for WAV audio. A message is optionally encrypted,
//! protected with an error-correcting code, prefixed with a length header
//! and written into the low-order bits of the PCM sample bytes.
//!
//! - The WAV container codec (`wav` module) is zero-dependency (std only).
//! - The steganography layer (`stego` module) offers Fernet, AES-256-GCM-SIV
//!   and hybrid RSA-OAEP encryption with PBKDF2, scrypt or Argon2id key
//!   derivation, and Hamming or Reed-Solomon error correction.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use wavsteg_core::{encode_wav, decode_wav, StegoConfig};
//!
//! let cover = std::fs::read("cover.wav").unwrap();
//! let config = StegoConfig::default();
//! let stego = encode_wav(&cover, b"My secret!", &config).unwrap();
//! assert_eq!(decode_wav(&stego, &config).unwrap(), b"My secret!");
//! ```

pub mod stego;
pub mod wav;

pub use stego::{decode, decode_wav, encode, encode_wav, validate, EmbedReport};
pub use stego::{capacity_bits, max_message_len, Direction};
pub use stego::{EccConfig, EmbeddingConfig, Encryption, Hashing, KeyMaterial, SecurityConfig, StegoConfig, StegoError};
pub use wav::error::WavError;
pub use wav::{WavFile, WavFormat};
