// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Configuration types for one encode or decode call.
//!
//! The selectable parts (embedding layout, ECC, cipher, key derivation) are
//! plain serde-enabled values so a caller can keep them in a JSON or TOML
//! file. Key material is held separately in [`KeyMaterial`] and is never
//! serialized.

use core::fmt;

use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::stego::error::StegoError;

/// Default number of low-order bits overwritten per carrier byte.
pub const DEFAULT_BITS_PER_BYTE: u8 = 2;

/// Default PBKDF2-HMAC-SHA256 iteration count.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Default scrypt cost parameters (N = 2^14, r = 8, p = 1).
pub const DEFAULT_SCRYPT_LOG_N: u8 = 14;
pub const DEFAULT_SCRYPT_R: u32 = 8;
pub const DEFAULT_SCRYPT_P: u32 = 1;

/// Which carrier bytes are used and how many of their bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Low-order bits overwritten in each selected byte (1..=8).
    pub bits_per_byte: u8,
    /// Use every `stride`-th carrier byte, starting at byte 0.
    pub stride: usize,
    /// Tile the frame over the whole capacity instead of stopping after it.
    pub repeat_fill: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            bits_per_byte: DEFAULT_BITS_PER_BYTE,
            stride: 1,
            repeat_fill: false,
        }
    }
}

impl EmbeddingConfig {
    pub fn new(bits_per_byte: u8, stride: usize) -> Self {
        Self {
            bits_per_byte,
            stride,
            repeat_fill: false,
        }
    }

    pub fn with_repeat_fill(mut self, repeat_fill: bool) -> Self {
        self.repeat_fill = repeat_fill;
        self
    }

    /// # Errors
    /// [`StegoError::UnsupportedConfiguration`] if `bits_per_byte` is outside
    /// 1..=8 or `stride` is zero.
    pub fn validate(&self) -> Result<(), StegoError> {
        if !(1..=8).contains(&self.bits_per_byte) {
            return Err(StegoError::UnsupportedConfiguration("bits_per_byte must be in 1..=8"));
        }
        if self.stride == 0 {
            return Err(StegoError::UnsupportedConfiguration("stride must be at least 1"));
        }
        Ok(())
    }
}

/// Error-correcting code applied to the payload before embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EccConfig {
    #[default]
    None,
    /// Single-error-correcting Hamming code with `redundant_bits` parity
    /// bits per full block.
    Hamming { redundant_bits: u8 },
    /// Reed-Solomon over GF(2^8) with `parity_symbols` parity bytes per
    /// codeword.
    ReedSolomon { parity_symbols: u8 },
}

/// Cipher applied to the message before error correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encryption {
    #[default]
    None,
    /// Fernet tokens (AES-128-CBC + HMAC-SHA256).
    Fernet,
    /// AES-256-GCM-SIV.
    Aes,
    /// RSA-OAEP key wrap around an AES-256-GCM-SIV body.
    Rsa,
}

impl Encryption {
    /// Symmetric ciphers need a 32-byte key (derived or raw).
    pub fn is_symmetric(self) -> bool {
        matches!(self, Self::Fernet | Self::Aes)
    }
}

/// Password-based key derivation for the symmetric ciphers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hashing {
    #[default]
    None,
    Pbkdf2 { iterations: u32 },
    Scrypt { log_n: u8, r: u32, p: u32 },
    Argon2id,
}

impl Hashing {
    pub fn pbkdf2() -> Self {
        Self::Pbkdf2 { iterations: DEFAULT_PBKDF2_ITERATIONS }
    }

    pub fn scrypt() -> Self {
        Self::Scrypt {
            log_n: DEFAULT_SCRYPT_LOG_N,
            r: DEFAULT_SCRYPT_R,
            p: DEFAULT_SCRYPT_P,
        }
    }
}

/// Secrets supplied by the caller. Which fields are needed depends on the
/// selected [`Encryption`] and [`Hashing`].
#[derive(Clone, Default)]
pub struct KeyMaterial {
    /// Password fed to the key derivation function.
    pub password: Option<Zeroizing<String>>,
    /// Raw symmetric key, used when no key derivation is selected.
    pub raw_key: Option<Zeroizing<[u8; 32]>>,
    /// Recipient key for RSA encryption.
    pub rsa_public: Option<RsaPublicKey>,
    /// Own key for RSA decryption.
    pub rsa_private: Option<RsaPrivateKey>,
}

impl KeyMaterial {
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(Zeroizing::new(password.to_owned()));
        self
    }

    pub fn with_raw_key(mut self, key: [u8; 32]) -> Self {
        self.raw_key = Some(Zeroizing::new(key));
        self
    }

    pub fn with_rsa_public(mut self, key: RsaPublicKey) -> Self {
        self.rsa_public = Some(key);
        self
    }

    pub fn with_rsa_private(mut self, key: RsaPrivateKey) -> Self {
        self.rsa_private = Some(key);
        self
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("raw_key", &self.raw_key.as_ref().map(|_| "<redacted>"))
            .field("rsa_public", &self.rsa_public.is_some())
            .field("rsa_private", &self.rsa_private.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Cipher, key derivation and the keys they run with.
#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    pub encryption: Encryption,
    pub hashing: Hashing,
    pub keys: KeyMaterial,
}

/// Everything one encode or decode call needs besides the carrier.
#[derive(Debug, Clone, Default)]
pub struct StegoConfig {
    pub embedding: EmbeddingConfig,
    pub ecc: EccConfig,
    pub security: SecurityConfig,
}

impl StegoConfig {
    pub fn with_embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.embedding = embedding;
        self
    }

    pub fn with_ecc(mut self, ecc: EccConfig) -> Self {
        self.ecc = ecc;
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }
}
