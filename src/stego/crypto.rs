// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Encryption and key-derivation providers.
//!
//! Ciphers:
//!
//! - **Fernet**: token format (AES-128-CBC + HMAC-SHA256). The 32-byte key
//!   is base64url-encoded into a Fernet key.
//! - **AES**: AES-256-GCM-SIV, output `nonce(12) || ciphertext || tag(16)`.
//!   GCM-SIV stays safe if a random nonce ever repeats.
//! - **RSA**: RSA-OAEP(SHA-256) wraps a random content key, the body is
//!   sealed with AES-256-GCM-SIV under that key. Output
//!   `wrapped_key || nonce(12) || ciphertext || tag(16)`.
//!
//! Symmetric keys are either supplied raw or derived from a password with
//! PBKDF2-HMAC-SHA256, scrypt or Argon2id. A derived key uses a fresh random
//! salt per encode; the salt is prefixed to the ciphertext so the decoder
//! recovers it from the extracted payload.

use aes_gcm_siv::aead::Aead;
use aes_gcm_siv::{Aes256GcmSiv, KeyInit, Nonce};
use argon2::Argon2;
use base64::Engine;
use rand::RngCore;
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::stego::config::{Encryption, Hashing, KeyMaterial, SecurityConfig};
use crate::stego::error::StegoError;

/// Symmetric key length in bytes.
pub const KEY_LEN: usize = 32;
/// Key-derivation salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM-SIV nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM-SIV authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Fernet token fixed fields: version(1) + timestamp(8) + IV(16) + HMAC(32).
const FERNET_FIXED_LEN: usize = 1 + 8 + 16 + 32;

/// Which side of the pipeline a configuration is checked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

/// Key handed to [`Encryption::encrypt`] / [`Encryption::decrypt`].
pub enum CipherKey<'a> {
    Symmetric(&'a [u8; KEY_LEN]),
    RsaPublic(&'a RsaPublicKey),
    RsaPrivate(&'a RsaPrivateKey),
}

/// Fresh random salt for key derivation.
pub fn random_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

impl Hashing {
    /// Derive a 32-byte key from `password` and `salt`.
    ///
    /// # Errors
    /// [`StegoError::KeyDerivationError`] if no derivation is selected or the
    /// parameters are rejected.
    pub fn derive(&self, password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, StegoError> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        match *self {
            Hashing::None => {
                return Err(StegoError::KeyDerivationError("no key derivation selected"));
            }
            Hashing::Pbkdf2 { iterations } => {
                if iterations == 0 {
                    return Err(StegoError::KeyDerivationError("PBKDF2 needs at least one iteration"));
                }
                pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut *key);
            }
            Hashing::Scrypt { log_n, r, p } => {
                let params = scrypt::Params::new(log_n, r, p, KEY_LEN)
                    .map_err(|_| StegoError::KeyDerivationError("invalid scrypt parameters"))?;
                scrypt::scrypt(password, salt, &params, &mut *key)
                    .map_err(|_| StegoError::KeyDerivationError("invalid scrypt output length"))?;
            }
            Hashing::Argon2id => {
                Argon2::default()
                    .hash_password_into(password, salt, &mut *key)
                    .map_err(|_| StegoError::KeyDerivationError("Argon2 rejected its input"))?;
            }
        }
        Ok(key)
    }
}

fn aes_seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, StegoError> {
    let cipher = Aes256GcmSiv::new_from_slice(key)
        .map_err(|_| StegoError::EncryptionError("invalid AES key length"))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| StegoError::EncryptionError("AES-GCM-SIV encryption failed"))?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn aes_open(key: &[u8; KEY_LEN], sealed: &[u8]) -> Result<Vec<u8>, StegoError> {
    if sealed.len() < NONCE_LEN + TAG_LEN {
        return Err(StegoError::EncryptionError("ciphertext too short"));
    }
    let cipher = Aes256GcmSiv::new_from_slice(key)
        .map_err(|_| StegoError::EncryptionError("invalid AES key length"))?;
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| StegoError::EncryptionError("decryption failed (wrong key?)"))
}

fn fernet_for(key: &[u8; KEY_LEN]) -> Result<fernet::Fernet, StegoError> {
    let encoded = Zeroizing::new(base64::engine::general_purpose::URL_SAFE.encode(key));
    fernet::Fernet::new(&encoded).ok_or(StegoError::EncryptionError("invalid Fernet key"))
}

fn wrong_key() -> StegoError {
    StegoError::EncryptionError("key does not match the selected cipher")
}

impl Encryption {
    /// Encrypt `plaintext` under `key`.
    ///
    /// # Errors
    /// [`StegoError::EncryptionError`] if the key does not suit the cipher or
    /// the primitive fails.
    pub fn encrypt(&self, plaintext: &[u8], key: CipherKey<'_>) -> Result<Vec<u8>, StegoError> {
        match (self, key) {
            (Encryption::None, _) => Ok(plaintext.to_vec()),
            (Encryption::Aes, CipherKey::Symmetric(k)) => aes_seal(k, plaintext),
            (Encryption::Fernet, CipherKey::Symmetric(k)) => {
                Ok(fernet_for(k)?.encrypt(plaintext).into_bytes())
            }
            (Encryption::Rsa, CipherKey::RsaPublic(public)) => rsa_seal(public, plaintext),
            (Encryption::Rsa, CipherKey::RsaPrivate(private)) => {
                rsa_seal(&private.to_public_key(), plaintext)
            }
            _ => Err(wrong_key()),
        }
    }

    /// Decrypt `ciphertext` under `key`.
    ///
    /// # Errors
    /// [`StegoError::EncryptionError`] on a wrong key or tampered ciphertext.
    pub fn decrypt(&self, ciphertext: &[u8], key: CipherKey<'_>) -> Result<Vec<u8>, StegoError> {
        match (self, key) {
            (Encryption::None, _) => Ok(ciphertext.to_vec()),
            (Encryption::Aes, CipherKey::Symmetric(k)) => aes_open(k, ciphertext),
            (Encryption::Fernet, CipherKey::Symmetric(k)) => {
                let token = std::str::from_utf8(ciphertext)
                    .map_err(|_| StegoError::EncryptionError("Fernet token is not ASCII"))?;
                fernet_for(k)?
                    .decrypt(token)
                    .map_err(|_| StegoError::EncryptionError("Fernet token rejected (wrong key?)"))
            }
            (Encryption::Rsa, CipherKey::RsaPrivate(private)) => rsa_open(private, ciphertext),
            _ => Err(wrong_key()),
        }
    }

    /// Exact ciphertext length for `plain_len` bytes, or `None` if it
    /// depends on a key that is missing.
    pub fn ciphertext_len(&self, plain_len: usize, keys: &KeyMaterial) -> Option<usize> {
        match self {
            Encryption::None => Some(plain_len),
            Encryption::Aes => Some(NONCE_LEN + plain_len + TAG_LEN),
            Encryption::Fernet => {
                // PKCS#7 always adds 1..=16 bytes, then padded base64.
                let raw = FERNET_FIXED_LEN + 16 * (plain_len / 16 + 1);
                Some(raw.div_ceil(3) * 4)
            }
            Encryption::Rsa => {
                let modulus = keys
                    .rsa_public
                    .as_ref()
                    .map(|k| k.size())
                    .or_else(|| keys.rsa_private.as_ref().map(|k| k.size()))?;
                Some(modulus + NONCE_LEN + plain_len + TAG_LEN)
            }
        }
    }
}

fn rsa_seal(public: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, StegoError> {
    let mut rng = rand::thread_rng();
    let mut content_key = Zeroizing::new([0u8; KEY_LEN]);
    rng.fill_bytes(&mut *content_key);

    let wrapped = public
        .encrypt(&mut rng, Oaep::new::<Sha256>(), &*content_key)
        .map_err(|_| StegoError::EncryptionError("RSA key too small for OAEP key wrap"))?;
    let body = aes_seal(&content_key, plaintext)?;

    let mut out = Vec::with_capacity(wrapped.len() + body.len());
    out.extend_from_slice(&wrapped);
    out.extend_from_slice(&body);
    Ok(out)
}

fn rsa_open(private: &RsaPrivateKey, sealed: &[u8]) -> Result<Vec<u8>, StegoError> {
    let modulus = private.size();
    if sealed.len() < modulus + NONCE_LEN + TAG_LEN {
        return Err(StegoError::EncryptionError("ciphertext too short"));
    }
    let (wrapped, body) = sealed.split_at(modulus);

    let unwrapped = Zeroizing::new(
        private
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| StegoError::EncryptionError("RSA key unwrap failed (wrong key?)"))?,
    );
    let content_key: &[u8; KEY_LEN] = unwrapped
        .as_slice()
        .try_into()
        .map_err(|_| StegoError::EncryptionError("unexpected content key length"))?;
    aes_open(content_key, body)
}

impl SecurityConfig {
    fn derives_key(&self) -> bool {
        self.hashing != Hashing::None
    }

    /// Check that the selected cipher has the keys it needs.
    ///
    /// # Errors
    /// [`StegoError::UnsupportedConfiguration`] describing the missing piece.
    pub fn validate(&self, direction: Direction) -> Result<(), StegoError> {
        if self.derives_key() && !self.encryption.is_symmetric() {
            return Err(StegoError::UnsupportedConfiguration(
                "key derivation requires the Fernet or AES cipher",
            ));
        }
        let keys = &self.keys;
        match self.encryption {
            Encryption::None => Ok(()),
            Encryption::Fernet | Encryption::Aes => {
                if self.derives_key() && keys.password.is_none() {
                    Err(StegoError::UnsupportedConfiguration("key derivation needs a password"))
                } else if !self.derives_key() && keys.raw_key.is_none() {
                    Err(StegoError::UnsupportedConfiguration(
                        "symmetric cipher without key derivation needs a raw key",
                    ))
                } else {
                    Ok(())
                }
            }
            Encryption::Rsa => match direction {
                Direction::Encode if keys.rsa_public.is_none() && keys.rsa_private.is_none() => {
                    Err(StegoError::UnsupportedConfiguration("RSA encryption needs a public key"))
                }
                Direction::Decode if keys.rsa_private.is_none() => {
                    Err(StegoError::UnsupportedConfiguration("RSA decryption needs a private key"))
                }
                _ => Ok(()),
            },
        }
    }

    /// Symmetric key for this call: derived from the password with `salt`, or
    /// the raw key.
    fn symmetric_key(&self, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, StegoError> {
        if self.derives_key() {
            let password = self
                .keys
                .password
                .as_ref()
                .ok_or(StegoError::UnsupportedConfiguration("key derivation needs a password"))?;
            self.hashing.derive(password.as_bytes(), salt)
        } else {
            self.keys
                .raw_key
                .clone()
                .ok_or(StegoError::UnsupportedConfiguration("missing raw symmetric key"))
        }
    }

    /// Derive (if selected) and encrypt. The salt, when used, leads the output.
    pub fn seal(&self, message: &[u8]) -> Result<Vec<u8>, StegoError> {
        match self.encryption {
            Encryption::None => Ok(message.to_vec()),
            Encryption::Rsa => {
                let key = match (&self.keys.rsa_public, &self.keys.rsa_private) {
                    (Some(public), _) => CipherKey::RsaPublic(public),
                    (None, Some(private)) => CipherKey::RsaPrivate(private),
                    (None, None) => {
                        return Err(StegoError::UnsupportedConfiguration("RSA encryption needs a public key"))
                    }
                };
                self.encryption.encrypt(message, key)
            }
            Encryption::Fernet | Encryption::Aes => {
                let salt = if self.derives_key() { Some(random_salt()) } else { None };
                let key = self.symmetric_key(salt.as_ref().map_or(&[][..], |s| &s[..]))?;
                let ciphertext = self.encryption.encrypt(message, CipherKey::Symmetric(&key))?;

                let mut out = Vec::with_capacity(SALT_LEN + ciphertext.len());
                if let Some(salt) = salt {
                    out.extend_from_slice(&salt);
                }
                out.extend_from_slice(&ciphertext);
                Ok(out)
            }
        }
    }

    /// Inverse of [`seal`](Self::seal).
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, StegoError> {
        match self.encryption {
            Encryption::None => Ok(sealed.to_vec()),
            Encryption::Rsa => {
                let private = self
                    .keys
                    .rsa_private
                    .as_ref()
                    .ok_or(StegoError::UnsupportedConfiguration("RSA decryption needs a private key"))?;
                self.encryption.decrypt(sealed, CipherKey::RsaPrivate(private))
            }
            Encryption::Fernet | Encryption::Aes => {
                let (salt, ciphertext) = if self.derives_key() {
                    if sealed.len() < SALT_LEN {
                        return Err(StegoError::EncryptionError("payload shorter than its salt"));
                    }
                    sealed.split_at(SALT_LEN)
                } else {
                    (&[][..], sealed)
                };
                let key = self.symmetric_key(salt)?;
                self.encryption.decrypt(ciphertext, CipherKey::Symmetric(&key))
            }
        }
    }

    /// Length of [`seal`](Self::seal)'s output for `message_len` bytes.
    pub fn sealed_len(&self, message_len: usize) -> Result<usize, StegoError> {
        let body = self
            .encryption
            .ciphertext_len(message_len, &self.keys)
            .ok_or(StegoError::UnsupportedConfiguration("RSA encryption needs a public key"))?;
        Ok(if self.derives_key() { SALT_LEN + body } else { body })
    }
}
