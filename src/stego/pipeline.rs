// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Encode and decode orchestration.
//!
//! Encode: validate → derive key → encrypt → ECC encode → frame → embed.
//! Decode runs the same stages in reverse: extract header → extract frame →
//! ECC decode → derive key → decrypt.

use tracing::debug;

use crate::stego::capacity::framed_bits;
use crate::stego::channel::{self, capacity_bits};
use crate::stego::config::StegoConfig;
use crate::stego::crypto::Direction;
use crate::stego::error::StegoError;
use crate::stego::frame::{self, HEADER_BITS};
use crate::wav::WavFile;

/// Summary of one [`encode`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    /// Bits in the frame (header plus post-ECC payload).
    pub frame_bits: usize,
    /// Channel capacity of the carrier in bits.
    pub capacity_bits: usize,
    /// Post-ECC payload length in bytes, as written to the header.
    pub payload_len: usize,
    /// How many times the frame was written (more than 1 only in fill mode;
    /// the last tile may be partial).
    pub tiles: usize,
}

/// Check `config` against a carrier of `carrier_len` bytes before any work.
///
/// # Errors
/// [`StegoError::UnsupportedConfiguration`] if a parameter is out of range,
/// a required key is missing, or the carrier cannot hold even an empty frame.
pub fn validate(carrier_len: usize, config: &StegoConfig, direction: Direction) -> Result<(), StegoError> {
    config.embedding.validate()?;
    config.ecc.validate()?;
    config.security.validate(direction)?;

    let capacity = capacity_bits(carrier_len, &config.embedding);
    if capacity < framed_bits(0, config)? {
        return Err(StegoError::UnsupportedConfiguration(
            "carrier too small for the frame header",
        ));
    }
    Ok(())
}

/// Hide `message` in `carrier` in place.
///
/// The carrier is untouched unless the call succeeds.
///
/// # Errors
/// - [`StegoError::UnsupportedConfiguration`] from [`validate`].
/// - [`StegoError::CapacityExceeded`] if the framed message does not fit.
/// - [`StegoError::EncryptionError`] / [`StegoError::KeyDerivationError`]
///   from the security providers.
pub fn encode(carrier: &mut [u8], message: &[u8], config: &StegoConfig) -> Result<EmbedReport, StegoError> {
    validate(carrier.len(), config, Direction::Encode)?;

    let capacity = capacity_bits(carrier.len(), &config.embedding);
    let needed = framed_bits(message.len(), config)?;
    if needed > capacity {
        return Err(StegoError::CapacityExceeded { needed_bits: needed, capacity_bits: capacity });
    }
    debug!(message_len = message.len(), capacity_bits = capacity, needed_bits = needed, "encode");

    let sealed = config.security.seal(message)?;
    debug!(encryption = ?config.security.encryption, hashing = ?config.security.hashing, sealed_len = sealed.len(), "sealed");

    let encoded = config.ecc.encode(&sealed)?;
    debug!(ecc = ?config.ecc, encoded_len = encoded.len(), "ecc encoded");

    let bits = frame::bytes_to_bits(&frame::build_frame(&encoded)?);
    let written = channel::embed(carrier, &bits, &config.embedding)?;
    let tiles = written.div_ceil(bits.len());
    debug!(frame_bits = bits.len(), written_bits = written, tiles, "embedded");

    Ok(EmbedReport {
        frame_bits: bits.len(),
        capacity_bits: capacity,
        payload_len: encoded.len(),
        tiles,
    })
}

/// Recover the message hidden in `carrier`.
///
/// Returns the exact message or an error, never a partial result.
///
/// # Errors
/// - [`StegoError::UnsupportedConfiguration`] from [`validate`].
/// - [`StegoError::InsufficientCarrier`] if the header claims more bytes
///   than the carrier holds.
/// - [`StegoError::UncorrectableBlock`] if ECC cannot repair the payload.
/// - [`StegoError::EncryptionError`] / [`StegoError::KeyDerivationError`].
pub fn decode(carrier: &[u8], config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    validate(carrier.len(), config, Direction::Decode)?;
    let capacity = capacity_bits(carrier.len(), &config.embedding);

    let header = channel::extract(carrier, HEADER_BITS, &config.embedding)?;
    let payload_len = frame::parse_header(&header)?;
    let total_bits = frame::frame_bits(payload_len).ok_or(StegoError::InsufficientCarrier {
        requested_bits: usize::MAX,
        capacity_bits: capacity,
    })?;
    debug!(payload_len, total_bits, capacity_bits = capacity, "decode header");

    let bits = channel::extract(carrier, total_bits, &config.embedding)?;
    let encoded = frame::bits_to_bytes(&bits[HEADER_BITS..]);

    let decoded = config.ecc.decode(&encoded)?;
    debug!(ecc = ?config.ecc, sealed_len = decoded.data.len(), corrected = decoded.corrected, "ecc decoded");

    let message = config.security.open(&decoded.data)?;
    debug!(message_len = message.len(), "decoded");
    Ok(message)
}

/// Parse a WAV file, hide `message` in its samples and serialize it again.
///
/// # Errors
/// [`StegoError::InvalidWav`] plus everything [`encode`] returns.
pub fn encode_wav(wav_bytes: &[u8], message: &[u8], config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    let mut wav = WavFile::from_bytes(wav_bytes)?;
    let report = encode(wav.samples_mut(), message, config)?;
    debug!(
        channels = wav.format().channels,
        bits_per_sample = wav.format().bits_per_sample,
        frame_bits = report.frame_bits,
        "encoded WAV"
    );
    Ok(wav.to_bytes())
}

/// Parse a WAV file and recover the message hidden in its samples.
///
/// # Errors
/// [`StegoError::InvalidWav`] plus everything [`decode`] returns.
pub fn decode_wav(wav_bytes: &[u8], config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    let wav = WavFile::from_bytes(wav_bytes)?;
    decode(wav.samples(), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::config::{EccConfig, EmbeddingConfig, Encryption, SecurityConfig};

    #[test]
    fn my_secret_example() {
        let mut carrier = vec![0x55u8; 100_000];
        let config = StegoConfig::default();
        let report = encode(&mut carrier, b"My secret!", &config).unwrap();
        assert_eq!(report.capacity_bits, 200_000);
        assert_eq!(report.frame_bits, 14 * 8);
        assert_eq!(report.payload_len, 10);
        assert_eq!(report.tiles, 1);
        assert_eq!(decode(&carrier, &config).unwrap(), b"My secret!");
    }

    #[test]
    fn oversized_message_leaves_carrier_untouched() {
        let mut carrier: Vec<u8> = (0..64u8).collect();
        let before = carrier.clone();
        // 64 bytes * 2 bits = 128 bits; header 32 + 13 * 8 = 136.
        let err = encode(&mut carrier, &[0xAA; 13], &StegoConfig::default()).unwrap_err();
        assert_eq!(err, StegoError::CapacityExceeded { needed_bits: 136, capacity_bits: 128 });
        assert_eq!(carrier, before);
    }

    #[test]
    fn carrier_smaller_than_header_is_rejected() {
        let mut carrier = [0u8; 15];
        assert!(matches!(
            encode(&mut carrier, b"", &StegoConfig::default()),
            Err(StegoError::UnsupportedConfiguration(_))
        ));
        assert!(matches!(decode(&carrier, &StegoConfig::default()), Err(StegoError::UnsupportedConfiguration(_))));
    }

    #[test]
    fn empty_message_roundtrip() {
        let mut carrier = vec![0u8; 64];
        let config = StegoConfig::default().with_ecc(EccConfig::ReedSolomon { parity_symbols: 4 });
        encode(&mut carrier, b"", &config).unwrap();
        assert_eq!(decode(&carrier, &config).unwrap(), b"");
    }

    #[test]
    fn header_beyond_capacity() {
        // All-ones carrier: header reads 0xFFFF_FFFF.
        let carrier = vec![0xFFu8; 1_000];
        let err = decode(&carrier, &StegoConfig::default()).unwrap_err();
        assert!(matches!(err, StegoError::InsufficientCarrier { .. }));
    }

    #[test]
    fn fill_mode_reports_tiles() {
        let mut carrier = vec![0u8; 1_000];
        let config = StegoConfig::default().with_embedding(EmbeddingConfig::new(1, 1).with_repeat_fill(true));
        let report = encode(&mut carrier, b"abc", &config).unwrap();
        assert_eq!(report.frame_bits, 56);
        assert_eq!(report.tiles, 1_000usize.div_ceil(56));
        assert_eq!(decode(&carrier, &config).unwrap(), b"abc");
    }

    #[test]
    fn rsa_without_key_is_rejected_before_embedding() {
        let mut carrier = vec![0x11u8; 4_096];
        let before = carrier.clone();
        let config = StegoConfig::default().with_security(SecurityConfig {
            encryption: Encryption::Rsa,
            ..Default::default()
        });
        assert!(matches!(
            encode(&mut carrier, b"hi", &config),
            Err(StegoError::UnsupportedConfiguration(_))
        ));
        assert_eq!(carrier, before);
    }
}
