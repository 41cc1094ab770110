// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Round-trip integration tests over the embedding and ECC parameter grid.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use wavsteg_core::stego::frame;
use wavsteg_core::{
    capacity_bits, decode, encode, max_message_len, EccConfig, EmbeddingConfig, StegoConfig, StegoError,
};

fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut out = vec![0u8; len];
    rng.fill_bytes(&mut out);
    out
}

const ECC_GRID: [EccConfig; 3] = [
    EccConfig::None,
    EccConfig::Hamming { redundant_bits: 4 },
    EccConfig::ReedSolomon { parity_symbols: 4 },
];

#[test]
fn roundtrip_grid() {
    for bits_per_byte in [1u8, 2, 4, 8] {
        for stride in [1usize, 2, 4] {
            for ecc in ECC_GRID {
                let config = StegoConfig::default()
                    .with_embedding(EmbeddingConfig::new(bits_per_byte, stride))
                    .with_ecc(ecc);
                let cover = noise(8_192, u64::from(bits_per_byte) * 31 + stride as u64);
                let len = max_message_len(cover.len(), &config).unwrap().min(300);
                let message = noise(len, 7);

                let mut carrier = cover.clone();
                encode(&mut carrier, &message, &config).unwrap();
                let decoded = decode(&carrier, &config).unwrap();
                assert_eq!(decoded, message, "bpb={bits_per_byte} stride={stride} ecc={ecc:?}");
            }
        }
    }
}

#[test]
fn roundtrip_at_max_length() {
    for ecc in ECC_GRID {
        let config = StegoConfig::default().with_embedding(EmbeddingConfig::new(1, 3)).with_ecc(ecc);
        let mut carrier = noise(5_000, 11);
        let max = max_message_len(carrier.len(), &config).unwrap();
        let message = noise(max, 12);
        encode(&mut carrier, &message, &config).unwrap();
        assert_eq!(decode(&carrier, &config).unwrap(), message, "{ecc:?}");
    }
}

#[test]
fn high_bits_and_skipped_bytes_untouched() {
    let config = StegoConfig::default().with_embedding(EmbeddingConfig::new(3, 2));
    let cover = noise(2_000, 3);
    let mut carrier = cover.clone();
    encode(&mut carrier, b"only the low three bits", &config).unwrap();

    for (i, (&before, &after)) in cover.iter().zip(&carrier).enumerate() {
        if i % 2 == 0 {
            assert_eq!(before & !0b111, after & !0b111, "byte {i}");
        } else {
            assert_eq!(before, after, "byte {i}");
        }
    }
}

#[test]
fn exact_fit_succeeds_one_bit_more_fails() {
    let config = StegoConfig::default().with_embedding(EmbeddingConfig::new(1, 1));
    let message = b"My secret!";
    let needed = (4 + message.len()) * 8;

    let mut exact = vec![0u8; needed];
    let report = encode(&mut exact, message, &config).unwrap();
    assert_eq!(report.frame_bits, report.capacity_bits);
    assert_eq!(decode(&exact, &config).unwrap(), message);

    let mut short = vec![0u8; needed - 1];
    assert_eq!(
        encode(&mut short, message, &config),
        Err(StegoError::CapacityExceeded { needed_bits: needed, capacity_bits: needed - 1 })
    );
    assert!(short.iter().all(|&b| b == 0));
}

#[test]
fn my_secret_in_100k_bytes() {
    let config = StegoConfig::default();
    let mut carrier = noise(100_000, 42);
    assert_eq!(capacity_bits(carrier.len(), &config.embedding), 200_000);

    let report = encode(&mut carrier, b"My secret!", &config).unwrap();
    assert_eq!(report.frame_bits / 8, 14);
    assert_eq!(report.payload_len, 10);

    let decoded = decode(&carrier, &config).unwrap();
    assert_eq!(decoded, b"My secret!");
    assert_eq!(decoded.len(), 10);
}

#[test]
fn fill_mode_overwrites_whole_capacity() {
    let embedding = EmbeddingConfig::new(1, 1).with_repeat_fill(true);
    let config = StegoConfig::default().with_embedding(embedding);
    let message = b"fill me";

    let mut carrier = noise(1_001, 5);
    let report = encode(&mut carrier, message, &config).unwrap();

    let bits = frame::bytes_to_bits(&frame::build_frame(message).unwrap());
    assert_eq!(report.frame_bits, bits.len());
    for (i, byte) in carrier.iter().enumerate() {
        assert_eq!(byte & 1, bits[i % bits.len()], "bit {i}");
    }
    assert_eq!(decode(&carrier, &config).unwrap(), message);
}

#[test]
fn fill_mode_matches_plain_prefix() {
    let message = b"prefix";
    let plain = StegoConfig::default().with_embedding(EmbeddingConfig::new(2, 3));
    let fill = StegoConfig::default().with_embedding(EmbeddingConfig::new(2, 3).with_repeat_fill(true));

    let cover = noise(3_000, 8);
    let mut a = cover.clone();
    let mut b = cover;
    let report = encode(&mut a, message, &plain).unwrap();
    encode(&mut b, message, &fill).unwrap();

    // Bytes covered by the first frame are identical in both modes.
    let first_frame_bytes = report.frame_bits.div_ceil(2) * 3;
    assert_eq!(a[..first_frame_bytes], b[..first_frame_bytes]);
    assert_eq!(decode(&b, &fill).unwrap(), message);
}

#[test]
fn invalid_embedding_is_rejected() {
    let mut carrier = vec![0u8; 1_000];
    for embedding in [EmbeddingConfig::new(0, 1), EmbeddingConfig::new(9, 1), EmbeddingConfig::new(2, 0)] {
        let config = StegoConfig::default().with_embedding(embedding);
        assert!(matches!(
            encode(&mut carrier, b"x", &config),
            Err(StegoError::UnsupportedConfiguration(_))
        ));
    }
}
