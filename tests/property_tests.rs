// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Property tests for bit ordering, ECC round-trips and the full pipeline.

use proptest::prelude::*;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use wavsteg_core::stego::channel::{capacity_bits, embed, extract};
use wavsteg_core::{decode, encode, max_message_len, EccConfig, EmbeddingConfig, StegoConfig};

fn embedding() -> impl Strategy<Value = EmbeddingConfig> {
    (1u8..=8, 1usize..=5).prop_map(|(bpb, stride)| EmbeddingConfig::new(bpb, stride))
}

fn ecc() -> impl Strategy<Value = EccConfig> {
    prop_oneof![
        Just(EccConfig::None),
        (4u8..=8).prop_map(|redundant_bits| EccConfig::Hamming { redundant_bits }),
        (1u8..=64).prop_map(|parity_symbols| EccConfig::ReedSolomon { parity_symbols }),
    ]
}

fn rng_seed() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whatever embed writes, extract reads back in the same order, and
    /// nothing outside the selected low bits changes.
    #[test]
    fn prop_embed_extract_order(
        cfg in embedding(),
        carrier in proptest::collection::vec(any::<u8>(), 0..600),
        bits in proptest::collection::vec(0u8..=1, 0..600),
    ) {
        let capacity = capacity_bits(carrier.len(), &cfg);
        let bits = &bits[..bits.len().min(capacity)];
        let mut stego = carrier.clone();

        let written = embed(&mut stego, bits, &cfg).unwrap();
        prop_assert_eq!(written, bits.len());
        prop_assert_eq!(extract(&stego, bits.len(), &cfg).unwrap(), bits.to_vec());

        let low_mask = if cfg.bits_per_byte == 8 { 0xFF } else { (1u8 << cfg.bits_per_byte) - 1 };
        for (i, (&before, &after)) in carrier.iter().zip(&stego).enumerate() {
            if i % cfg.stride == 0 {
                prop_assert_eq!(before & !low_mask, after & !low_mask);
            } else {
                prop_assert_eq!(before, after);
            }
        }
    }

    /// Fill mode writes the whole capacity and the prefix still extracts.
    #[test]
    fn prop_fill_prefix(
        cfg in embedding(),
        carrier in proptest::collection::vec(any::<u8>(), 1..400),
        bits in proptest::collection::vec(0u8..=1, 1..64),
    ) {
        let capacity = capacity_bits(carrier.len(), &cfg);
        prop_assume!(bits.len() <= capacity);
        let fill = cfg.with_repeat_fill(true);
        let mut stego = carrier;

        prop_assert_eq!(embed(&mut stego, &bits, &fill).unwrap(), capacity);
        let all = extract(&stego, capacity, &fill).unwrap();
        for (i, bit) in all.iter().enumerate() {
            prop_assert_eq!(*bit, bits[i % bits.len()]);
        }
    }

    #[test]
    fn prop_ecc_roundtrip(ecc in ecc(), data in proptest::collection::vec(any::<u8>(), 0..800)) {
        let encoded = ecc.encode(&data).unwrap();
        prop_assert_eq!(encoded.len(), ecc.encoded_len(data.len()).unwrap());
        prop_assert_eq!(ecc.decoded_len(encoded.len()).unwrap(), data.len());
        let decoded = ecc.decode(&encoded).unwrap();
        prop_assert_eq!(decoded.data, data);
        prop_assert_eq!(decoded.corrected, 0);
    }

    /// Any single flipped bit is repaired by Hamming.
    #[test]
    fn prop_hamming_single_flip(
        redundant_bits in 4u8..=8,
        data in proptest::collection::vec(any::<u8>(), 1..300),
        pick in any::<usize>(),
    ) {
        let ecc = EccConfig::Hamming { redundant_bits };
        let mut encoded = ecc.encode(&data).unwrap();
        let bit = pick % (encoded.len() * 8);
        encoded[bit / 8] ^= 0x80 >> (bit % 8);
        prop_assert_eq!(ecc.decode(&encoded).unwrap().data, data);
    }

    /// Up to `p / 2` symbol errors in a single codeword are repaired.
    #[test]
    fn prop_reed_solomon_within_bound(
        parity_symbols in 2u8..=32,
        data in proptest::collection::vec(any::<u8>(), 1..200),
        seed in rng_seed(),
    ) {
        let mut rng = ChaCha20Rng::from_seed(seed);
        let ecc = EccConfig::ReedSolomon { parity_symbols };
        let mut encoded = ecc.encode(&data).unwrap();
        prop_assume!(encoded.len() <= 255);

        let errors = rng.gen_range(0..=usize::from(parity_symbols) / 2);
        for i in sample(&mut rng, encoded.len(), errors) {
            encoded[i] ^= rng.gen_range(1..=255u8);
        }
        let decoded = ecc.decode(&encoded).unwrap();
        prop_assert_eq!(decoded.data, data);
        prop_assert_eq!(decoded.corrected, errors);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pipeline_roundtrip(
        cfg in embedding(),
        ecc in ecc(),
        carrier in proptest::collection::vec(any::<u8>(), 2_000..4_000),
        message in proptest::collection::vec(any::<u8>(), 0..120),
    ) {
        let config = StegoConfig::default().with_embedding(cfg).with_ecc(ecc);
        let max = match max_message_len(carrier.len(), &config) {
            Ok(max) => max,
            Err(_) => return Ok(()),
        };
        let message = &message[..message.len().min(max)];

        let mut stego = carrier;
        encode(&mut stego, message, &config).unwrap();
        prop_assert_eq!(decode(&stego, &config).unwrap(), message.to_vec());
    }
}
