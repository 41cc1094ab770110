// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Example: hide a message in a WAV file and read it back.
use std::fs;

use wavsteg_core::{
    decode_wav, encode_wav, max_message_len, EccConfig, Encryption, Hashing, KeyMaterial, SecurityConfig,
    StegoConfig, WavFile,
};

fn config(password: &str) -> StegoConfig {
    StegoConfig::default()
        .with_ecc(EccConfig::ReedSolomon { parity_symbols: 8 })
        .with_security(SecurityConfig {
            encryption: Encryption::Aes,
            hashing: Hashing::pbkdf2(),
            keys: KeyMaterial::default().with_password(password),
        })
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: wav_roundtrip <input.wav> <message> <password> [output.wav]");
        eprintln!("       wav_roundtrip --decode <stego.wav> <password>");
        std::process::exit(1);
    }

    if args[1] == "--decode" {
        let stego = fs::read(&args[2]).expect("Could not read stego WAV");
        match decode_wav(&stego, &config(&args[3])) {
            Ok(message) => println!("Decoded message: {}", String::from_utf8_lossy(&message)),
            Err(e) => eprintln!("Decode failed: {e}"),
        }
        return;
    }

    let cover = fs::read(&args[1]).expect("Could not read cover WAV");
    let config = config(&args[3]);
    let wav = WavFile::from_bytes(&cover).expect("Not a PCM WAV file");
    println!(
        "Cover: {} ch, {} Hz, {} bit, {:.1}s",
        wav.format().channels,
        wav.format().sample_rate,
        wav.format().bits_per_sample,
        wav.duration_secs()
    );
    match max_message_len(wav.samples().len(), &config) {
        Ok(max) => println!("Capacity: {max} bytes"),
        Err(e) => eprintln!("Capacity unknown: {e}"),
    }

    let stego = match encode_wav(&cover, args[2].as_bytes(), &config) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Encode failed: {e}");
            std::process::exit(1);
        }
    };
    let output = args.get(4).map(String::as_str).unwrap_or("stego.wav");
    fs::write(output, &stego).expect("Could not write output");
    println!("Wrote {output} ({} bytes)", stego.len());

    let decoded = decode_wav(&stego, &config).expect("Round-trip decode failed");
    assert_eq!(decoded, args[2].as_bytes());
    println!("Round-trip OK");
}
