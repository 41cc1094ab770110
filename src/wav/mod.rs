// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Pure-Rust RIFF/WAVE container codec (zero external dependencies).
//!
//! Reads a WAV file into its chunk list and exposes the `data` chunk as a
//! flat, mutable sample byte buffer. This is the carrier for steganographic
//! embedding, which operates directly on the little-endian PCM sample bytes
//! without decoding them into amplitudes.
//!
//! Supports:
//! - Integer PCM (`WAVE_FORMAT_PCM`) and `WAVE_FORMAT_EXTENSIBLE`
//! - Any channel count and sample width
//! - Unknown chunks (`LIST`, `bext`, `cue `, ...) preserved verbatim
//! - Byte-for-byte round-trip for unmodified files
//!
//! Does NOT support:
//! - Compressed formats (ADPCM, µ-law, ...) -- rejected at parse time
//! - RF64 / files over 4 GiB

pub mod chunk;
pub mod error;

use chunk::{Chunk, DATA, FMT, FORMAT_PCM, PREAMBLE_LEN, RIFF, WAVE};
pub use chunk::WavFormat;
use error::{Result, WavError};

/// A parsed WAV file providing access to the raw sample bytes.
///
/// Created with [`WavFile::from_bytes`]. After modifying the samples through
/// [`WavFile::samples_mut`], call [`WavFile::to_bytes`] to serialize. The
/// chunk layout never changes size, so every other byte is written back
/// exactly as it was read.
#[derive(Debug, Clone)]
pub struct WavFile {
    format: WavFormat,
    /// RIFF size as declared in the input (kept for exact round-trip).
    riff_size: u32,
    chunks: Vec<Chunk>,
    /// Index of the `data` chunk within `chunks`.
    data_index: usize,
    trailing: Vec<u8>,
}

impl WavFile {
    /// Parse a WAV file from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let riff_size = chunk::parse_preamble(data)?;
        let (chunks, trailing) = chunk::iterate_chunks(data)?;

        let fmt = chunks
            .iter()
            .find(|c| c.id == FMT)
            .ok_or(WavError::MissingChunk("fmt "))?;
        let format = chunk::parse_fmt(&fmt.data)?;

        let data_index = chunks
            .iter()
            .position(|c| c.id == DATA)
            .ok_or(WavError::MissingChunk("data"))?;

        Ok(Self {
            format,
            riff_size,
            chunks,
            data_index,
            trailing,
        })
    }

    /// Build a canonical 44-byte-header PCM file around `samples`.
    pub fn new_pcm(channels: u16, sample_rate: u32, bits_per_sample: u16, samples: Vec<u8>) -> Self {
        let block_align = channels * bits_per_sample.div_ceil(8);
        let format = WavFormat {
            format_tag: FORMAT_PCM,
            channels,
            sample_rate,
            byte_rate: sample_rate * u32::from(block_align),
            block_align,
            bits_per_sample,
        };

        let mut fmt_body = Vec::with_capacity(16);
        fmt_body.extend_from_slice(&format.format_tag.to_le_bytes());
        fmt_body.extend_from_slice(&format.channels.to_le_bytes());
        fmt_body.extend_from_slice(&format.sample_rate.to_le_bytes());
        fmt_body.extend_from_slice(&format.byte_rate.to_le_bytes());
        fmt_body.extend_from_slice(&format.block_align.to_le_bytes());
        fmt_body.extend_from_slice(&format.bits_per_sample.to_le_bytes());

        let pad = (samples.len() % 2 == 1).then_some(0u8);
        let chunks = vec![
            Chunk { id: FMT, data: fmt_body, pad: None },
            Chunk { id: DATA, data: samples, pad },
        ];
        let riff_size = (4 + chunks.iter().map(Chunk::encoded_len).sum::<usize>()) as u32;

        Self {
            format,
            riff_size,
            chunks,
            data_index: 1,
            trailing: Vec::new(),
        }
    }

    /// Serialize the file back to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body_len: usize = self.chunks.iter().map(Chunk::encoded_len).sum();
        let mut out = Vec::with_capacity(PREAMBLE_LEN + body_len + self.trailing.len());
        out.extend_from_slice(&RIFF);
        out.extend_from_slice(&self.riff_size.to_le_bytes());
        out.extend_from_slice(&WAVE);
        for chunk in &self.chunks {
            chunk.write_to(&mut out);
        }
        out.extend_from_slice(&self.trailing);
        out
    }

    pub fn format(&self) -> &WavFormat {
        &self.format
    }

    /// The raw sample bytes of the `data` chunk.
    pub fn samples(&self) -> &[u8] {
        &self.chunks[self.data_index].data
    }

    /// Mutable access to the sample bytes. The length cannot change.
    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.chunks[self.data_index].data
    }

    /// Number of sample frames (one sample per channel each).
    pub fn num_frames(&self) -> usize {
        self.samples().len() / usize::from(self.format.block_align)
    }

    /// Playback duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.format.sample_rate == 0 {
            return 0.0;
        }
        self.num_frames() as f64 / f64::from(self.format.sample_rate)
    }
}
