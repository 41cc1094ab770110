// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! RIFF chunk iteration and the `fmt ` chunk parser.
//!
//! Walks the chunks following the `RIFF....WAVE` preamble, keeping every
//! chunk verbatim (including the word-alignment pad byte) so the container
//! can be written back unchanged.

use super::error::{Result, WavError};

pub const RIFF: [u8; 4] = *b"RIFF";
pub const WAVE: [u8; 4] = *b"WAVE";
pub const FMT: [u8; 4] = *b"fmt ";
pub const DATA: [u8; 4] = *b"data";

/// PCM integer samples.
pub const FORMAT_PCM: u16 = 0x0001;
/// WAVE_FORMAT_EXTENSIBLE (sub-format GUID follows the basic fields).
pub const FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Length of the `RIFF <size> WAVE` preamble.
pub const PREAMBLE_LEN: usize = 12;

/// A raw chunk preserving the original bytes.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Four-character chunk identifier.
    pub id: [u8; 4],
    /// Chunk body, NOT including the id, the size field or the pad byte.
    pub data: Vec<u8>,
    /// Pad byte following an odd-sized body, if present in the input.
    pub pad: Option<u8>,
}

impl Chunk {
    /// Number of bytes this chunk occupies when serialized.
    pub fn encoded_len(&self) -> usize {
        8 + self.data.len() + usize::from(self.pad.is_some())
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.data);
        if let Some(pad) = self.pad {
            out.push(pad);
        }
    }
}

fn read_u16(data: &[u8], pos: usize) -> Result<u16> {
    data.get(pos..pos + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(WavError::UnexpectedEof)
}

fn read_u32(data: &[u8], pos: usize) -> Result<u32> {
    data.get(pos..pos + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(WavError::UnexpectedEof)
}

/// Check the preamble and return the declared RIFF size.
pub fn parse_preamble(data: &[u8]) -> Result<u32> {
    if data.len() < PREAMBLE_LEN {
        return Err(WavError::UnexpectedEof);
    }
    if data[0..4] != RIFF || data[8..12] != WAVE {
        return Err(WavError::InvalidHeader);
    }
    read_u32(data, 4)
}

/// Split everything after the preamble into chunks.
///
/// Returns the chunks in file order plus any trailing bytes that do not form
/// a complete chunk header (some writers append junk after the last chunk).
pub fn iterate_chunks(data: &[u8]) -> Result<(Vec<Chunk>, Vec<u8>)> {
    let mut chunks = Vec::new();
    let mut pos = PREAMBLE_LEN;

    while pos + 8 <= data.len() {
        let mut id = [0u8; 4];
        id.copy_from_slice(&data[pos..pos + 4]);
        let size = read_u32(data, pos + 4)? as usize;
        let body_start = pos + 8;
        let body_end = body_start.checked_add(size).ok_or(WavError::UnexpectedEof)?;
        if body_end > data.len() {
            return Err(WavError::UnexpectedEof);
        }

        // Odd chunks are word-aligned; a missing pad at EOF is tolerated.
        let pad = if size % 2 == 1 { data.get(body_end).copied() } else { None };

        chunks.push(Chunk {
            id,
            data: data[body_start..body_end].to_vec(),
            pad,
        });
        pos = body_end + usize::from(pad.is_some());
    }

    Ok((chunks, data[pos.min(data.len())..].to_vec()))
}

/// Audio format fields from the `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
}

/// Parse the body of a `fmt ` chunk.
pub fn parse_fmt(body: &[u8]) -> Result<WavFormat> {
    if body.len() < 16 {
        return Err(WavError::InvalidFormatChunk("shorter than 16 bytes"));
    }
    let format = WavFormat {
        format_tag: read_u16(body, 0)?,
        channels: read_u16(body, 2)?,
        sample_rate: read_u32(body, 4)?,
        byte_rate: read_u32(body, 8)?,
        block_align: read_u16(body, 12)?,
        bits_per_sample: read_u16(body, 14)?,
    };

    if format.format_tag != FORMAT_PCM && format.format_tag != FORMAT_EXTENSIBLE {
        return Err(WavError::UnsupportedFormat(format.format_tag));
    }
    if format.channels == 0 {
        return Err(WavError::InvalidFormatChunk("zero channels"));
    }
    if format.block_align == 0 {
        return Err(WavError::InvalidFormatChunk("zero block align"));
    }
    Ok(format)
}
