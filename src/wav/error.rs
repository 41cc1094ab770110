// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for WAV container parsing.

use std::fmt;

/// Errors that can occur while reading a RIFF/WAVE container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WavError {
    /// Input data is too short or a chunk runs past the end of the file.
    UnexpectedEof,
    /// Missing `RIFF` / `WAVE` magic at the start of the data.
    InvalidHeader,
    /// A required chunk (`fmt ` or `data`) was not found.
    MissingChunk(&'static str),
    /// The `fmt ` chunk describes a format other than integer PCM.
    UnsupportedFormat(u16),
    /// The `fmt ` chunk is malformed (too short, zero channels, ...).
    InvalidFormatChunk(&'static str),
}

impl fmt::Display for WavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of WAV data"),
            Self::InvalidHeader => write!(f, "missing RIFF/WAVE header (not a WAV file)"),
            Self::MissingChunk(id) => write!(f, "missing required chunk: {id:?}"),
            Self::UnsupportedFormat(tag) => write!(f, "unsupported WAV format tag: 0x{tag:04X}"),
            Self::InvalidFormatChunk(msg) => write!(f, "invalid fmt chunk: {msg}"),
        }
    }
}

impl std::error::Error for WavError {}

pub type Result<T> = std::result::Result<T, WavError>;
