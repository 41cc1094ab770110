// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Reed-Solomon error correction over GF(2^8).
//!
//! Implements RS(255, 255 - p) with the primitive polynomial 0x11D
//! (x^8+x^4+x^3+x^2+1) and first consecutive root α^0. Encoding is
//! systematic; decoding uses Berlekamp-Massey, Chien search and the Forney
//! algorithm and corrects up to `floor(p / 2)` symbol errors per codeword.
//!
//! Payloads longer than `255 - p` bytes are split into full codewords plus
//! one shortened codeword at the end, so the codeword boundaries follow from
//! the encoded length alone.

use crate::stego::ecc::map_chunks;
use crate::stego::error::StegoError;

/// Primitive polynomial for GF(2^8): x^8 + x^4 + x^3 + x^2 + 1 = 0x11D.
const PRIM_POLY: u16 = 0x11D;

/// Maximum codeword length in symbols.
pub const N_MAX: usize = 255;

/// Largest supported parity count (leaves one data symbol per codeword).
pub const MAX_PARITY: usize = N_MAX - 1;

// --- GF(2^8) Arithmetic ---

/// Precomputed log and exp tables for GF(2^8).
struct GfTables {
    exp: [u8; 512],
    log: [u8; 256],
}

fn build_gf_tables() -> GfTables {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];

    let mut x: u16 = 1;
    for i in 0..255u16 {
        exp[i as usize] = x as u8;
        exp[(i + 255) as usize] = x as u8; // wrap-around for easy modular access
        log[x as usize] = i as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIM_POLY;
        }
    }
    exp[510] = exp[0];
    exp[511] = exp[1];

    GfTables { exp, log }
}

fn gf_tables() -> &'static GfTables {
    use std::sync::OnceLock;
    static TABLES: OnceLock<GfTables> = OnceLock::new();
    TABLES.get_or_init(build_gf_tables)
}

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = gf_tables();
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

/// Multiplicative inverse. Callers never pass zero.
fn gf_inv(a: u8) -> u8 {
    debug_assert_ne!(a, 0, "cannot invert zero in GF(2^8)");
    let t = gf_tables();
    t.exp[255 - t.log[a as usize] as usize]
}

/// α^e for any exponent (reduced mod 255).
fn alpha_pow(e: usize) -> u8 {
    gf_tables().exp[e % 255]
}

#[cfg(test)]
fn gf_pow(a: u8, n: u32) -> u8 {
    if a == 0 {
        return if n == 0 { 1 } else { 0 };
    }
    let t = gf_tables();
    t.exp[((t.log[a as usize] as u32 * n) % 255) as usize]
}

/// Evaluate a polynomial at x. `poly[0]` is the highest-degree coefficient.
fn poly_eval(poly: &[u8], x: u8) -> u8 {
    poly.iter().fold(0u8, |acc, &c| gf_mul(acc, x) ^ c)
}

/// Evaluate a polynomial in ascending-power order at x.
fn eval_asc(poly: &[u8], x: u8) -> u8 {
    let mut result = 0u8;
    let mut x_pow = 1u8;
    for &coeff in poly {
        result ^= gf_mul(coeff, x_pow);
        x_pow = gf_mul(x_pow, x);
    }
    result
}

fn poly_mul(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut result = vec![0u8; a.len() + b.len() - 1];
    for (i, &ac) in a.iter().enumerate() {
        for (j, &bc) in b.iter().enumerate() {
            result[i + j] ^= gf_mul(ac, bc);
        }
    }
    result
}

/// g(x) = prod_{i=0}^{p-1} (x - α^i), highest degree first.
fn build_gen_poly(parity_len: usize) -> Vec<u8> {
    (0..parity_len).fold(vec![1u8], |g, i| poly_mul(&g, &[1, alpha_pow(i)]))
}

/// Error returned when a single codeword cannot be corrected.
#[derive(Debug, PartialEq)]
pub struct RsDecodeError;

impl core::fmt::Display for RsDecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Reed-Solomon: too many errors to correct")
    }
}

/// Statistics from decoding all codewords of a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RsDecodeStats {
    /// Total symbol errors corrected across all codewords.
    pub total_errors: usize,
    /// Maximum errors found in any single codeword.
    pub max_block_errors: usize,
    /// Number of codewords decoded.
    pub num_blocks: usize,
}

/// A Reed-Solomon code with a fixed parity count.
#[derive(Debug, Clone)]
pub struct ReedSolomon {
    parity_len: usize,
    /// Generator polynomial, highest degree first (length `parity_len + 1`).
    generator: Vec<u8>,
}

impl ReedSolomon {
    /// # Errors
    /// [`StegoError::UnsupportedConfiguration`] unless `1 <= parity_symbols <= 254`.
    pub fn new(parity_symbols: usize) -> Result<Self, StegoError> {
        if parity_symbols == 0 || parity_symbols > MAX_PARITY {
            return Err(StegoError::UnsupportedConfiguration(
                "Reed-Solomon parity_symbols must be in 1..=254",
            ));
        }
        Ok(Self {
            parity_len: parity_symbols,
            generator: build_gen_poly(parity_symbols),
        })
    }

    pub fn parity_len(&self) -> usize {
        self.parity_len
    }

    /// Data symbols carried by one full codeword.
    pub fn max_data_len(&self) -> usize {
        N_MAX - self.parity_len
    }

    /// Symbol errors correctable per codeword.
    pub fn correction_capacity(&self) -> usize {
        self.parity_len / 2
    }

    /// Systematic encoding of one codeword: `data || parity`.
    ///
    /// `data` must not exceed [`max_data_len`](Self::max_data_len). Shorter
    /// data is a shortened code: conceptually zero-padded at the front, which
    /// leaves the LFSR remainder unchanged.
    pub fn encode_block(&self, data: &[u8]) -> Vec<u8> {
        debug_assert!(data.len() <= self.max_data_len());
        let p = self.parity_len;
        let g = &self.generator;
        let mut shift_reg = vec![0u8; p];

        for &byte in data {
            let feedback = byte ^ shift_reg[0];
            for j in 0..p - 1 {
                shift_reg[j] = shift_reg[j + 1] ^ gf_mul(feedback, g[j + 1]);
            }
            shift_reg[p - 1] = gf_mul(feedback, g[p]);
        }

        let mut encoded = Vec::with_capacity(data.len() + p);
        encoded.extend_from_slice(data);
        encoded.extend_from_slice(&shift_reg);
        encoded
    }

    /// Syndromes S_i = r(α^i) for i in 0..p over a full 255-symbol block.
    fn syndromes(&self, full_block: &[u8]) -> Vec<u8> {
        (0..self.parity_len).map(|i| poly_eval(full_block, alpha_pow(i))).collect()
    }

    /// Decode one (possibly shortened) codeword.
    ///
    /// Returns the corrected data symbols and the number of symbol errors
    /// that were fixed.
    ///
    /// # Errors
    /// [`RsDecodeError`] if the codeword is shorter than the parity, carries
    /// more than `floor(p / 2)` errors, or the locator points into the
    /// virtual zero padding of a shortened code.
    pub fn decode_block(&self, received: &[u8]) -> Result<(Vec<u8>, usize), RsDecodeError> {
        let p = self.parity_len;
        if received.len() <= p || received.len() > N_MAX {
            return Err(RsDecodeError);
        }
        let data_len = received.len() - p;

        let padding = N_MAX - received.len();
        let mut full_block = vec![0u8; N_MAX];
        full_block[padding..].copy_from_slice(received);

        let syndromes = self.syndromes(&full_block);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok((received[..data_len].to_vec(), 0));
        }

        let sigma = berlekamp_massey(&syndromes);
        let num_errors = sigma.len() - 1;
        if num_errors > self.correction_capacity() {
            return Err(RsDecodeError);
        }

        let found = chien_search(&sigma, N_MAX).ok_or(RsDecodeError)?;
        let magnitudes = forney(&sigma, &syndromes, &found);

        for (&(_, array_pos), &magnitude) in found.iter().zip(&magnitudes) {
            if array_pos < padding {
                return Err(RsDecodeError);
            }
            full_block[array_pos] ^= magnitude;
        }

        if self.syndromes(&full_block).iter().any(|&s| s != 0) {
            return Err(RsDecodeError);
        }

        Ok((full_block[padding..padding + data_len].to_vec(), num_errors))
    }

    /// Encode an arbitrarily long payload as consecutive codewords.
    pub fn encode(&self, payload: &[u8]) -> Vec<u8> {
        map_chunks(payload, self.max_data_len(), |_, chunk| self.encode_block(chunk)).concat()
    }

    /// Decode a payload produced by [`encode`](Self::encode).
    ///
    /// # Errors
    /// [`StegoError::UncorrectableBlock`] naming the first codeword that
    /// failed, or the trailing codeword if the length is malformed.
    pub fn decode(&self, encoded: &[u8]) -> Result<(Vec<u8>, RsDecodeStats), StegoError> {
        let expected = self.decoded_len(encoded.len())?;

        let results = map_chunks(encoded, N_MAX, |i, block| (i, self.decode_block(block)));

        let mut decoded = Vec::with_capacity(expected);
        let mut stats = RsDecodeStats::default();
        for (block, result) in results {
            let (data, errors) = result.map_err(|_| StegoError::UncorrectableBlock { block })?;
            if errors > 0 {
                tracing::trace!(block, errors, "corrected Reed-Solomon codeword");
            }
            decoded.extend_from_slice(&data);
            stats.total_errors += errors;
            stats.max_block_errors = stats.max_block_errors.max(errors);
            stats.num_blocks += 1;
        }
        Ok((decoded, stats))
    }

    /// Encoded length for `data_len` payload bytes.
    pub fn encoded_len(&self, data_len: usize) -> usize {
        let k = self.max_data_len();
        let full_blocks = data_len / k;
        let remainder = data_len % k;
        let mut total = full_blocks * N_MAX;
        if remainder > 0 {
            total += remainder + self.parity_len;
        }
        total
    }

    /// Payload length recovered from an encoded length.
    ///
    /// # Errors
    /// [`StegoError::UncorrectableBlock`] if a trailing codeword would hold
    /// no data symbols (no payload encodes to this length).
    pub fn decoded_len(&self, encoded_len: usize) -> Result<usize, StegoError> {
        let full_blocks = encoded_len / N_MAX;
        let remainder = encoded_len % N_MAX;
        let mut total = full_blocks * self.max_data_len();
        if remainder > 0 {
            if remainder <= self.parity_len {
                return Err(StegoError::UncorrectableBlock { block: full_blocks });
            }
            total += remainder - self.parity_len;
        }
        Ok(total)
    }
}

// --- Decoding internals ---

/// Berlekamp-Massey algorithm.
///
/// Returns sigma(x) in ascending power (sigma[0] = 1) with trailing zero
/// coefficients removed, so `len - 1` is the locator degree.
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let n = syndromes.len();

    let mut c = vec![0u8; n + 1];
    c[0] = 1;
    let mut c_len = 1usize;

    let mut b = vec![0u8; n + 1];
    b[0] = 1;
    let mut b_len = 1usize;

    let mut ell = 0usize;
    let mut bval = 1u8;
    let mut m = 1usize;

    for r in 0..n {
        let mut delta = syndromes[r];
        for i in 1..c_len.min(r + 1) {
            delta ^= gf_mul(c[i], syndromes[r - i]);
        }

        if delta == 0 {
            m += 1;
            continue;
        }

        let factor = gf_mul(delta, gf_inv(bval));
        let new_len = (b_len + m).max(c_len).min(n + 1);

        if 2 * ell <= r {
            let old_c = c.clone();
            let old_c_len = c_len;

            for j in 0..b_len.min(n + 1 - m) {
                c[j + m] ^= gf_mul(factor, b[j]);
            }
            c_len = new_len;

            b.fill(0);
            b[..old_c_len].copy_from_slice(&old_c[..old_c_len]);
            b_len = old_c_len;
            ell = r + 1 - ell;
            bval = delta;
            m = 1;
        } else {
            for j in 0..b_len.min(n + 1 - m) {
                c[j + m] ^= gf_mul(factor, b[j]);
            }
            c_len = new_len;
            m += 1;
        }
    }

    while c_len > 1 && c[c_len - 1] == 0 {
        c_len -= 1;
    }
    c.truncate(c_len);
    c
}

/// Chien search: find roots of sigma(x).
///
/// The codeword is c(x) = c[0]*x^{n-1} + ... + c[n-1], so an error at array
/// index k sits at GF position n-1-k and sigma has a root at α^{-(n-1-k)}.
///
/// Returns (gf_pos, array_pos) pairs, or `None` if the root count does not
/// match the locator degree.
fn chien_search(sigma: &[u8], n: usize) -> Option<Vec<(usize, usize)>> {
    let num_errors = sigma.len() - 1;
    let mut found = Vec::with_capacity(num_errors);

    for p in 0..n {
        let x_inv = alpha_pow(255 - p % 255);
        if eval_asc(sigma, x_inv) == 0 {
            found.push((p, n - 1 - p));
        }
    }

    (found.len() == num_errors).then_some(found)
}

/// Forney algorithm (first root α^0):
/// e_l = X_l * Omega(X_l^{-1}) / Sigma'(X_l^{-1}),
/// Omega(x) = S(x) * Sigma(x) mod x^{2t}.
fn forney(sigma: &[u8], syndromes: &[u8], found: &[(usize, usize)]) -> Vec<u8> {
    let two_t = syndromes.len();

    let mut omega = vec![0u8; two_t];
    for (i, &s_coeff) in sigma.iter().enumerate().take(two_t) {
        for (j, &syn) in syndromes.iter().enumerate().take(two_t - i) {
            omega[i + j] ^= gf_mul(s_coeff, syn);
        }
    }

    // Formal derivative in characteristic 2: only odd powers survive.
    let mut sigma_prime = vec![0u8; sigma.len().saturating_sub(1)];
    for i in (1..sigma.len()).step_by(2) {
        sigma_prime[i - 1] = sigma[i];
    }

    found
        .iter()
        .map(|&(gf_pos, _)| {
            let x_val = alpha_pow(gf_pos);
            let x_inv = alpha_pow(255 - gf_pos % 255);
            let sp_val = eval_asc(&sigma_prime, x_inv);
            if sp_val == 0 {
                return 0;
            }
            gf_mul(x_val, gf_mul(eval_asc(&omega, x_inv), gf_inv(sp_val)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rs(p: usize) -> ReedSolomon {
        ReedSolomon::new(p).unwrap()
    }

    #[test]
    fn gf_mul_identity_and_zero() {
        for a in 0..=255u16 {
            assert_eq!(gf_mul(a as u8, 1), a as u8);
            assert_eq!(gf_mul(0, a as u8), 0);
        }
    }

    #[test]
    fn gf_inverse_roundtrip() {
        for a in 1..=255u16 {
            let inv = gf_inv(a as u8);
            assert_eq!(gf_mul(a as u8, inv), 1, "a={a}, inv={inv}");
        }
    }

    #[test]
    fn gf_pow_consistency() {
        for a in 1..=255u16 {
            assert_eq!(gf_pow(a as u8, 1), a as u8);
            assert_eq!(gf_pow(a as u8, 0), 1);
            assert_eq!(gf_pow(a as u8, 255), 1, "a={a}");
        }
    }

    #[test]
    fn generator_has_expected_roots() {
        let code = rs(16);
        assert_eq!(code.generator.len(), 17);
        assert_eq!(code.generator[0], 1);
        for i in 0..16 {
            assert_eq!(poly_eval(&code.generator, alpha_pow(i)), 0, "root alpha^{i} failed");
        }
    }

    #[test]
    fn parity_bounds() {
        assert!(ReedSolomon::new(0).is_err());
        assert!(ReedSolomon::new(255).is_err());
        assert_eq!(rs(254).max_data_len(), 1);
        assert_eq!(rs(4).correction_capacity(), 2);
        assert_eq!(rs(5).correction_capacity(), 2);
    }

    #[test]
    fn encode_decode_no_errors() {
        let code = rs(4);
        let data = b"Hello, Reed-Solomon!";
        let encoded = code.encode_block(data);
        assert_eq!(encoded.len(), data.len() + 4);
        let (decoded, errors) = code.decode_block(&encoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(errors, 0);
    }

    #[test]
    fn corrects_up_to_half_parity() {
        let code = rs(8);
        let data = b"Test message for RS error correction.";
        let mut encoded = code.encode_block(data);
        encoded[0] ^= 0xFF;
        encoded[9] ^= 0xAA;
        encoded[20] ^= 0x01;
        encoded[data.len() + 3] ^= 0x77; // parity symbol
        let (decoded, errors) = code.decode_block(&encoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(errors, 4);
    }

    #[test]
    fn too_many_errors_fails() {
        let code = rs(16);
        let data = vec![0u8; 50];
        let mut encoded = code.encode_block(&data);
        for i in 0..9 {
            encoded[i * 7] ^= 0xFF;
        }
        assert_eq!(code.decode_block(&encoded), Err(RsDecodeError));
    }

    #[test]
    fn max_correctable_full_codeword() {
        let code = rs(64);
        let data = vec![42u8; code.max_data_len()];
        let mut encoded = code.encode_block(&data);
        assert_eq!(encoded.len(), N_MAX);
        for i in 0..32 {
            encoded[i * 3] ^= 0xFF;
        }
        let (decoded, errors) = code.decode_block(&encoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(errors, 32);
    }

    #[test]
    fn odd_parity_corrects_floor_half() {
        let code = rs(5);
        let data = b"odd parity";
        let mut encoded = code.encode_block(data);
        encoded[1] ^= 0x10;
        encoded[6] ^= 0x20;
        let (decoded, errors) = code.decode_block(&encoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(errors, 2);
    }

    #[test]
    fn blocks_roundtrip_with_errors() {
        let code = rs(16);
        let data: Vec<u8> = (0..600).map(|i| (i % 256) as u8).collect();
        let mut encoded = code.encode(&data);
        // 600 / 239 = 2 full codewords + 122 data symbols.
        assert_eq!(encoded.len(), 2 * 255 + 122 + 16);
        assert_eq!(encoded.len(), code.encoded_len(data.len()));

        encoded[10] ^= 0xFF;
        encoded[300] ^= 0x55;
        encoded[301] ^= 0x11;
        encoded[520] ^= 0x33;

        let (decoded, stats) = code.decode(&encoded).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(stats.total_errors, 4);
        assert_eq!(stats.max_block_errors, 2);
        assert_eq!(stats.num_blocks, 3);
    }

    #[test]
    fn failing_codeword_is_named() {
        let code = rs(16);
        let data = vec![7u8; 600];
        let mut encoded = code.encode(&data);
        for i in 0..9 {
            encoded[255 + i * 11] ^= 0x5A;
        }
        assert_eq!(code.decode(&encoded), Err(StegoError::UncorrectableBlock { block: 1 }));
    }

    #[test]
    fn length_arithmetic() {
        let code = rs(4);
        assert_eq!(code.encoded_len(0), 0);
        assert_eq!(code.encoded_len(1), 5);
        assert_eq!(code.encoded_len(251), 255);
        assert_eq!(code.encoded_len(252), 255 + 5);
        for n in [0usize, 1, 250, 251, 252, 1000] {
            assert_eq!(code.decoded_len(code.encoded_len(n)).unwrap(), n);
        }
        // A 4-symbol tail holds no data.
        assert_eq!(code.decoded_len(259), Err(StegoError::UncorrectableBlock { block: 1 }));
    }

    #[test]
    fn empty_payload() {
        let code = rs(4);
        assert!(code.encode(&[]).is_empty());
        let (decoded, stats) = code.decode(&[]).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(stats.num_blocks, 0);
    }
}
