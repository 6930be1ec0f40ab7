//! C4: bit-packed (de)serialization of a 256-coefficient polynomial at
//! `l ∈ {1, 4, 5, 10, 11, 12}` bits per coefficient. See FIPS 203 Algorithms
//! 4 and 5 (`ByteEncode`/`ByteDecode`).
//!
//! The bit stream runs from the least-significant bit of byte 0 upward;
//! coefficients are packed back-to-back without padding between them, so
//! `encode_l` produces exactly `32 * l` bytes for any `l`.

use crate::field::Fq;
use crate::Q;

/// Packs 256 values, each taken modulo `2^d`, into `32 * d` bytes.
pub(crate) fn encode_bits(d: u32, values: &[u16; 256], out: &mut [u8]) {
    debug_assert_eq!(out.len(), 32 * d as usize, "encode_bits: bad output length");
    let mask = (1u64 << d) - 1;
    let mut acc = 0u64;
    let mut acc_bits = 0u32;
    let mut byte_index = 0;
    for &coeff in values {
        acc |= (u64::from(coeff) & mask) << acc_bits;
        acc_bits += d;
        while acc_bits >= 8 {
            out[byte_index] = acc as u8;
            acc >>= 8;
            acc_bits -= 8;
            byte_index += 1;
        }
    }
    debug_assert_eq!(byte_index, out.len());
}

/// Inverse of `encode_bits`: unpacks `32 * d` bytes into 256 values in
/// `[0, 2^d)`.
pub(crate) fn decode_bits(d: u32, bytes: &[u8]) -> [u16; 256] {
    debug_assert_eq!(bytes.len(), 32 * d as usize, "decode_bits: bad input length");
    let mask = (1u64 << d) - 1;
    let mut values = [0u16; 256];
    let mut acc = 0u64;
    let mut acc_bits = 0u32;
    let mut value_index = 0;
    for &byte in bytes {
        acc |= u64::from(byte) << acc_bits;
        acc_bits += 8;
        while acc_bits >= d {
            values[value_index] = (acc & mask) as u16;
            acc >>= d;
            acc_bits -= d;
            value_index += 1;
        }
    }
    debug_assert_eq!(value_index, 256);
    values
}

/// `ByteEncode_d`: packs a polynomial of `Fq` elements at width `d`. Used
/// both for the canonical `d = 12` encoding of key material and, after
/// `compress::compress_poly`, for the `du`/`dv`/`1`-bit ciphertext and
/// message encodings.
pub(crate) fn encode_poly(d: u32, poly: &[Fq; 256], out: &mut [u8]) {
    let values: [u16; 256] = core::array::from_fn(|i| poly[i].to_u16());
    encode_bits(d, &values, out);
}

/// `ByteDecode_d`: unpacks a polynomial at width `d`. For `d = 12` this
/// rejects any encoded coefficient `>= q` (the public-key modulus check of
/// FIPS 203 §7.2 item (2) is built from this); for every other `d` used
/// here `2^d < q` so no coefficient can be out of range.
pub(crate) fn decode_poly(d: u32, bytes: &[u8]) -> Result<[Fq; 256], &'static str> {
    let values = decode_bits(d, bytes);
    if d == 12 && values.iter().any(|&v| u32::from(v) >= Q) {
        return Err("ByteDecode_12: coefficient out of range");
    }
    Ok(core::array::from_fn(|i| Fq::from_canonical(values[i])))
}

/// `ByteEncode_12`, named for the specific case every public/private key
/// serialization uses.
pub(crate) fn encode_12(poly: &[Fq; 256], out: &mut [u8]) { encode_poly(12, poly, out); }

/// `ByteDecode_12`, named for the specific case every public/private key
/// deserialization uses.
pub(crate) fn decode_12(bytes: &[u8]) -> Result<[Fq; 256], &'static str> { decode_poly(12, bytes) }

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec;

    use super::{decode_12, decode_bits, encode_12, encode_bits};
    use crate::field::Fq;
    use rand::{Rng, SeedableRng};

    #[test]
    fn round_trip_every_supported_width() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        for d in [1u32, 4, 5, 10, 11] {
            for _ in 0..20 {
                let values: [u16; 256] = core::array::from_fn(|_| rng.gen_range(0..(1u32 << d)) as u16);
                let mut bytes = vec![0u8; 32 * d as usize];
                encode_bits(d, &values, &mut bytes);
                let back = decode_bits(d, &bytes);
                assert_eq!(values, back);
            }
        }
    }

    #[test]
    fn width_12_round_trips_canonical_polynomials() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(43);
        for _ in 0..20 {
            let poly: [Fq; 256] = core::array::from_fn(|_| Fq::from_canonical(rng.gen_range(0..3329)));
            let mut bytes = [0u8; 384];
            encode_12(&poly, &mut bytes);
            let back = decode_12(&bytes).unwrap();
            assert_eq!(poly, back);
        }
    }

    #[test]
    fn width_12_rejects_coefficient_at_or_above_q() {
        // 3329 = q, packed as the very first coefficient; every other
        // coefficient is 0.
        let mut bytes = [0u8; 384];
        bytes[0] = 0x01;
        bytes[1] = 0x0D; // low 12 bits = 0x0D01 = 3329
        let result = decode_12(&bytes);
        assert!(result.is_err());
    }

    #[test]
    fn encode_truncates_low_bits_only() {
        // A coefficient that exceeds 2^d still encodes to its low d bits.
        let mut values = [0u16; 256];
        values[0] = 0b1_1010; // 5 bits, d=4 keeps the low 4: 0b1010
        let mut bytes = [0u8; 32 * 4];
        encode_bits(4, &values, &mut bytes);
        let back = decode_bits(4, &bytes);
        assert_eq!(back[0], 0b1010);
    }
}
