//! C3: lossy compression of field elements to `d`-bit values, `d ∈ {1, 4, 5,
//! 10, 11}`. See FIPS 203 §4.7 (Compress/Decompress).
//!
//! Both directions avoid floating point and data-dependent branches.
//! `compress` multiplies by a fixed-point approximation of `2^d / q` (a
//! 36-bit Barrett-style reciprocal, good for every `d` used here) and
//! rounds by adding half a `q`-ULP before truncating; `decompress` is the
//! exact inverse rounding in the other direction.

use crate::field::Fq;
use crate::Q;

/// `ceil(2^36 / q)`, shared by every `compress_d` regardless of `d` (the
/// `<< d` happens before the multiply).
const M: u64 = ((1u64 << 36) + Q as u64 - 1) / Q as u64;

/// `compress_d(x) = round(2^d * x / q) mod 2^d`.
#[must_use]
pub(crate) fn compress(d: u32, x: Fq) -> u16 {
    debug_assert!(matches!(d, 1 | 4 | 5 | 10 | 11), "compress: invalid d");
    let y = (x.to_u32() << d) + (Q >> 1);
    let rounded = (u64::from(y) * M) >> 36;
    (rounded as u32 & ((1 << d) - 1)) as u16
}

/// `decompress_d(y) = round(q * y / 2^d)`.
#[must_use]
pub(crate) fn decompress(d: u32, y: u16) -> Fq {
    debug_assert!(matches!(d, 1 | 4 | 5 | 10 | 11), "decompress: invalid d");
    let numerator = Q * u32::from(y) + (1 << (d - 1));
    Fq::from_canonical((numerator >> d) as u16)
}

/// Compresses every coefficient of a 256-element polynomial.
pub(crate) fn compress_poly(d: u32, poly: &[Fq; 256]) -> [u16; 256] {
    core::array::from_fn(|i| compress(d, poly[i]))
}

/// Decompresses `256` packed `d`-bit values back into field elements.
pub(crate) fn decompress_poly(d: u32, values: &[u16; 256]) -> [Fq; 256] {
    core::array::from_fn(|i| decompress(d, values[i]))
}

#[cfg(test)]
mod tests {
    use super::{compress, decompress};
    use crate::field::Fq;
    use crate::Q;

    fn error_bound(d: u32) -> u32 {
        // round(q / 2^{d+1}), per spec.md §8.
        (Q + (1 << d)) >> (d + 1)
    }

    #[test]
    fn compress_output_fits_d_bits() {
        for d in [1u32, 4, 5, 10, 11] {
            for x in 0..Q {
                let c = compress(d, Fq::from_canonical(x as u16));
                assert!(u32::from(c) < (1 << d));
            }
        }
    }

    #[test]
    fn error_bound_holds_for_every_d_and_x() {
        for d in [1u32, 4, 5, 10, 11] {
            let bound = error_bound(d);
            for x in 0..Q {
                let fx = Fq::from_canonical(x as u16);
                let c = compress(d, fx);
                let back = decompress(d, c).to_u32();
                let diff = back as i32 - x as i32;
                // distance on the circle Z/qZ
                let wrapped = diff.rem_euclid(Q as i32);
                let centered = wrapped.min(Q as i32 - wrapped);
                assert!(
                    centered as u32 <= bound,
                    "d={d} x={x} back={back} centered={centered} bound={bound}"
                );
            }
        }
    }

    #[test]
    fn compress_1_is_its_own_bit() {
        // Compress_1(0) = 0, Compress_1 of anything near q/2 rounds to 1.
        assert_eq!(compress(1, Fq::from_canonical(0)), 0);
        assert_eq!(compress(1, Fq::from_canonical((Q / 2) as u16)), 1);
    }
}
