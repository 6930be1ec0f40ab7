//! C9 (part): constant-time comparison and selection over byte buffers.
//!
//! These are the two primitives §4.8/§9 call `ct_memcmp` and `ct_select`:
//! fold an equality test over every byte into a single mask, then select
//! between two buffers using that mask without branching on the buffers'
//! contents. `subtle` is the audited, non-allocating crate the rest of the
//! `no_std` Rust lattice-crypto ecosystem reaches for here, so this module
//! is a thin named wrapper over it rather than a hand-rolled XOR-fold —
//! the fold-and-broadcast algorithm `subtle::ConstantTimeEq` implements is
//! exactly the one described in the Design Notes.

use subtle::{ConditionallySelectable, ConstantTimeEq};

/// Compares two equal-length byte buffers without branching on their
/// contents. Returns `true` iff every byte matches.
#[must_use]
pub(crate) fn ct_memcmp(a: &[u8], b: &[u8]) -> bool {
    debug_assert_eq!(a.len(), b.len(), "ct_memcmp: length mismatch");
    a.ct_eq(b).into()
}

/// Byte-wise constant-time select: returns `a` if `choose_a`, else `b`,
/// without branching on `choose_a` or on either buffer's contents.
pub(crate) fn ct_select(choose_a: bool, a: &[u8], b: &[u8], out: &mut [u8]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());
    let choice = subtle::Choice::from(u8::from(choose_a));
    for i in 0..out.len() {
        out[i] = u8::conditional_select(&b[i], &a[i], choice);
    }
}

#[cfg(test)]
mod tests {
    use super::{ct_memcmp, ct_select};

    #[test]
    fn memcmp_agrees_with_eq() {
        assert!(ct_memcmp(b"abcdef", b"abcdef"));
        assert!(!ct_memcmp(b"abcdef", b"abcdeg"));
        assert!(!ct_memcmp(&[0u8; 32], &[1u8; 32]));
    }

    #[test]
    fn select_picks_the_right_operand() {
        let a = [1u8; 8];
        let b = [2u8; 8];
        let mut out = [0u8; 8];
        ct_select(true, &a, &b, &mut out);
        assert_eq!(out, a);
        ct_select(false, &a, &b, &mut out);
        assert_eq!(out, b);
    }
}
