//! The four Keccak-derived primitives the core treats as opaque collaborators
//! (see spec.md §1/§6): `SHA3-256`, `SHA3-512`, and the two incremental XOFs
//! `SHAKE-128`/`SHAKE-256`. This module is the seam: everything downstream
//! calls `h`, `g`, `j`, `prf`, or `xof_reader` and never touches `sha3`
//! directly, so swapping the Keccak implementation only touches this file.
//!
//! The two XOF wrappers encode the `Created -> Absorbing -> Finalized ->
//! Squeezing` state machine of §4.8 in the type system: `absorb` takes
//! `&mut self`, `finalize` consumes `self` and returns a reader that only
//! supports `squeeze`, so absorbing after finalize is a compile error
//! rather than a runtime one.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Sha3_512, Shake128, Shake256};

/// An incremental XOF in its `Absorbing` state.
pub(crate) trait Xof: Default {
    type Reader: XofReader;

    fn absorb(&mut self, data: &[u8]);

    fn finalize(self) -> Self::Reader;
}

#[derive(Default)]
pub(crate) struct Shake128Xof(Shake128);

impl Xof for Shake128Xof {
    type Reader = <Shake128 as ExtendableOutput>::Reader;

    fn absorb(&mut self, data: &[u8]) { Update::update(&mut self.0, data); }

    fn finalize(self) -> Self::Reader { self.0.finalize_xof() }
}

#[derive(Default)]
pub(crate) struct Shake256Xof(Shake256);

impl Xof for Shake256Xof {
    type Reader = <Shake256 as ExtendableOutput>::Reader;

    fn absorb(&mut self, data: &[u8]) { Update::update(&mut self.0, data); }

    fn finalize(self) -> Self::Reader { self.0.finalize_xof() }
}

/// Function `H` (FIPS 203 §4.4): `SHA3-256`.
#[must_use]
pub(crate) fn h(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    Digest::update(&mut hasher, bytes);
    hasher.finalize().into()
}

/// Function `G` (FIPS 203 §4.5): `SHA3-512`, split into two 32-byte halves.
#[must_use]
pub(crate) fn g(parts: &[&[u8]]) -> ([u8; 32], [u8; 32]) {
    let mut hasher = Sha3_512::new();
    for part in parts {
        Digest::update(&mut hasher, part);
    }
    let digest = hasher.finalize();
    let a = digest[0..32].try_into().expect("g: left half");
    let b = digest[32..64].try_into().expect("g: right half");
    (a, b)
}

/// Function `J` (FIPS 203 §4.4): `SHAKE-256(z ‖ ct)`, squeezed to 32 bytes.
/// This is the implicit-rejection pseudorandom function.
#[must_use]
pub(crate) fn j(z: &[u8; 32], ct: &[u8]) -> [u8; 32] {
    let mut xof = Shake256Xof::default();
    xof.absorb(z);
    xof.absorb(ct);
    let mut reader = xof.finalize();
    let mut out = [0u8; 32];
    reader.read(&mut out);
    out
}

/// Function `PRF_η` (FIPS 203 §4.3): `SHAKE-256(s ‖ b)`, squeezed to
/// `64 * eta` bytes.
#[must_use]
pub(crate) fn prf<const LEN: usize>(s: &[u8; 32], b: u8) -> [u8; LEN] {
    let mut xof = Shake256Xof::default();
    xof.absorb(s);
    xof.absorb(&[b]);
    let mut reader = xof.finalize();
    let mut out = [0u8; LEN];
    reader.read(&mut out);
    out
}

/// Function `XOF` (FIPS 203 §4.6): a `SHAKE-128` reader primed with
/// `rho ‖ i ‖ j`, handed to the rejection sampler in `sampling.rs`.
#[must_use]
pub(crate) fn xof_reader(rho: &[u8; 32], i: u8, j: u8) -> impl XofReader {
    let mut xof = Shake128Xof::default();
    xof.absorb(rho);
    xof.absorb(&[i]);
    xof.absorb(&[j]);
    xof.finalize()
}

#[cfg(test)]
mod tests {
    use super::{g, h, j, prf};

    #[test]
    fn h_is_deterministic_and_32_bytes() {
        assert_eq!(h(b"abc"), h(b"abc"));
        assert_ne!(h(b"abc"), h(b"abd"));
    }

    #[test]
    fn g_splits_sha3_512_in_half() {
        let (a, b) = g(&[b"abc"]);
        assert_ne!(a, b);
        let (a2, b2) = g(&[b"abc"]);
        assert_eq!(a, a2);
        assert_eq!(b, b2);
    }

    #[test]
    fn j_depends_on_both_inputs() {
        let z1 = [1u8; 32];
        let z2 = [2u8; 32];
        assert_ne!(j(&z1, b"ct"), j(&z2, b"ct"));
        assert_ne!(j(&z1, b"ct"), j(&z1, b"other-ct"));
    }

    #[test]
    fn prf_output_length_matches_const_generic() {
        let out: [u8; 192] = prf(&[0u8; 32], 3); // eta=3 -> 64*3
        assert_eq!(out.len(), 192);
    }
}
