//! C2: the forward/inverse Number Theoretic Transform over `Z_q`, and
//! pointwise polynomial multiplication in the NTT domain. See FIPS 203
//! Algorithms 9–12.
//!
//! `R_q = Z_q[X] / (X^256 + 1)` splits into 128 degree-2 quotient rings
//! because `q ≡ 1 (mod 256)`; `ZETA = 17` is a primitive 256th root of
//! unity. The three twiddle tables below are computed once, at program
//! startup, and never mutated.

use crate::field::Fq;
use crate::{Q, ZETA};

const INV_N: u16 = 3303; // 128^{-1} mod q

/// Reverses the low 7 bits of `i` (`i < 128`). Orders the twiddle tables so
/// a simple incrementing counter walks them in the order each NTT layer
/// needs.
const fn br7(i: u8) -> u8 { i.reverse_bits() >> 1 }

/// `const fn`-compatible modular exponentiation used only to build the
/// twiddle tables at compile time; not used in any hot path.
const fn pow_const(base: u16, mut exp: u32) -> Fq {
    let mut result = 1u32;
    let mut b = base as u32;
    while exp > 0 {
        if exp & 1 == 1 {
            result = (result * b) % Q;
        }
        b = (b * b) % Q;
        exp >>= 1;
    }
    Fq::from_canonical_const(result as u16)
}

const fn gen_ntt_zetas() -> [Fq; 128] {
    let mut table = [Fq::zero(); 128];
    let mut i = 0u8;
    while i < 128 {
        table[br7(i) as usize] = pow_const(ZETA as u16, i as u32);
        i += 1;
    }
    table
}

/// `NTT_ZETAS[i] = ζ^{br7(i)} mod q`, the twiddles consumed by the forward
/// transform.
pub(crate) static NTT_ZETAS: [Fq; 128] = gen_ntt_zetas();

/// `INTT_ZETAS[i] = -NTT_ZETAS[i]`, the twiddles consumed by the inverse
/// transform.
pub(crate) static INTT_ZETAS: [Fq; 128] = {
    let zetas = gen_ntt_zetas();
    let mut table = [Fq::zero(); 128];
    let mut i = 0;
    while i < 128 {
        table[i] = zetas[i].neg_const();
        i += 1;
    }
    table
};

/// `MUL_ZETAS[i] = ζ^{2·br7(i)+1} mod q`, one per base-case multiplication.
pub(crate) static MUL_ZETAS: [Fq; 128] = {
    let mut table = [Fq::zero(); 128];
    let mut i = 0u8;
    while i < 128 {
        table[br7(i) as usize] = pow_const(ZETA as u16, 2 * i as u32 + 1);
        i += 1;
    }
    table
};

/// Forward NTT (Cooley–Tukey, 7 layers). Maps coefficient-form `f` to its
/// evaluations at the 128 roots of `X^2 - ζ^{2·br7(i)+1}`.
#[must_use]
pub(crate) fn ntt(f: &[Fq; 256]) -> [Fq; 256] {
    let mut a = *f;
    let mut k = 1usize;
    for len in [128, 64, 32, 16, 8, 4, 2] {
        for start in (0..256).step_by(2 * len) {
            let zeta = NTT_ZETAS[k];
            k += 1;
            for j in start..start + len {
                let t = zeta.mul(a[j + len]);
                a[j + len] = a[j].sub(t);
                a[j] = a[j].add(t);
            }
        }
    }
    a
}

/// Inverse NTT (Gentleman–Sande, 7 layers), followed by the `128^{-1} mod
/// q` scaling that undoes the transform's implicit factor of `n`.
#[must_use]
pub(crate) fn ntt_inv(f_hat: &[Fq; 256]) -> [Fq; 256] {
    let mut a = *f_hat;
    let mut k = 127usize;
    for len in [2, 4, 8, 16, 32, 64, 128] {
        for start in (0..256).step_by(2 * len) {
            let zeta = INTT_ZETAS[k];
            k -= 1;
            for j in start..start + len {
                let t = a[j];
                a[j] = t.add(a[j + len]);
                a[j + len] = zeta.mul(t.sub(a[j + len]));
            }
        }
    }
    let inv_n = Fq::from_canonical(INV_N);
    for x in &mut a {
        *x = x.mul(inv_n);
    }
    a
}

/// Multiplies two degree-one polynomials `(a0 + a1·X)` and `(b0 + b1·X)`
/// modulo `X^2 - γ`.
#[must_use]
pub(crate) fn base_case_multiply(a0: Fq, a1: Fq, b0: Fq, b1: Fq, gamma: Fq) -> (Fq, Fq) {
    let c0 = a0.mul(b0).add(a1.mul(b1).mul(gamma));
    let c1 = a0.mul(b1).add(a1.mul(b0));
    (c0, c1)
}

/// Pointwise polynomial product in NTT domain: 128 independent degree-one
/// multiplications, each modulo a distinct `X^2 - γ_i`.
#[must_use]
pub(crate) fn multiply_ntts(f_hat: &[Fq; 256], g_hat: &[Fq; 256]) -> [Fq; 256] {
    let mut h_hat = [Fq::zero(); 256];
    for i in 0..128 {
        let gamma = MUL_ZETAS[i];
        let (c0, c1) = base_case_multiply(
            f_hat[2 * i],
            f_hat[2 * i + 1],
            g_hat[2 * i],
            g_hat[2 * i + 1],
            gamma,
        );
        h_hat[2 * i] = c0;
        h_hat[2 * i + 1] = c1;
    }
    h_hat
}
