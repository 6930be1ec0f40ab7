//! C6: the `K`-dimensional vector/matrix algebra K-PKE is built from, all
//! operating on polynomials already in the NTT domain. See FIPS 203 §2.4
//! commentary on Equations 2.11-2.14.

use crate::field::Fq;
use crate::ntt::multiply_ntts;

/// `z_hat = u_hat + v_hat`, coefficient-wise over the `K` polynomials.
#[must_use]
pub(crate) fn add_vecs<const K: usize>(
    vec_a: &[[Fq; 256]; K], vec_b: &[[Fq; 256]; K],
) -> [[Fq; 256]; K] {
    core::array::from_fn(|k| core::array::from_fn(|n| vec_a[k][n].add(vec_b[k][n])))
}

/// `w_hat = A_hat . u_hat`: a `K x K` matrix against a `K`-vector.
#[must_use]
pub(crate) fn mul_mat_vec<const K: usize>(
    a_hat: &[[[Fq; 256]; K]; K], u_hat: &[[Fq; 256]; K],
) -> [[Fq; 256]; K] {
    core::array::from_fn(|i| {
        let mut acc = [Fq::zero(); 256];
        for j in 0..K {
            let term = multiply_ntts(&a_hat[i][j], &u_hat[j]);
            acc = core::array::from_fn(|n| acc[n].add(term[n]));
        }
        acc
    })
}

/// `z_hat = u_hat^T . v_hat`: dot product of two `K`-vectors, collapsing to
/// a single polynomial.
#[must_use]
pub(crate) fn dot_t_prod<const K: usize>(u_hat: &[[Fq; 256]; K], v_hat: &[[Fq; 256]; K]) -> [Fq; 256] {
    let mut acc = [Fq::zero(); 256];
    for j in 0..K {
        let term = multiply_ntts(&u_hat[j], &v_hat[j]);
        acc = core::array::from_fn(|n| acc[n].add(term[n]));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::{add_vecs, dot_t_prod, mul_mat_vec};
    use crate::field::Fq;

    fn zero_vec<const K: usize>() -> [[Fq; 256]; K] { [[Fq::zero(); 256]; K] }

    #[test]
    fn add_vecs_is_commutative_and_has_zero_identity() {
        let a: [[Fq; 256]; 3] = core::array::from_fn(|k| {
            core::array::from_fn(|n| Fq::from_canonical(((k * 7 + n) % 3329) as u16))
        });
        let zero = zero_vec::<3>();
        assert_eq!(add_vecs(&a, &zero), a);
        let b: [[Fq; 256]; 3] = core::array::from_fn(|k| {
            core::array::from_fn(|n| Fq::from_canonical(((k * 3 + n * 2) % 3329) as u16))
        });
        assert_eq!(add_vecs(&a, &b), add_vecs(&b, &a));
    }

    #[test]
    fn mat_vec_against_zero_matrix_is_zero() {
        let zero_mat: [[[Fq; 256]; 2]; 2] = [[zero_vec::<1>()[0]; 2]; 2];
        let u: [[Fq; 256]; 2] = core::array::from_fn(|k| {
            core::array::from_fn(|n| Fq::from_canonical(((k + n) % 3329) as u16))
        });
        assert_eq!(mul_mat_vec(&zero_mat, &u), zero_vec::<2>());
    }

    #[test]
    fn dot_t_prod_with_zero_is_zero() {
        let u: [[Fq; 256]; 2] = core::array::from_fn(|k| {
            core::array::from_fn(|n| Fq::from_canonical(((k + n) % 3329) as u16))
        });
        let zero = zero_vec::<2>();
        assert_eq!(dot_t_prod(&u, &zero), [Fq::zero(); 256]);
    }
}
