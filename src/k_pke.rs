//! C7: K-PKE, the IND-CPA public-key encryption scheme ML-KEM wraps with
//! the Fujisaki-Okamoto transform. See FIPS 203 Algorithms 13-15.

use crate::byte_fns::{encode_poly, decode_poly};
use crate::compress::{compress_poly, decompress_poly};
use crate::field::Fq;
use crate::hashing::{g, prf};
use crate::ntt::{ntt, ntt_inv};
use crate::poly_vec::{add_vecs, dot_t_prod, mul_mat_vec};
use crate::sampling::{cbd, gen_a};

/// `K-PKE.KeyGen(d)`: expands the 32-byte seed `d` into a public encryption
/// key `ek_PKE` and a private decryption key `dk_PKE`.
#[allow(clippy::similar_names)]
pub(crate) fn k_pke_key_gen<const K: usize, const ETA1_64: usize>(
    d: [u8; 32], ek_pke: &mut [u8], dk_pke: &mut [u8],
) {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "k_pke_key_gen: ek_pke not 384*K+32");
    debug_assert_eq!(dk_pke.len(), 384 * K, "k_pke_key_gen: dk_pke not 384*K");

    let mut seed = [0u8; 33];
    seed[0..32].copy_from_slice(&d);
    seed[32] = K as u8;
    let (rho, sigma) = g(&[&seed]);

    let mut n = 0u8;
    let a_hat = gen_a::<K>(&rho, false);

    let s: [[Fq; 256]; K] = core::array::from_fn(|_| {
        let poly = cbd(&prf::<ETA1_64>(&sigma, n));
        n += 1;
        poly
    });
    let e: [[Fq; 256]; K] = core::array::from_fn(|_| {
        let poly = cbd(&prf::<ETA1_64>(&sigma, n));
        n += 1;
        poly
    });

    let s_hat: [[Fq; 256]; K] = core::array::from_fn(|i| ntt(&s[i]));
    let e_hat: [[Fq; 256]; K] = core::array::from_fn(|i| ntt(&e[i]));

    let t_hat = add_vecs(&mul_mat_vec(&a_hat, &s_hat), &e_hat);

    for (i, chunk) in ek_pke.chunks_mut(384).enumerate().take(K) {
        encode_poly(12, &t_hat[i], chunk);
    }
    ek_pke[K * 384..].copy_from_slice(&rho);

    for (i, chunk) in dk_pke.chunks_mut(384).enumerate() {
        encode_poly(12, &s_hat[i], chunk);
    }
}

/// `K-PKE.Encrypt(ek_PKE, m, r)`: encrypts the 32-byte message `m` under the
/// public key `ek_PKE`, using randomness `r` to derive the noise terms.
#[allow(clippy::many_single_char_names, clippy::too_many_arguments)]
pub(crate) fn k_pke_encrypt<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, ek_pke: &[u8], m: &[u8], r: &[u8; 32], ct: &mut [u8],
) -> Result<(), &'static str> {
    debug_assert_eq!(ek_pke.len(), 384 * K + 32, "k_pke_encrypt: ek_pke not 384*K+32");
    debug_assert_eq!(m.len(), 32, "k_pke_encrypt: m not 32 bytes");

    let mut n = 0u8;

    let mut t_hat = [[Fq::zero(); 256]; K];
    for (i, chunk) in ek_pke.chunks(384).enumerate().take(K) {
        t_hat[i] = decode_poly(12, chunk)?;
    }
    let rho: [u8; 32] = ek_pke[384 * K..384 * K + 32].try_into().expect("k_pke_encrypt: rho slice");

    let a_hat = gen_a::<K>(&rho, true);

    let y: [[Fq; 256]; K] = core::array::from_fn(|_| {
        let poly = cbd(&prf::<ETA1_64>(r, n));
        n += 1;
        poly
    });
    let e1: [[Fq; 256]; K] = core::array::from_fn(|_| {
        let poly = cbd(&prf::<ETA2_64>(r, n));
        n += 1;
        poly
    });
    let e2 = cbd(&prf::<ETA2_64>(r, n));

    let y_hat: [[Fq; 256]; K] = core::array::from_fn(|i| ntt(&y[i]));

    let mut u = mul_mat_vec(&a_hat, &y_hat);
    for u_i in &mut u {
        *u_i = ntt_inv(u_i);
    }
    u = add_vecs(&u, &e1);

    let mu_bits = decode_poly(1, m)?;
    let mu = decompress_poly(1, &core::array::from_fn(|i| mu_bits[i].to_u16()));

    let v_pre = ntt_inv(&dot_t_prod(&t_hat, &y_hat));
    let v: [Fq; 256] = core::array::from_fn(|n| v_pre[n].add(e2[n]).add(mu[n]));

    let step = 32 * du as usize;
    for (i, chunk) in ct.chunks_mut(step).enumerate().take(K) {
        let compressed = compress_poly(du, &u[i]);
        let as_fq: [Fq; 256] = core::array::from_fn(|n| Fq::from_canonical(compressed[n]));
        encode_poly(du, &as_fq, chunk);
    }

    let compressed_v = compress_poly(dv, &v);
    let v_as_fq: [Fq; 256] = core::array::from_fn(|i| Fq::from_canonical(compressed_v[i]));
    encode_poly(dv, &v_as_fq, &mut ct[K * step..]);

    Ok(())
}

/// `K-PKE.Decrypt(dk_PKE, c)`: recovers the 32-byte message from a
/// ciphertext using the private key `dk_PKE`.
pub(crate) fn k_pke_decrypt<const K: usize>(
    du: u32, dv: u32, dk_pke: &[u8], ct: &[u8],
) -> Result<[u8; 32], &'static str> {
    debug_assert_eq!(dk_pke.len(), 384 * K, "k_pke_decrypt: dk_pke not 384*K");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "k_pke_decrypt: ct not 32*(du*K+dv)"
    );

    let c1 = &ct[0..32 * du as usize * K];
    let c2 = &ct[32 * du as usize * K..32 * (du as usize * K + dv as usize)];

    let mut u = [[Fq::zero(); 256]; K];
    for (i, chunk) in c1.chunks(32 * du as usize).enumerate().take(K) {
        let packed = decode_poly(du, chunk)?;
        u[i] = decompress_poly(du, &core::array::from_fn(|n| packed[n].to_u16()));
    }

    let packed_v = decode_poly(dv, c2)?;
    let v = decompress_poly(dv, &core::array::from_fn(|n| packed_v[n].to_u16()));

    let mut s_hat = [[Fq::zero(); 256]; K];
    for (i, chunk) in dk_pke.chunks(384).enumerate() {
        s_hat[i] = decode_poly(12, chunk)?;
    }

    let ntt_u: [[Fq; 256]; K] = core::array::from_fn(|i| ntt(&u[i]));
    let st_ntt_u = dot_t_prod(&s_hat, &ntt_u);
    let recovered_noise = ntt_inv(&st_ntt_u);
    let w: [Fq; 256] = core::array::from_fn(|i| v[i].sub(recovered_noise[i]));

    let compressed_w = compress_poly(1, &w);
    let w_as_fq: [Fq; 256] = core::array::from_fn(|i| Fq::from_canonical(compressed_w[i]));
    let mut m = [0u8; 32];
    encode_poly(1, &w_as_fq, &mut m);

    Ok(m)
}

#[cfg(test)]
mod tests {
    use rand_core::{RngCore, SeedableRng};

    use crate::k_pke::{k_pke_decrypt, k_pke_encrypt, k_pke_key_gen};

    const DU: u32 = 10;
    const DV: u32 = 4;
    const K: usize = 2;
    const ETA1_64: usize = 3 * 64;
    const ETA2_64: usize = 2 * 64;
    const EK_LEN: usize = 800;
    const DK_LEN: usize = 768;
    const CT_LEN: usize = 768;

    #[test]
    fn round_trips_an_arbitrary_message() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];
        let mut m = [0u8; 32];
        let mut r = [0u8; 32];
        let mut d = [0u8; 32];
        rng.try_fill_bytes(&mut d).unwrap();
        rng.try_fill_bytes(&mut m).unwrap();
        rng.try_fill_bytes(&mut r).unwrap();

        k_pke_key_gen::<K, ETA1_64>(d, &mut ek, &mut dk);
        k_pke_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &ek, &m, &r, &mut ct).unwrap();
        let recovered = k_pke_decrypt::<K>(DU, DV, &dk, &ct).unwrap();
        assert_eq!(recovered, m);
    }

    #[test]
    fn oversized_public_key_is_rejected() {
        let ff_ek = [0xFFu8; EK_LEN];
        let m = [0u8; 32];
        let r = [0u8; 32];
        let mut ct = [0u8; CT_LEN];
        let res = k_pke_encrypt::<K, ETA1_64, ETA2_64>(DU, DV, &ff_ek, &m, &r, &mut ct);
        assert!(res.is_err());
    }
}
