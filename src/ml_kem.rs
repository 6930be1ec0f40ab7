//! C8: ML-KEM proper, the Fujisaki-Okamoto wrapper around K-PKE that
//! upgrades it from IND-CPA to IND-CCA2 security. See FIPS 203 Algorithms
//! 16-21.

use rand_core::CryptoRngCore;

use crate::byte_fns::{decode_12, encode_12};
use crate::ct::{ct_memcmp, ct_select};
use crate::hashing::{g, h, j};
use crate::k_pke::{k_pke_decrypt, k_pke_encrypt, k_pke_key_gen};
use crate::SharedSecretKey;

/// `ML-KEM.KeyGen_internal(d, z)`: deterministic core of key generation,
/// given both random inputs explicitly.
pub(crate) fn ml_kem_key_gen_internal<const K: usize, const ETA1_64: usize>(
    d: [u8; 32], z: [u8; 32], ek: &mut [u8], dk: &mut [u8],
) {
    debug_assert_eq!(ek.len(), 384 * K + 32, "ml_kem_key_gen_internal: ek len");
    debug_assert_eq!(dk.len(), 768 * K + 96, "ml_kem_key_gen_internal: dk len");

    let p1 = 384 * K;
    k_pke_key_gen::<K, ETA1_64>(d, ek, &mut dk[..p1]);

    let h_ek = h(ek);
    let p2 = p1 + ek.len();
    let p3 = p2 + h_ek.len();
    dk[p1..p2].copy_from_slice(ek);
    dk[p2..p3].copy_from_slice(&h_ek);
    dk[p3..].copy_from_slice(&z);
}

/// `ML-KEM.Encaps_internal(ek, m)`: deterministic core of encapsulation,
/// given the random message `m` explicitly.
fn ml_kem_encaps_internal<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    du: u32, dv: u32, m: &[u8; 32], ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKey, &'static str> {
    let h_ek = h(ek);
    let (k, r) = g(&[m, &h_ek]);
    k_pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek, m, &r, ct)?;
    Ok(SharedSecretKey(k))
}

/// `ML-KEM.Decaps_internal(dk, c)`: recovers the shared secret, applying
/// implicit rejection (via `ct_select`) if the re-encryption check fails.
#[allow(clippy::similar_names)]
fn ml_kem_decaps_internal<const K: usize, const ETA1_64: usize, const ETA2_64: usize, const CT_LEN: usize>(
    du: u32, dv: u32, dk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, &'static str> {
    debug_assert_eq!(dk.len(), 768 * K + 96, "ml_kem_decaps_internal: dk len");

    let dk_pke = &dk[0..384 * K];
    let ek_pke = &dk[384 * K..768 * K + 32];
    let h_stored = &dk[768 * K + 32..768 * K + 64];
    let z: &[u8; 32] = dk[768 * K + 64..768 * K + 96].try_into().expect("ml_kem_decaps_internal: z slice");

    let m_prime = k_pke_decrypt::<K>(du, dv, dk_pke, ct)?;
    let (k_prime, r_prime) = g(&[&m_prime, h_stored]);
    let k_bar = j(z, ct);

    let mut c_prime = [0u8; CT_LEN];
    k_pke_encrypt::<K, ETA1_64, ETA2_64>(du, dv, ek_pke, &m_prime, &r_prime, &mut c_prime)?;

    let matched = ct_memcmp(ct, &c_prime);
    let mut k_out = [0u8; 32];
    // select k_prime when the re-encryption matched, else the implicit-rejection key k_bar.
    ct_select(matched, &k_prime, &k_bar, &mut k_out);

    Ok(SharedSecretKey(k_out))
}

/// `ML-KEM.KeyGen()`: draws fresh randomness from `rng` and runs key
/// generation.
pub(crate) fn ml_kem_key_gen<const K: usize, const ETA1_64: usize>(
    rng: &mut impl CryptoRngCore, ek: &mut [u8], dk: &mut [u8],
) -> Result<(), &'static str> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "ml_kem_key_gen: ek len");
    debug_assert_eq!(dk.len(), 768 * K + 96, "ml_kem_key_gen: dk len");

    let mut d = [0u8; 32];
    rng.try_fill_bytes(&mut d).map_err(|_| "ml_kem_key_gen: rng failed for d")?;
    let mut z = [0u8; 32];
    rng.try_fill_bytes(&mut z).map_err(|_| "ml_kem_key_gen: rng failed for z")?;

    ml_kem_key_gen_internal::<K, ETA1_64>(d, z, ek, dk);
    Ok(())
}

/// `ML-KEM.Encaps(ek)`: draws fresh randomness from `rng` and runs
/// encapsulation. `ek` must already have passed the modulus check (done by
/// the caller, since an externally-supplied `ek` only arrives via
/// `SerDes::try_from_bytes`).
pub(crate) fn ml_kem_encaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize>(
    rng: &mut impl CryptoRngCore, du: u32, dv: u32, ek: &[u8], ct: &mut [u8],
) -> Result<SharedSecretKey, &'static str> {
    debug_assert_eq!(ek.len(), 384 * K + 32, "ml_kem_encaps: ek len");
    debug_assert_eq!(
        ct.len(),
        32 * (du as usize * K + dv as usize),
        "ml_kem_encaps: ct len"
    );
    debug_assert!(ek_passes_modulus_check::<K>(ek), "ml_kem_encaps: ek fails modulus check");

    let mut m = [0u8; 32];
    rng.try_fill_bytes(&mut m).map_err(|_| "ml_kem_encaps: rng failed")?;
    ml_kem_encaps_internal::<K, ETA1_64, ETA2_64>(du, dv, &m, ek, ct)
}

/// `ML-KEM.Decaps(dk, c)`: the one public entry point for decapsulation.
pub(crate) fn ml_kem_decaps<const K: usize, const ETA1_64: usize, const ETA2_64: usize, const CT_LEN: usize>(
    du: u32, dv: u32, dk: &[u8], ct: &[u8; CT_LEN],
) -> Result<SharedSecretKey, &'static str> {
    debug_assert_eq!(ct.len(), 32 * (du as usize * K + dv as usize), "ml_kem_decaps: ct len");
    debug_assert_eq!(dk.len(), 768 * K + 96, "ml_kem_decaps: dk len");
    ml_kem_decaps_internal::<K, ETA1_64, ETA2_64, CT_LEN>(du, dv, dk, ct)
}

/// `ek = ByteEncode_12(ByteDecode_12(ek))`: the public-key modulus check of
/// FIPS 203 §7.2 item (2), run per-`K`-chunk.
#[must_use]
pub(crate) fn ek_passes_modulus_check<const K: usize>(ek: &[u8]) -> bool {
    for i in 0..K {
        let chunk = &ek[384 * i..384 * (i + 1)];
        let Ok(poly) = decode_12(chunk) else { return false };
        let mut re_encoded = [0u8; 384];
        encode_12(&poly, &mut re_encoded);
        if !ct_memcmp(&re_encoded, chunk) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use rand_core::SeedableRng;

    use crate::ml_kem::{ml_kem_decaps, ml_kem_encaps, ml_kem_key_gen};

    const K: usize = 2;
    const ETA1_64: usize = 3 * 64;
    const ETA2_64: usize = 2 * 64;
    const DU: u32 = 10;
    const DV: u32 = 4;
    const EK_LEN: usize = 800;
    const DK_LEN: usize = 1632;
    const CT_LEN: usize = 768;

    #[test]
    #[allow(clippy::similar_names)]
    fn key_gen_encaps_decaps_agree() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];

        ml_kem_key_gen::<K, ETA1_64>(&mut rng, &mut ek, &mut dk).unwrap();
        let ssk_sender = ml_kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, DU, DV, &ek, &mut ct).unwrap();
        let ssk_receiver = ml_kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &dk, &ct).unwrap();
        assert_eq!(ssk_sender, ssk_receiver);
    }

    #[test]
    #[allow(clippy::similar_names)]
    fn tampered_ciphertext_triggers_implicit_rejection() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        let mut ek = [0u8; EK_LEN];
        let mut dk = [0u8; DK_LEN];
        let mut ct = [0u8; CT_LEN];

        ml_kem_key_gen::<K, ETA1_64>(&mut rng, &mut ek, &mut dk).unwrap();
        let ssk_sender = ml_kem_encaps::<K, ETA1_64, ETA2_64>(&mut rng, DU, DV, &ek, &mut ct).unwrap();
        ct[0] ^= 0xFF;
        let ssk_receiver = ml_kem_decaps::<K, ETA1_64, ETA2_64, CT_LEN>(DU, DV, &dk, &ct).unwrap();
        assert_ne!(ssk_sender, ssk_receiver);
    }
}
