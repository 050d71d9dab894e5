//! Passphrase key derivation using HKDF

use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::envelope::IV_SIZE;

/// Label used for envelope key derivation
const ENVELOPE_LABEL: &[u8] = b"burnboxEnvelopeV1";

/// Size of the derived `XChaCha20-Poly1305` key (32 bytes)
pub(crate) const KEY_SIZE: usize = 32;

/// Size of the derived `XChaCha20` nonce (24 bytes)
pub(crate) const NONCE_SIZE: usize = 24;

/// Derive the key and nonce for one sealed message.
///
/// The per-secret IV acts as the HKDF salt, so the same passphrase yields
/// unrelated key material (and an unrelated nonce) for every secret.
/// Deterministic: same passphrase and IV always produce the same output.
///
/// The key is returned in a zeroizing wrapper; the nonce is public.
pub(crate) fn derive_envelope_material(
    passphrase: &str,
    iv: &[u8; IV_SIZE],
) -> (Zeroizing<[u8; KEY_SIZE]>, [u8; NONCE_SIZE]) {
    let hkdf = Hkdf::<Sha256>::new(Some(iv), passphrase.as_bytes());

    let mut okm = Zeroizing::new([0u8; KEY_SIZE + NONCE_SIZE]);
    let Ok(()) = hkdf.expand(ENVELOPE_LABEL, &mut okm[..]) else {
        unreachable!("56 bytes is a valid HKDF-SHA256 output length");
    };

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    key.copy_from_slice(&okm[..KEY_SIZE]);

    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&okm[KEY_SIZE..]);

    (key, nonce)
}

/// Digest a password for stored comparison.
///
/// Lowercase hex SHA-256, the form the persisted record carries. Never used
/// as key material; the envelope key comes from
/// [`derive_envelope_material`].
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let iv = [7u8; IV_SIZE];

        let (key_a, nonce_a) = derive_envelope_material("hunter2", &iv);
        let (key_b, nonce_b) = derive_envelope_material("hunter2", &iv);

        assert_eq!(*key_a, *key_b);
        assert_eq!(nonce_a, nonce_b);
    }

    #[test]
    fn different_passphrases_produce_different_material() {
        let iv = [7u8; IV_SIZE];

        let (key_a, nonce_a) = derive_envelope_material("hunter2", &iv);
        let (key_b, nonce_b) = derive_envelope_material("hunter3", &iv);

        assert_ne!(*key_a, *key_b);
        assert_ne!(nonce_a, nonce_b);
    }

    #[test]
    fn different_ivs_produce_different_material() {
        let (key_a, nonce_a) = derive_envelope_material("hunter2", &[0u8; IV_SIZE]);
        let (key_b, nonce_b) = derive_envelope_material("hunter2", &[1u8; IV_SIZE]);

        assert_ne!(*key_a, *key_b);
        assert_ne!(nonce_a, nonce_b);
    }

    #[test]
    fn empty_passphrase_still_derives() {
        // Policy decides what passphrases are acceptable; derivation must not
        let (key, nonce) = derive_envelope_material("", &[0u8; IV_SIZE]);

        assert_eq!(key.len(), KEY_SIZE);
        assert_eq!(nonce.len(), NONCE_SIZE);
    }

    #[test]
    fn password_digest_matches_known_vector() {
        // SHA-256("password"), independently verifiable
        assert_eq!(
            password_digest("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn password_digest_is_lowercase_hex() {
        let digest = password_digest("AnyPassword123");

        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
