//! Sealed-message envelope using `XChaCha20-Poly1305`
//!
//! Both operations are pure - the initialization vector must be provided by
//! the caller. This enables deterministic testing: the same passphrase, IV
//! and plaintext always produce the same envelope.

use chacha20poly1305::{
    Key, XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};

use crate::{derivation::derive_envelope_material, error::CryptoError};

/// Size of the per-secret initialization vector (16 bytes)
pub const IV_SIZE: usize = 16;

/// A message sealed under the passphrase it was created with.
///
/// Produced once per secret and never mutated. The IV is public; the
/// ciphertext carries the Poly1305 tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// Per-secret initialization vector, fresh random bytes for every seal
    pub iv: [u8; IV_SIZE],
    /// The ciphertext including the 16-byte Poly1305 tag
    pub ciphertext: Vec<u8>,
}

/// Seal a message under a passphrase.
///
/// Key and nonce are derived from the passphrase with the IV as salt, so a
/// reused passphrase never reuses key material across secrets.
///
/// # Security
///
/// - Caller MUST provide cryptographically secure random bytes for `iv` in
///   production; repeating an IV under the same passphrase repeats the nonce
/// - Authenticated encryption prevents undetected tampering
pub fn seal_message(passphrase: &str, plaintext: &str, iv: [u8; IV_SIZE]) -> SealedMessage {
    let (key, nonce) = derive_envelope_material(passphrase, &iv);
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key[..]));

    let Ok(ciphertext) = cipher.encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes()) else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    SealedMessage { iv, ciphertext }
}

/// Open a sealed message with the passphrase it was sealed under.
///
/// # Errors
///
/// - `DecryptionFailed`: wrong passphrase or tampered ciphertext (the
///   authentication tag rejects both the same way), or a plaintext that is
///   not valid UTF-8
pub fn open_message(sealed: &SealedMessage, passphrase: &str) -> Result<String, CryptoError> {
    let (key, nonce) = derive_envelope_material(passphrase, &sealed.iv);
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key[..]));

    let plaintext = cipher
        .decrypt(XNonce::from_slice(&nonce), sealed.ciphertext.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed {
            reason: "authentication failed".to_string(),
        })?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed {
        reason: "plaintext is not valid UTF-8".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_IV: [u8; IV_SIZE] = [0xAB; IV_SIZE];

    const POLY1305_TAG_SIZE: usize = 16;

    #[test]
    fn seal_open_roundtrip() {
        let sealed = seal_message("hunter2", "hello world", TEST_IV);
        let opened = open_message(&sealed, "hunter2").unwrap();

        assert_eq!(opened, "hello world");
    }

    #[test]
    fn seal_open_empty_message() {
        let sealed = seal_message("hunter2", "", TEST_IV);
        let opened = open_message(&sealed, "hunter2").unwrap();

        assert_eq!(opened, "");
    }

    #[test]
    fn seal_open_large_message() {
        let plaintext = "x".repeat(64 * 1024); // 64KB

        let sealed = seal_message("hunter2", &plaintext, TEST_IV);
        let opened = open_message(&sealed, "hunter2").unwrap();

        assert_eq!(opened, plaintext);
    }

    #[test]
    fn seal_open_unicode_message() {
        let plaintext = "пароль 🔥 ∅ ねこ";

        let sealed = seal_message("clé", plaintext, TEST_IV);
        let opened = open_message(&sealed, "clé").unwrap();

        assert_eq!(opened, plaintext);
    }

    #[test]
    fn wrong_passphrase_fails_open() {
        let sealed = seal_message("hunter2", "secret message", TEST_IV);

        let result = open_message(&sealed, "hunter3");

        assert!(matches!(
            result,
            Err(CryptoError::DecryptionFailed { reason })
                if reason.contains("authentication")
        ));
    }

    #[test]
    fn tampered_ciphertext_fails_open() {
        let mut sealed = seal_message("hunter2", "original message", TEST_IV);
        sealed.ciphertext[0] ^= 0xFF;

        assert!(open_message(&sealed, "hunter2").is_err());
    }

    #[test]
    fn tampered_iv_fails_open() {
        let mut sealed = seal_message("hunter2", "original message", TEST_IV);
        sealed.iv[0] ^= 0xFF;

        assert!(open_message(&sealed, "hunter2").is_err());
    }

    #[test]
    fn sealing_is_deterministic_for_fixed_iv() {
        let sealed_a = seal_message("hunter2", "same message", TEST_IV);
        let sealed_b = seal_message("hunter2", "same message", TEST_IV);

        assert_eq!(sealed_a, sealed_b);
    }

    #[test]
    fn different_ivs_produce_different_ciphertexts() {
        let sealed_a = seal_message("hunter2", "same message", [0x00; IV_SIZE]);
        let sealed_b = seal_message("hunter2", "same message", [0x01; IV_SIZE]);

        assert_ne!(sealed_a.ciphertext, sealed_b.ciphertext);
    }

    #[test]
    fn ciphertext_is_plaintext_plus_tag() {
        let plaintext = "test message";

        let sealed = seal_message("hunter2", plaintext, TEST_IV);

        assert_eq!(sealed.ciphertext.len(), plaintext.len() + POLY1305_TAG_SIZE);
    }

    #[test]
    fn iv_is_preserved_in_envelope() {
        let sealed = seal_message("hunter2", "test", TEST_IV);

        assert_eq!(sealed.iv, TEST_IV);
    }
}
