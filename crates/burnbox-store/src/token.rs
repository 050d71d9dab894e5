//! Random identifier generation
//!
//! Secret keys and the generated default password are random alphanumeric
//! strings, long enough that collisions and guessing are negligible.

use rand::Rng;

/// Alphabet for generated tokens (62 alphanumeric characters)
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated secret keys (32 characters, ~190 bits)
pub const KEY_LENGTH: usize = 32;

/// Length of the generated default password (64 characters)
pub const DEFAULT_PASSWORD_LENGTH: usize = 64;

/// Random alphanumeric token of the given length.
pub fn random_token(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect()
}

/// Fresh high-entropy key naming one secret.
pub fn generate_key() -> String {
    random_token(KEY_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_have_the_requested_length() {
        assert_eq!(random_token(0).len(), 0);
        assert_eq!(random_token(1).len(), 1);
        assert_eq!(random_token(64).len(), 64);
    }

    #[test]
    fn tokens_are_alphanumeric() {
        let token = random_token(256);

        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_keys_are_long_enough() {
        assert!(generate_key().len() >= 32);
    }

    #[test]
    fn generated_keys_differ() {
        // 62^32 keyspace makes a collision here effectively impossible
        assert_ne!(generate_key(), generate_key());
    }
}
