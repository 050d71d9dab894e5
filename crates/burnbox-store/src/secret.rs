//! The persisted secret record
//!
//! One JSON shape across backends, round-trippable by the version that wrote
//! it:
//!
//! ```json
//! {
//!   "note": "a hint",
//!   "message": { "iv": "<base64>", "ciphertext": "<base64>" },
//!   "expires": "2026-08-25T12:00:00Z",
//!   "password_protected": true,
//!   "password_hash": "<hex sha-256>",
//!   "password_attempts": 0
//! }
//! ```

use burnbox_crypto::SealedMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored secret: the sealed message plus its policy state.
///
/// Created exactly once by `save`, mutated only by wrong-password
/// bookkeeping, removed by a consuming read, expiry or attempt exhaustion.
/// There is no soft-delete state; gone is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Caller-supplied plaintext metadata (a hint) shown before the password
    /// challenge; never encrypted
    pub note: String,
    /// The sealed message payload
    #[serde(with = "sealed_message")]
    pub message: SealedMessage,
    /// Instant after which the secret reads as gone
    pub expires: DateTime<Utc>,
    /// Whether a caller-supplied password gates this secret
    pub password_protected: bool,
    /// Hex SHA-256 of the caller-supplied password, present exactly when
    /// `password_protected` is set; the default password's digest is never
    /// persisted
    pub password_hash: Option<String>,
    /// Wrong-password submissions so far; only ever increases
    pub password_attempts: u32,
}

impl Secret {
    /// Whether `expires` has passed at `now`. The boundary instant itself is
    /// still readable.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires < now
    }
}

/// Field codec for the message payload: `{ "iv": base64, "ciphertext": base64 }`.
mod sealed_message {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use burnbox_crypto::{IV_SIZE, SealedMessage};
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    #[derive(Serialize, Deserialize)]
    struct Encoded {
        iv: String,
        ciphertext: String,
    }

    pub(super) fn serialize<S: Serializer>(
        message: &SealedMessage,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        Encoded {
            iv: STANDARD.encode(message.iv),
            ciphertext: STANDARD.encode(&message.ciphertext),
        }
        .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<SealedMessage, D::Error> {
        let encoded = Encoded::deserialize(deserializer)?;

        let iv: [u8; IV_SIZE] = STANDARD
            .decode(&encoded.iv)
            .map_err(de::Error::custom)?
            .try_into()
            .map_err(|_| de::Error::custom("iv must be 16 bytes"))?;
        let ciphertext = STANDARD.decode(&encoded.ciphertext).map_err(de::Error::custom)?;

        Ok(SealedMessage { iv, ciphertext })
    }
}
