// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HMAC-SHA256 signer holding the process-wide token signing key.
//!
//! The key is loaded once at startup and never exposed again: there is no
//! accessor for it and the `Debug` output is redacted.

use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::SignerError;

type HmacSha256 = Hmac<Sha256>;

/// Minimum key length in bytes (256 bits, the HS256 output size).
pub const MIN_KEY_LEN: usize = 32;

/// Produces and verifies message authentication codes over token payloads.
#[derive(Clone)]
pub struct Signer {
    mac: HmacSha256,
}

impl Signer {
    /// Create a signer from raw key bytes.
    ///
    /// Empty and under-length keys are rejected so a misconfigured deployment
    /// fails at startup instead of signing with a weak key.
    pub fn new(key: &[u8]) -> Result<Self, SignerError> {
        if key.is_empty() {
            return Err(SignerError::EmptyKey);
        }
        if key.len() < MIN_KEY_LEN {
            return Err(SignerError::KeyTooShort {
                len: key.len(),
                min: MIN_KEY_LEN,
            });
        }

        let mac = HmacSha256::new_from_slice(key).map_err(|_| SignerError::EmptyKey)?;
        Ok(Self { mac })
    }

    /// Create a signer from standard base64 key material.
    pub fn from_base64(encoded: &str) -> Result<Self, SignerError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(SignerError::EmptyKey);
        }
        let key = Base64::decode_vec(encoded).map_err(|_| SignerError::InvalidEncoding)?;
        Self::new(&key)
    }

    /// Compute the MAC of `payload`.
    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    /// Check `signature` against a freshly computed MAC of `payload`.
    ///
    /// The comparison is constant-time over the tag length.
    pub fn verify(&self, payload: &[u8], signature: &[u8]) -> bool {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.verify_slice(signature).is_ok()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").field("key", &"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn sign_is_deterministic() {
        let signer = Signer::new(KEY).unwrap();
        assert_eq!(signer.sign(b"payload"), signer.sign(b"payload"));
        assert_eq!(signer.sign(b"payload").len(), 32);
    }

    #[test]
    fn verify_accepts_own_signature() {
        let signer = Signer::new(KEY).unwrap();
        let signature = signer.sign(b"payload");
        assert!(signer.verify(b"payload", &signature));
    }

    #[test]
    fn verify_rejects_altered_payload_or_signature() {
        let signer = Signer::new(KEY).unwrap();
        let mut signature = signer.sign(b"payload");
        assert!(!signer.verify(b"payloaD", &signature));

        signature[31] ^= 0x01;
        assert!(!signer.verify(b"payload", &signature));
    }

    #[test]
    fn verify_rejects_truncated_signature() {
        let signer = Signer::new(KEY).unwrap();
        let signature = signer.sign(b"payload");
        assert!(!signer.verify(b"payload", &signature[..16]));
        assert!(!signer.verify(b"payload", &[]));
    }

    #[test]
    fn different_keys_produce_different_signatures() {
        let a = Signer::new(KEY).unwrap();
        let b = Signer::new(b"fedcba9876543210fedcba9876543210").unwrap();
        assert_ne!(a.sign(b"payload"), b.sign(b"payload"));
        assert!(!b.verify(b"payload", &a.sign(b"payload")));
    }

    #[test]
    fn rejects_empty_and_short_keys() {
        assert!(matches!(Signer::new(b""), Err(SignerError::EmptyKey)));
        assert!(matches!(
            Signer::new(b"short"),
            Err(SignerError::KeyTooShort { len: 5, min: 32 })
        ));
    }

    #[test]
    fn from_base64_decodes_key_material() {
        let encoded = Base64::encode_string(KEY);
        let signer = Signer::from_base64(&encoded).unwrap();
        let direct = Signer::new(KEY).unwrap();
        assert_eq!(signer.sign(b"payload"), direct.sign(b"payload"));
    }

    #[test]
    fn from_base64_rejects_bad_input() {
        assert!(matches!(Signer::from_base64("   "), Err(SignerError::EmptyKey)));
        assert!(matches!(
            Signer::from_base64("not base64!!"),
            Err(SignerError::InvalidEncoding)
        ));
        assert!(matches!(
            Signer::from_base64(&Base64::encode_string(b"tiny")),
            Err(SignerError::KeyTooShort { .. })
        ));
    }

    #[test]
    fn debug_output_hides_key() {
        let signer = Signer::new(KEY).unwrap();
        let rendered = format!("{signer:?}");
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("0123456789abcdef"));
    }
}
