// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! None of these types implement `IntoResponse`: token and credential
//! failures never reach the caller with their specific kind. The HTTP-facing
//! rendering lives in [`super::unauthorized`].

use thiserror::Error;

/// Reason a token could not be issued or verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token does not have the expected structure or its header/claims do
    /// not decode
    #[error("token is malformed")]
    Malformed,
    /// Signature does not match the header and claims
    #[error("token signature is invalid")]
    BadSignature,
    /// Signature is valid but the validity window has lapsed
    #[error("token has expired")]
    Expired,
    /// Subject is empty at issuance
    #[error("token subject must not be empty")]
    InvalidSubject,
    /// Expiry cannot be represented at issuance
    #[error("token lifetime is out of range")]
    LifetimeOutOfRange,
}

impl TokenError {
    /// Stable identifier used in structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
            TokenError::InvalidSubject => "invalid_subject",
            TokenError::LifetimeOutOfRange => "lifetime_out_of_range",
        }
    }
}

/// Signing key could not be loaded.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("signing key is empty")]
    EmptyKey,
    #[error("signing key is {len} bytes, at least {min} are required")]
    KeyTooShort { len: usize, min: usize },
    #[error("signing key is not valid base64")]
    InvalidEncoding,
}

/// Sign-in failure.
///
/// Unknown user and wrong password collapse into the same variant so callers
/// cannot tell which one happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("bad credentials")]
    BadCredentials,
}

/// Credential store lookup failed for a reason other than "not found".
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Password hashing failed.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_error_codes_are_stable() {
        assert_eq!(TokenError::Malformed.code(), "malformed");
        assert_eq!(TokenError::BadSignature.code(), "bad_signature");
        assert_eq!(TokenError::Expired.code(), "expired");
        assert_eq!(TokenError::InvalidSubject.code(), "invalid_subject");
        assert_eq!(
            TokenError::LifetimeOutOfRange.code(),
            "lifetime_out_of_range"
        );
    }

    #[test]
    fn signer_error_mentions_lengths() {
        let err = SignerError::KeyTooShort { len: 5, min: 32 };
        assert_eq!(
            err.to_string(),
            "signing key is 5 bytes, at least 32 are required"
        );
    }
}
