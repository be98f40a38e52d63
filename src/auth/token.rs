// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification.
//!
//! ## Wire Format
//!
//! `base64url(header) "." base64url(claims) "." base64url(hmac)`, all
//! segments unpadded. The header is fixed to `{"alg":"HS256","typ":"JWT"}`,
//! so tokens are HS256 JWTs readable by standard tooling.
//!
//! ## Verification Order
//!
//! 1. Structure: exactly three non-empty segments
//! 2. Signature over `header.claims`
//! 3. Header algorithm
//! 4. Claims decoding
//! 5. Expiry (`exp > now`, no leeway)
//!
//! Nothing inside the header or claims is read until step 2 passes.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::claims::Claims;
use super::error::TokenError;
use super::signer::Signer;

const SEGMENT_DELIMITER: char = '.';
const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Issues and verifies signed bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    signer: Signer,
}

impl TokenService {
    pub fn new(signer: Signer) -> Self {
        Self { signer }
    }

    /// Issue a token for `subject` valid for `lifetime` from now.
    pub fn issue(&self, subject: &str, lifetime: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, lifetime, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::InvalidSubject);
        }

        let expires_at = now
            .checked_add_signed(lifetime)
            .ok_or(TokenError::LifetimeOutOfRange)?;

        let claims = Claims {
            subject: subject.to_string(),
            issued_at: now.timestamp(),
            expires_at: expires_at.timestamp(),
        };
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        };

        let header_json = serde_json::to_vec(&header).map_err(|_| TokenError::Malformed)?;
        let claims_json = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;

        let signing_input = format!(
            "{}{SEGMENT_DELIMITER}{}",
            Base64UrlUnpadded::encode_string(&header_json),
            Base64UrlUnpadded::encode_string(&claims_json),
        );
        let signature = self.signer.sign(signing_input.as_bytes());

        Ok(format!(
            "{signing_input}{SEGMENT_DELIMITER}{}",
            Base64UrlUnpadded::encode_string(&signature)
        ))
    }

    /// Verify `token` against the signing key and the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let (signing_input, signature) = token
            .rsplit_once(SEGMENT_DELIMITER)
            .ok_or(TokenError::Malformed)?;
        let (header_segment, claims_segment) = signing_input
            .split_once(SEGMENT_DELIMITER)
            .ok_or(TokenError::Malformed)?;

        if header_segment.is_empty()
            || claims_segment.is_empty()
            || signature.is_empty()
            || claims_segment.contains(SEGMENT_DELIMITER)
        {
            return Err(TokenError::Malformed);
        }

        let signature =
            Base64UrlUnpadded::decode_vec(signature).map_err(|_| TokenError::BadSignature)?;
        if !self.signer.verify(signing_input.as_bytes(), &signature) {
            return Err(TokenError::BadSignature);
        }

        let header: Header = decode_segment(header_segment)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let claims: Claims = decode_segment(claims_segment)?;
        if claims.subject.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        if claims.expires_at <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = Base64UrlUnpadded::decode_vec(segment).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
