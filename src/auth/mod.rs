// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication and role-based authorization.
//!
//! ## Auth Flow
//!
//! 1. Client calls `POST /signIn` with username and password
//! 2. Server checks the bcrypt hash and returns an HS256 token
//! 3. Client sends `Authorization: Bearer <token>` on later requests
//! 4. Server, per request:
//!    - Verifies the signature, then the expiry
//!    - Looks up the subject's current roles
//!    - Stores an `AuthResult` in the request extensions
//! 5. Each route's `RoutePolicy` guard allows or refuses with 401
//!
//! ## Security
//!
//! - No server-side sessions; the signing key is the only shared state
//! - Signature is checked before any claim is trusted
//! - No clock skew tolerance
//! - Every refusal is a 401 with the same body shape, never a 403

pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod middleware;
pub mod roles;
pub mod sign_in;
pub mod signer;
pub mod token;
pub mod unauthorized;

pub use claims::{AuthResult, Claims, Principal, RejectionReason};
pub use credentials::{BcryptHasher, CredentialStore, InMemoryCredentialStore, PasswordHasher};
pub use error::{AuthFailure, SignerError, TokenError};
pub use extractor::{Auth, OptionalAuth};
pub use guard::{protect, AuthorizationGuard, Decision};
pub use middleware::AuthenticationPipeline;
pub use roles::{Role, RoutePolicy};
pub use sign_in::{Credentials, SignInExchange, SignInResult};
pub use signer::Signer;
pub use token::TokenService;
pub use unauthorized::Unauthorized;
