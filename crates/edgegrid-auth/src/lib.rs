//! EdgeGrid request signing and verification.
//!
//! This crate implements the `EG1-HMAC-SHA256` authorization scheme used to
//! authenticate HTTP API calls. It covers both sides of the exchange: API
//! clients sign outgoing requests, and receiving components (or tests) parse
//! and verify the authorization string.
//!
//! # Overview
//!
//! An authorization string looks like:
//!
//! ```text
//! EG1-HMAC-SHA256 client_token=T;access_token=A;timestamp=S;nonce=N;signature=SIG
//! ```
//!
//! The signature is an HMAC-SHA256 over a tab-joined canonical form of the
//! request, keyed by an intermediate key that is itself an HMAC of the
//! timestamp under the client secret.
//!
//! # Usage
//!
//! ```rust
//! use edgegrid_auth::{CredentialSet, parse_header, sign, verify};
//!
//! let creds = CredentialSet::new("ct1", "at1", "sec1", "example.com", "https");
//!
//! let header = sign(&creds, "GET", "/config-dns/v1/zones/example.com", b"").unwrap();
//! let info = parse_header(&header).unwrap();
//! assert!(verify(&creds, "GET", "/config-dns/v1/zones/example.com", b"", &info).unwrap());
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical signing-string construction
//! - [`config`] - Signer configuration
//! - [`credentials`] - Credential sets and credential lookup
//! - [`error`] - Error types
//! - [`header`] - Authorization header parsing
//! - [`request`] - Signing and verifying `http` requests
//! - [`signer`] - Signing and the protocol constants
//! - [`source`] - Randomness and clock capabilities
//! - [`verify`] - Verification of presented authorization strings

pub mod canonical;
pub mod config;
pub mod credentials;
pub mod error;
pub mod header;
pub mod request;
pub mod signer;
pub mod source;
pub mod verify;

pub use config::SignerConfig;
pub use credentials::{CredentialProvider, CredentialSet, StaticCredentialProvider};
pub use error::AuthError;
pub use header::{AuthHeaderInfo, parse_header};
pub use request::{AuthContext, sign_request, verify_request};
pub use signer::Signer;
pub use source::{Clock, NonceSource};

/// Sign a request with OS entropy and the system clock.
///
/// # Errors
///
/// See [`Signer::sign`].
pub fn sign(
    credentials: &CredentialSet,
    method: &str,
    path: &str,
    body: &[u8],
) -> Result<String, AuthError> {
    Signer::default().sign(credentials, method, path, body)
}

/// Verify a parsed authorization header against a request.
///
/// # Errors
///
/// See [`Signer::verify`].
pub fn verify(
    credentials: &CredentialSet,
    method: &str,
    path: &str,
    body: &[u8],
    info: &AuthHeaderInfo,
) -> Result<bool, AuthError> {
    Signer::default().verify(credentials, method, path, body, info)
}
