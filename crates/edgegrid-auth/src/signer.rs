//! EdgeGrid request signing.
//!
//! Signing a request runs in four steps:
//!
//! 1. Choose the timestamp (clock) and nonce (random source) unless supplied.
//! 2. Render the credential prefix
//!    `EG1-HMAC-SHA256 client_token=T;access_token=A;timestamp=S;nonce=N;`.
//! 3. Build the canonical signing string (see [`crate::canonical`]).
//! 4. Derive the signing key from the secret and timestamp, then sign the
//!    canonical string with it.
//!
//! ```text
//! SigningKey = base64(HMAC-SHA256(client_secret, timestamp))
//! Signature  = base64(HMAC-SHA256(SigningKey, signing_string))
//! ```
//!
//! The timestamp chosen in step 1 feeds both the prefix and the key
//! derivation.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use tracing::debug;

use crate::canonical::build_signing_string;
use crate::config::SignerConfig;
use crate::credentials::CredentialSet;
use crate::error::AuthError;
use crate::source::{Clock, NonceSource, OsNonceSource, SystemClock};

/// The authorization scheme token.
pub const ALGORITHM: &str = "EG1-HMAC-SHA256";

/// `chrono` format of the timestamp field, e.g. `20230101T00:00:00+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H:%M:%S%z";

/// Signed-headers field of the canonical string. No headers are bound.
pub const SIGNED_HEADERS: &str = "";

/// Number of random bytes in a generated nonce.
pub const NONCE_LEN: usize = 8;

type HmacSha256 = Hmac<Sha256>;

/// Produces and checks EdgeGrid authorization strings.
///
/// A `Signer` holds no per-request state and can be shared across threads.
///
/// # Examples
///
/// ```
/// use edgegrid_auth::{CredentialSet, Signer};
///
/// let creds = CredentialSet::new("ct1", "at1", "sec1", "example.com", "https");
/// let header = Signer::default()
///     .sign(&creds, "GET", "/config-dns/v1/zones", b"")
///     .unwrap();
/// assert!(header.starts_with("EG1-HMAC-SHA256 client_token=ct1;access_token=at1;"));
/// ```
#[derive(Debug, Clone)]
pub struct Signer {
    config: SignerConfig,
    nonce_source: Arc<dyn NonceSource>,
    clock: Arc<dyn Clock>,
}

impl Default for Signer {
    fn default() -> Self {
        Self::new(SignerConfig::default())
    }
}

impl Signer {
    /// Create a signer backed by OS entropy and the system clock.
    #[must_use]
    pub fn new(config: SignerConfig) -> Self {
        Self::with_sources(config, Arc::new(OsNonceSource), Arc::new(SystemClock))
    }

    /// Create a signer with explicit randomness and time sources.
    #[must_use]
    pub fn with_sources(
        config: SignerConfig,
        nonce_source: Arc<dyn NonceSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            nonce_source,
            clock,
        }
    }

    /// The configuration this signer was built with.
    #[must_use]
    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    /// The current time according to this signer's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Produce the authorization string for a request with a fresh timestamp and nonce.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentialSet`] if `credentials` is incomplete, or
    /// [`AuthError::RandomSource`] if no nonce could be generated.
    pub fn sign(
        &self,
        credentials: &CredentialSet,
        method: &str,
        path: &str,
        body: &[u8],
    ) -> Result<String, AuthError> {
        self.sign_with(credentials, method, path, body, None, None)
    }

    /// Produce the authorization string, optionally pinning the timestamp and nonce.
    ///
    /// A `None` or empty `timestamp`/`nonce` is replaced with a generated value.
    ///
    /// # Errors
    ///
    /// See [`Signer::sign`].
    pub fn sign_with(
        &self,
        credentials: &CredentialSet,
        method: &str,
        path: &str,
        body: &[u8],
        timestamp: Option<&str>,
        nonce: Option<&str>,
    ) -> Result<String, AuthError> {
        credentials.validate()?;

        let timestamp = match timestamp.filter(|ts| !ts.is_empty()) {
            Some(ts) => ts.to_owned(),
            None => format_timestamp(self.clock.now()),
        };
        let nonce = match nonce.filter(|n| !n.is_empty()) {
            Some(n) => n.to_owned(),
            None => generate_nonce(self.nonce_source.as_ref())?,
        };

        self.sign_exact(credentials, method, path, body, &timestamp, &nonce)
    }

    /// Produce the authorization string for exactly this timestamp and nonce.
    ///
    /// Never consults the clock or the nonce source, even for empty values.
    pub(crate) fn sign_exact(
        &self,
        credentials: &CredentialSet,
        method: &str,
        path: &str,
        body: &[u8],
        timestamp: &str,
        nonce: &str,
    ) -> Result<String, AuthError> {
        credentials.validate()?;

        let prefix = build_auth_prefix(credentials, timestamp, nonce);
        let signing_string = build_signing_string(
            method,
            &credentials.scheme,
            &credentials.host,
            path,
            body,
            &prefix,
        );

        debug!(
            client_token = %credentials.client_token,
            signing_string = %signing_string.replace('\t', "\\t"),
            "Built EdgeGrid signing string"
        );

        let signing_key = derive_signing_key(&credentials.client_secret, timestamp);
        let signature = compute_signature(signing_key.as_bytes(), &signing_string);

        Ok(format!("{prefix}signature={signature}"))
    }
}

/// Render the credential prefix: the authorization string up to `signature=`.
///
/// # Examples
///
/// ```
/// use edgegrid_auth::CredentialSet;
/// use edgegrid_auth::signer::build_auth_prefix;
///
/// let creds = CredentialSet::new("ct1", "at1", "sec1", "example.com", "https");
/// assert_eq!(
///     build_auth_prefix(&creds, "20230101T00:00:00+0000", "deadbeefcafebabe"),
///     "EG1-HMAC-SHA256 client_token=ct1;access_token=at1;timestamp=20230101T00:00:00+0000;nonce=deadbeefcafebabe;"
/// );
/// ```
#[must_use]
pub fn build_auth_prefix(credentials: &CredentialSet, timestamp: &str, nonce: &str) -> String {
    format!(
        "{ALGORITHM} client_token={};access_token={};timestamp={timestamp};nonce={nonce};",
        credentials.client_token, credentials.access_token
    )
}

/// Format an instant as an EdgeGrid timestamp (`YYYYMMDDThh:mm:ss+0000`).
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Draw [`NONCE_LEN`] bytes from `source` and hex-encode them.
///
/// # Errors
///
/// Propagates [`AuthError::RandomSource`] from the source; there is no fallback.
pub fn generate_nonce(source: &dyn NonceSource) -> Result<String, AuthError> {
    let mut buf = [0u8; NONCE_LEN];
    source.fill(&mut buf)?;
    Ok(hex::encode(buf))
}

/// Derive the timestamp-bound signing key: `base64(HMAC-SHA256(secret, timestamp))`.
#[must_use]
pub fn derive_signing_key(client_secret: &str, timestamp: &str) -> String {
    BASE64.encode(hmac_sha256(client_secret.as_bytes(), timestamp.as_bytes()))
}

/// Compute `base64(HMAC-SHA256(signing_key, data))`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    BASE64.encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Compute HMAC-SHA256 and return the raw bytes.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
