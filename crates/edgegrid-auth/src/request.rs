//! EdgeGrid authentication for `http` requests.
//!
//! [`sign_request`] is what API client wrappers call before sending a request:
//! it signs the method, path-and-query and body and sets the `Authorization`
//! header. [`verify_request`] is the receiving side: it reads the header,
//! resolves the caller's credential set by client token and verifies it.

use chrono::DateTime;
use tracing::debug;

use crate::credentials::{CredentialProvider, CredentialSet};
use crate::error::AuthError;
use crate::header::{AuthHeaderInfo, parse_header};
use crate::signer::{Signer, TIMESTAMP_FORMAT};

/// The result of a successful request verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The client token that signed the request.
    pub client_token: String,
    /// The access token presented with the request.
    pub access_token: String,
    /// The timestamp the request was signed at.
    pub timestamp: String,
}

/// Sign an outgoing request in place.
///
/// Sets `Authorization` to the EdgeGrid credential string and `Accept` to
/// `application/json` when the caller has not chosen one.
///
/// # Errors
///
/// Returns the signer's errors, or [`AuthError::InvalidRequest`] if the
/// credential string cannot be represented as a header value.
pub fn sign_request<B: AsRef<[u8]>>(
    signer: &Signer,
    credentials: &CredentialSet,
    request: &mut http::Request<B>,
) -> Result<(), AuthError> {
    let path = request
        .uri()
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str)
        .to_owned();

    let header = signer.sign(
        credentials,
        request.method().as_str(),
        &path,
        request.body().as_ref(),
    )?;
    let value = http::HeaderValue::from_str(&header)
        .map_err(|e| AuthError::InvalidRequest(format!("unrepresentable header value: {e}")))?;

    let headers = request.headers_mut();
    headers.insert(http::header::AUTHORIZATION, value);
    headers
        .entry(http::header::ACCEPT)
        .or_insert(http::HeaderValue::from_static("application/json"));

    debug!(
        method = %request.method(),
        path = %path,
        "Signed EdgeGrid request"
    );
    Ok(())
}

/// Verify an incoming EdgeGrid-signed request.
///
/// This function:
/// 1. Parses the `Authorization` header
/// 2. Resolves the credential set via the provider
/// 3. Optionally checks the timestamp against the configured clock skew
/// 4. Recomputes and compares the full authorization string
///
/// # Errors
///
/// Returns an [`AuthError`] if:
/// - The `Authorization` header is missing or malformed
/// - The timestamp is outside the allowed skew
/// - The authorization string does not match, including an unknown client
///   token; both are [`AuthError::SignatureDoesNotMatch`]
pub fn verify_request(
    signer: &Signer,
    parts: &http::request::Parts,
    body: &[u8],
    credential_provider: &dyn CredentialProvider,
) -> Result<AuthContext, AuthError> {
    let auth_header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let info = parse_header(auth_header)?;
    debug!(client_token = %info.client_token, "Parsed EdgeGrid authorization header");

    let credentials = credential_provider
        .get_credentials(&info.client_token)
        .map_err(|e| match e {
            AuthError::UnknownClientToken(token) => {
                debug!(client_token = %token, "Unknown EdgeGrid client token");
                AuthError::SignatureDoesNotMatch
            }
            other => other,
        })?;

    if let Some(max_skew) = signer.config().max_clock_skew_secs {
        check_clock_skew(signer, &info, max_skew)?;
    }

    let path = parts
        .uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);

    if signer.verify(&credentials, parts.method.as_str(), path, body, &info)? {
        Ok(AuthContext {
            client_token: info.client_token,
            access_token: info.access_token,
            timestamp: info.timestamp,
        })
    } else {
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Reject timestamps further than `max_skew_secs` from the signer's clock.
fn check_clock_skew(
    signer: &Signer,
    info: &AuthHeaderInfo,
    max_skew_secs: u64,
) -> Result<(), AuthError> {
    let signed_at = DateTime::parse_from_str(&info.timestamp, TIMESTAMP_FORMAT)
        .map_err(|_| AuthError::MalformedHeader)?;
    let skew = (signer.now() - signed_at.to_utc()).num_seconds().unsigned_abs();
    if skew > max_skew_secs {
        debug!(
            timestamp = %info.timestamp,
            skew,
            max_skew_secs,
            "Request timestamp outside allowed skew"
        );
        return Err(AuthError::TimestampOutOfRange);
    }
    Ok(())
}
