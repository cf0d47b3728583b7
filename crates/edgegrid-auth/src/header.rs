//! Parsing of EdgeGrid `Authorization` header values.
//!
//! Format:
//! ```text
//! EG1-HMAC-SHA256 client_token=T;access_token=A;timestamp=S;nonce=N;signature=SIG
//! ```
//!
//! Parsing is strict: the scheme token, the number of segments, and the order
//! of the keys are all part of the wire contract.

use crate::error::AuthError;
use crate::signer::ALGORITHM;

/// Header keys in wire order.
const KEYS: [&str; 5] = [
    "client_token",
    "access_token",
    "timestamp",
    "nonce",
    "signature",
];

/// The fields of a parsed EdgeGrid authorization string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaderInfo {
    /// The client token.
    pub client_token: String,
    /// The access token.
    pub access_token: String,
    /// The signing timestamp, verbatim.
    pub timestamp: String,
    /// The nonce, verbatim.
    pub nonce: String,
    /// The base64 signature.
    pub signature: String,
    /// The complete input string, compared byte-for-byte during verification.
    pub full_header: String,
}

/// Parse an EdgeGrid authorization string into its fields.
///
/// # Errors
///
/// Returns [`AuthError::MalformedHeader`] if the scheme is not
/// `EG1-HMAC-SHA256`, the remainder is not exactly five `;`-separated
/// segments, or a segment has no `=`. Returns [`AuthError::MissingKey`] naming
/// the expected key if a segment carries the wrong key.
///
/// # Examples
///
/// ```
/// use edgegrid_auth::header::parse_header;
///
/// let info = parse_header(
///     "EG1-HMAC-SHA256 client_token=ct1;access_token=at1;timestamp=t;nonce=n;signature=s",
/// )
/// .unwrap();
/// assert_eq!(info.client_token, "ct1");
/// assert_eq!(info.signature, "s");
/// ```
pub fn parse_header(header: &str) -> Result<AuthHeaderInfo, AuthError> {
    let (algorithm, rest) = header.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if algorithm != ALGORITHM {
        return Err(AuthError::MalformedHeader);
    }

    let segments: Vec<&str> = rest.split(';').collect();
    if segments.len() != KEYS.len() {
        return Err(AuthError::MalformedHeader);
    }

    let mut values = [""; 5];
    for (slot, (segment, expected)) in values.iter_mut().zip(segments.iter().zip(KEYS)) {
        let (key, value) = segment.split_once('=').ok_or(AuthError::MalformedHeader)?;
        if key != expected {
            return Err(AuthError::MissingKey(expected));
        }
        *slot = value;
    }

    let [client_token, access_token, timestamp, nonce, signature] = values;
    Ok(AuthHeaderInfo {
        client_token: client_token.to_owned(),
        access_token: access_token.to_owned(),
        timestamp: timestamp.to_owned(),
        nonce: nonce.to_owned(),
        signature: signature.to_owned(),
        full_header: header.to_owned(),
    })
}
