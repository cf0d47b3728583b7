//! Canonical signing-string construction for EdgeGrid.
//!
//! The signing string is seven fields joined by a single tab:
//!
//! ```text
//! METHOD\tscheme\thost\t/path\tsigned-headers\tcontent-digest\tcredential-prefix
//! ```
//!
//! The signed-headers field is always empty and the content digest is only
//! present for `POST` requests with a non-empty body. Signer and verifier both
//! build the string through [`build_signing_string`], so they cannot drift.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

use crate::signer::SIGNED_HEADERS;

/// Field separator of the canonical signing string.
const SEPARATOR: &str = "\t";

/// The only method whose body is bound into the signature.
const DIGESTED_METHOD: &str = "POST";

/// Build the canonical signing string for a request.
///
/// `method` is upper-cased and `path` gets a leading `/` if it lacks one.
///
/// # Examples
///
/// ```
/// use edgegrid_auth::canonical::build_signing_string;
///
/// let s = build_signing_string("get", "https", "example.com", "zones", b"", "PREFIX;");
/// assert_eq!(s, "GET\thttps\texample.com\t/zones\t\t\tPREFIX;");
/// ```
#[must_use]
pub fn build_signing_string(
    method: &str,
    scheme: &str,
    host: &str,
    path: &str,
    body: &[u8],
    prefix: &str,
) -> String {
    let method = normalize_method(method);
    let path = normalize_path(path);
    let digest = content_digest(&method, body);

    [
        method.as_str(),
        scheme,
        host,
        path.as_str(),
        SIGNED_HEADERS,
        digest.as_str(),
        prefix,
    ]
    .join(SEPARATOR)
}

/// Upper-case an HTTP method.
#[must_use]
pub fn normalize_method(method: &str) -> String {
    method.to_ascii_uppercase()
}

/// Prepend `/` to a path that does not start with one.
///
/// # Examples
///
/// ```
/// use edgegrid_auth::canonical::normalize_path;
///
/// assert_eq!(normalize_path("/zones"), "/zones");
/// assert_eq!(normalize_path("zones"), "/zones");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

/// Compute the content-digest field.
///
/// Returns `base64(SHA-256(body))` when `method` is exactly `POST` and the body
/// is non-empty, and an empty string otherwise. Bodies of other methods are
/// never digested; remote services expect exactly this behaviour.
#[must_use]
pub fn content_digest(method: &str, body: &[u8]) -> String {
    if method == DIGESTED_METHOD && !body.is_empty() {
        BASE64.encode(Sha256::digest(body))
    } else {
        String::new()
    }
}
