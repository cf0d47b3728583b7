//! Error types for EdgeGrid signing and verification.
//!
//! All failures are represented by [`AuthError`]. None of the variants carry
//! the client secret; credential problems name the offending field only.

/// Errors that can occur while signing, parsing, or verifying EdgeGrid requests.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required field of the credential set is empty.
    #[error("invalid credential set: {0} is empty")]
    InvalidCredentialSet(&'static str),

    /// The secure random source could not produce a nonce.
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// The authorization string is structurally invalid.
    #[error("Invalid auth header format")]
    MalformedHeader,

    /// An expected authorization field is absent or out of order.
    #[error("Missing key {0}")]
    MissingKey(&'static str),

    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// No credential set is registered for the presented client token.
    #[error("Unknown client token: {0}")]
    UnknownClientToken(String),

    /// The recomputed authorization string does not match the presented one.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,

    /// The presented timestamp is further from the current time than allowed.
    #[error("Request timestamp is outside the allowed clock skew")]
    TimestampOutOfRange,

    /// The request could not be signed (for example, an unrepresentable header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
