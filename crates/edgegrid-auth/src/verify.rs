//! EdgeGrid authorization verification.
//!
//! Verification re-signs the request with the presented timestamp and nonce
//! and compares the whole recomputed string to the presented one. A mismatch
//! anywhere, not only in the signature, makes the request invalid, and the
//! result never says where the difference was.

use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::credentials::CredentialSet;
use crate::error::AuthError;
use crate::header::AuthHeaderInfo;
use crate::signer::Signer;

impl Signer {
    /// Check a parsed authorization header against a request.
    ///
    /// Returns `Ok(true)` when the header is exactly what this credential set
    /// would produce for the request at the presented timestamp and nonce, and
    /// `Ok(false)` otherwise. The presented values are used as-is, even when
    /// empty; neither the clock nor the nonce source is consulted.
    ///
    /// # Errors
    ///
    /// Returns an error when the expected header cannot be computed at all
    /// (for example an incomplete credential set). Such a request could not be
    /// verified and must not be treated as valid.
    pub fn verify(
        &self,
        credentials: &CredentialSet,
        method: &str,
        path: &str,
        body: &[u8],
        info: &AuthHeaderInfo,
    ) -> Result<bool, AuthError> {
        let expected = self
            .sign_exact(
                credentials,
                method,
                path,
                body,
                &info.timestamp,
                &info.nonce,
            )
            .inspect_err(|e| warn!(error = %e, "Unexpected error while checking request"))?;

        let valid = constant_time_eq(expected.as_bytes(), info.full_header.as_bytes());
        debug!(
            client_token = %info.client_token,
            valid,
            "Verified EdgeGrid authorization"
        );
        Ok(valid)
    }
}

/// Compare two byte strings without short-circuiting on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
