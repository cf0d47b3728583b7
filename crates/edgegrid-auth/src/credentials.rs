//! Credential sets and credential lookup.
//!
//! A [`CredentialSet`] is the token/secret/host tuple a caller signs with. The
//! [`CredentialProvider`] trait resolves a credential set from the client token
//! found in an incoming authorization header, with [`StaticCredentialProvider`]
//! as an in-memory implementation for tests and small deployments.

use std::collections::HashMap;
use std::fmt;

use crate::error::AuthError;

/// The credentials used to sign and verify EdgeGrid requests.
///
/// The `client_secret` is used only as an HMAC key. It is never included in
/// authorization strings, log records, errors, or the `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    /// Opaque client identifier, sent verbatim.
    pub client_token: String,
    /// Opaque access identifier, sent verbatim.
    pub access_token: String,
    /// Shared secret used as the HMAC key.
    pub client_secret: String,
    /// Authority (`hostname[:port]`) the request targets.
    pub host: String,
    /// Transport scheme, e.g. `https`.
    pub scheme: String,
}

impl CredentialSet {
    /// Create a credential set from its five components.
    pub fn new(
        client_token: impl Into<String>,
        access_token: impl Into<String>,
        client_secret: impl Into<String>,
        host: impl Into<String>,
        scheme: impl Into<String>,
    ) -> Self {
        Self {
            client_token: client_token.into(),
            access_token: access_token.into(),
            client_secret: client_secret.into(),
            host: host.into(),
            scheme: scheme.into(),
        }
    }

    /// Check that every field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentialSet`] naming the first empty field.
    pub fn validate(&self) -> Result<(), AuthError> {
        let fields = [
            ("client_token", &self.client_token),
            ("access_token", &self.access_token),
            ("client_secret", &self.client_secret),
            ("host", &self.host),
            ("scheme", &self.scheme),
        ];

        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(AuthError::InvalidCredentialSet(*name)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("client_token", &self.client_token)
            .field("access_token", &self.access_token)
            .field("client_secret", &"<redacted>")
            .field("host", &self.host)
            .field("scheme", &self.scheme)
            .finish()
    }
}

/// Trait for looking up credential sets by client token.
///
/// Implementations may back this with a database, configuration file,
/// or any other credential store.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the credential set registered for `client_token`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownClientToken`] if the token is not recognized.
    fn get_credentials(&self, client_token: &str) -> Result<CredentialSet, AuthError>;
}

/// A simple in-memory credential provider keyed by client token.
///
/// # Examples
///
/// ```
/// use edgegrid_auth::credentials::{CredentialProvider, CredentialSet, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![CredentialSet::new(
///     "ct1", "at1", "sec1", "example.com", "https",
/// )]);
///
/// let creds = provider.get_credentials("ct1").unwrap();
/// assert_eq!(creds.host, "example.com");
/// ```
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, CredentialSet>,
}

impl StaticCredentialProvider {
    /// Create a new provider; later sets replace earlier ones with the same client token.
    pub fn new(credentials: impl IntoIterator<Item = CredentialSet>) -> Self {
        Self {
            credentials: credentials
                .into_iter()
                .map(|set| (set.client_token.clone(), set))
                .collect(),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_credentials(&self, client_token: &str) -> Result<CredentialSet, AuthError> {
        self.credentials
            .get(client_token)
            .cloned()
            .ok_or_else(|| AuthError::UnknownClientToken(client_token.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials() -> CredentialSet {
        CredentialSet::new("ct1", "at1", "sec1", "example.com", "https")
    }

    #[test]
    fn test_should_accept_complete_credential_set() {
        assert!(test_credentials().validate().is_ok());
    }

    #[test]
    fn test_should_name_first_empty_field() {
        let mut creds = test_credentials();
        creds.host = String::new();
        assert!(matches!(
            creds.validate(),
            Err(AuthError::InvalidCredentialSet("host"))
        ));

        creds.access_token = String::new();
        assert!(matches!(
            creds.validate(),
            Err(AuthError::InvalidCredentialSet("access_token"))
        ));
    }

    #[test]
    fn test_should_not_leak_secret_in_validation_error() {
        let mut creds = test_credentials();
        creds.client_secret = String::new();
        let message = creds.validate().unwrap_err().to_string();
        assert_eq!(message, "invalid credential set: client_secret is empty");
    }

    #[test]
    fn test_should_redact_secret_in_debug_output() {
        let rendered = format!("{:?}", test_credentials());
        assert!(!rendered.contains("sec1"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("ct1"));
    }

    #[test]
    fn test_should_return_credentials_for_known_client_token() {
        let provider = StaticCredentialProvider::new(vec![test_credentials()]);

        let result = provider.get_credentials("ct1");
        assert_eq!(result.unwrap(), test_credentials());
    }

    #[test]
    fn test_should_return_error_for_unknown_client_token() {
        let provider = StaticCredentialProvider::new(vec![]);

        let result = provider.get_credentials("UNKNOWN");
        assert!(matches!(result, Err(AuthError::UnknownClientToken(_))));
    }
}
