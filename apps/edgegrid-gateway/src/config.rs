//! Gateway configuration.
//!
//! All configuration is driven by environment variables.

use anyhow::{Context, Result, bail};
use edgegrid_auth::{CredentialSet, SignerConfig};

/// Output format of the gateway's logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown LOG_FORMAT: {other}"),
        }
    }
}

/// Configuration for the verification gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address.
    pub listen: String,
    /// Log level filter, used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// The credential set requests are verified against.
    pub credentials: CredentialSet,
    /// Signer settings (clock skew).
    pub signer: SignerConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails if a required credential variable is unset or empty, or if
    /// `LOG_FORMAT` is not recognized.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| -> Result<String> {
            let value = lookup(name).with_context(|| format!("{name} is not set"))?;
            if value.is_empty() {
                bail!("{name} is empty");
            }
            Ok(value)
        };

        let credentials = CredentialSet::new(
            required("EDGEGRID_CLIENT_TOKEN")?,
            required("EDGEGRID_ACCESS_TOKEN")?,
            required("EDGEGRID_CLIENT_SECRET")?,
            required("EDGEGRID_HOST")?,
            lookup("EDGEGRID_SCHEME").unwrap_or_else(|| "https".to_owned()),
        );

        let signer = SignerConfig::from_lookup(&lookup);
        let log_format = lookup("LOG_FORMAT")
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            listen: lookup("GATEWAY_LISTEN").unwrap_or_else(|| "0.0.0.0:8080".to_owned()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_owned()),
            log_format,
            credentials,
            signer,
        })
    }
}
