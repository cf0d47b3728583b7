//! Signer configuration.
//!
//! Configuration is driven by environment variables, like the rest of the
//! workspace. Protocol constants (algorithm name, timestamp format, signed
//! headers) are not configurable; they live in [`crate::signer`].

/// Tunable behaviour of a [`Signer`](crate::signer::Signer).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerConfig {
    /// Maximum distance, in seconds, between a presented timestamp and the
    /// signer's clock accepted by [`verify_request`](crate::request::verify_request).
    ///
    /// `None` disables the check; the core verification never enforces freshness.
    pub max_clock_skew_secs: Option<u64>,
}

impl SignerConfig {
    /// Load configuration from environment variables.
    ///
    /// `EDGEGRID_MAX_CLOCK_SKEW_SECS` sets [`Self::max_clock_skew_secs`]; an
    /// unparsable value leaves the check disabled.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("EDGEGRID_MAX_CLOCK_SKEW_SECS") {
            config.max_clock_skew_secs = parse_skew(&v);
        }

        config
    }
}

fn parse_skew(raw: &str) -> Option<u64> {
    match raw.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            tracing::warn!(value = %raw, "ignoring invalid EDGEGRID_MAX_CLOCK_SKEW_SECS");
            None
        }
    }
}
