//! Integration tests for the EdgeGrid gateway.
//!
//! These tests require a running `edgegrid-gateway` at `localhost:8080`,
//! started with the credentials below. They are marked `#[ignore]` so they
//! don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! EDGEGRID_CLIENT_TOKEN=ct1 EDGEGRID_ACCESS_TOKEN=at1 EDGEGRID_CLIENT_SECRET=sec1 \
//! EDGEGRID_HOST=localhost:8080 EDGEGRID_SCHEME=http cargo run -p edgegrid-gateway &
//! cargo test -p edgegrid-integration -- --ignored
//! ```

use std::sync::Once;

use anyhow::{Context, Result};
use edgegrid_auth::{CredentialSet, Signer, sign_request};

mod test_gateway;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Host (authority) of the gateway under test.
fn gateway_host() -> String {
    std::env::var("EDGEGRID_HOST").unwrap_or_else(|_| "localhost:8080".to_owned())
}

/// Credentials matching the gateway's configuration.
#[must_use]
pub fn test_credentials() -> CredentialSet {
    CredentialSet::new(
        std::env::var("EDGEGRID_CLIENT_TOKEN").unwrap_or_else(|_| "ct1".to_owned()),
        std::env::var("EDGEGRID_ACCESS_TOKEN").unwrap_or_else(|_| "at1".to_owned()),
        std::env::var("EDGEGRID_CLIENT_SECRET").unwrap_or_else(|_| "sec1".to_owned()),
        gateway_host(),
        "http",
    )
}

/// Send a request signed with `credentials` and return the status and JSON body.
///
/// # Errors
///
/// Fails if signing, sending, or decoding the response fails.
pub async fn send_signed(
    credentials: &CredentialSet,
    method: reqwest::Method,
    path: &str,
    body: &[u8],
) -> Result<(reqwest::StatusCode, serde_json::Value)> {
    init_tracing();

    let mut request = http::Request::builder()
        .method(method.clone())
        .uri(path)
        .body(body.to_vec())
        .context("failed to build request")?;
    sign_request(&Signer::default(), credentials, &mut request)
        .context("failed to sign request")?;

    let header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .context("signed request has no Authorization header")?
        .to_str()
        .context("Authorization header is not ASCII")?;
    send_with_header(method, path, body, Some(header)).await
}

/// Send a request with an explicit (or no) `Authorization` header.
///
/// # Errors
///
/// Fails if sending or decoding the response fails.
pub async fn send_with_header(
    method: reqwest::Method,
    path: &str,
    body: &[u8],
    authorization: Option<&str>,
) -> Result<(reqwest::StatusCode, serde_json::Value)> {
    init_tracing();

    let url = format!("http://{}{path}", gateway_host());
    let mut request = reqwest::Client::new()
        .request(method, &url)
        .header(reqwest::header::ACCEPT, "application/json")
        .body(body.to_vec());
    if let Some(value) = authorization {
        request = request.header(reqwest::header::AUTHORIZATION, value);
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    let status = response.status();
    let json = response
        .json::<serde_json::Value>()
        .await
        .context("response was not JSON")?;
    Ok((status, json))
}
