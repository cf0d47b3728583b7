//! Hyper service that verifies EdgeGrid authorization on every request.
//!
//! Any method and path is accepted. The response reports whether the request
//! carried a valid authorization string for the configured credential set:
//! `200 {"valid":true,...}` or `401 {"valid":false}`. The reason for a
//! rejection is logged, never returned. Health-check probes on `/_health` and
//! `/health` are answered without authentication.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use edgegrid_auth::{AuthError, CredentialProvider, Signer, verify_request};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Incoming};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Response body type of the gateway.
pub type GatewayBody = Full<Bytes>;

/// JSON payload describing a verification outcome.
#[derive(Debug, Serialize)]
struct VerificationResponse<'a> {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Gateway that authenticates every incoming request.
#[derive(Clone)]
pub struct GatewayService {
    signer: Arc<Signer>,
    credential_provider: Arc<dyn CredentialProvider>,
}

impl std::fmt::Debug for GatewayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayService")
            .field("signer", &self.signer)
            .field("credential_provider", &"...")
            .finish()
    }
}

impl GatewayService {
    /// Create a gateway verifying against `credential_provider`.
    pub fn new(signer: Signer, credential_provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            signer: Arc::new(signer),
            credential_provider,
        }
    }

    /// Verify a request whose body has already been collected.
    pub fn handle<B>(&self, req: http::Request<B>, body: &[u8]) -> http::Response<GatewayBody> {
        let (parts, _) = req.into_parts();

        if is_health_check(&parts.method, parts.uri.path()) {
            return json_response(http::StatusCode::OK, br#"{"status":"running"}"#.to_vec());
        }

        match verify_request(
            &self.signer,
            &parts,
            body,
            self.credential_provider.as_ref(),
        ) {
            Ok(ctx) => {
                info!(
                    method = %parts.method,
                    path = %parts.uri.path(),
                    client_token = %ctx.client_token,
                    "request authenticated"
                );
                verification_response(
                    http::StatusCode::OK,
                    &VerificationResponse {
                        valid: true,
                        client_token: Some(ctx.client_token.as_str()),
                        error: None,
                    },
                )
            }
            Err(err) => {
                warn!(
                    method = %parts.method,
                    path = %parts.uri.path(),
                    error = %err,
                    "request rejected"
                );
                verification_response(status_for(&err), &VerificationResponse {
                    valid: false,
                    client_token: None,
                    error: None,
                })
            }
        }
    }
}

impl hyper::service::Service<http::Request<Incoming>> for GatewayService {
    type Response = http::Response<GatewayBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let svc = self.clone();
        Box::pin(async move {
            let (parts, incoming) = req.into_parts();
            let body = match collect_body(incoming).await {
                Ok(body) => body,
                Err(message) => {
                    return Ok(verification_response(
                        http::StatusCode::BAD_REQUEST,
                        &VerificationResponse {
                            valid: false,
                            client_token: None,
                            error: Some(message),
                        },
                    ));
                }
            };
            debug!(len = body.len(), "collected request body");
            Ok(svc.handle(http::Request::from_parts(parts, ()), &body))
        })
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body<B>(incoming: B) -> Result<Bytes, String>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| format!("Failed to read request body: {e}"))
}

/// Map an authentication failure to an HTTP status.
///
/// Verification failures of any kind are a plain 401 with the same body; it
/// does not say which part of the authorization string was wrong.
fn status_for(err: &AuthError) -> http::StatusCode {
    match err {
        AuthError::InvalidCredentialSet(_) | AuthError::RandomSource(_) => {
            http::StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => http::StatusCode::UNAUTHORIZED,
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/health")
}

fn verification_response(
    status: http::StatusCode,
    payload: &VerificationResponse<'_>,
) -> http::Response<GatewayBody> {
    match serde_json::to_vec(payload) {
        Ok(body) => json_response(status, body),
        Err(e) => {
            warn!(error = %e, "failed to serialize verification response");
            json_response(http::StatusCode::INTERNAL_SERVER_ERROR, b"{}".to_vec())
        }
    }
}

fn json_response(status: http::StatusCode, body: Vec<u8>) -> http::Response<GatewayBody> {
    let mut response = http::Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use edgegrid_auth::{CredentialSet, StaticCredentialProvider, sign_request};

    use super::*;

    fn test_credentials() -> CredentialSet {
        CredentialSet::new("ct1", "at1", "sec1", "example.com", "https")
    }

    fn test_gateway() -> GatewayService {
        GatewayService::new(
            Signer::default(),
            Arc::new(StaticCredentialProvider::new(vec![test_credentials()])),
        )
    }

    async fn body_bytes(response: http::Response<GatewayBody>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    async fn body_json(response: http::Response<GatewayBody>) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn signed_get(credentials: &CredentialSet) -> http::Request<Vec<u8>> {
        let mut req = http::Request::builder()
            .uri("/config-dns/v1/zones/example.com")
            .body(Vec::new())
            .unwrap();
        sign_request(&Signer::default(), credentials, &mut req).unwrap();
        req
    }

    #[tokio::test]
    async fn test_should_accept_signed_request() {
        let mut req = http::Request::builder()
            .method("POST")
            .uri("/config-dns/v1/zones?contractId=1")
            .body(b"{\"zone\":\"example.com\"}".to_vec())
            .unwrap();
        sign_request(&Signer::default(), &test_credentials(), &mut req).unwrap();
        let body = req.body().clone();

        let response = test_gateway().handle(req, &body);
        assert_eq!(response.status(), http::StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["valid"], true);
        assert_eq!(json["client_token"], "ct1");
    }

    #[tokio::test]
    async fn test_should_reject_unsigned_request() {
        let req = http::Request::builder()
            .uri("/config-dns/v1/zones")
            .body(())
            .unwrap();

        let response = test_gateway().handle(req, b"");
        assert_eq!(response.status(), http::StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["valid"], false);
    }

    #[tokio::test]
    async fn test_should_reject_body_swapped_after_signing() {
        let mut req = http::Request::builder()
            .method("POST")
            .uri("/firewall/v1/subscriptions")
            .body(b"original".to_vec())
            .unwrap();
        sign_request(&Signer::default(), &test_credentials(), &mut req).unwrap();

        let response = test_gateway().handle(req, b"swapped");
        assert_eq!(response.status(), http::StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({ "valid": false }));
    }

    #[tokio::test]
    async fn test_should_answer_wrong_client_and_access_token_identically() {
        let mut wrong_client = test_credentials();
        wrong_client.client_token = "ct2".to_owned();
        let mut wrong_access = test_credentials();
        wrong_access.access_token = "at2".to_owned();

        let gateway = test_gateway();
        let first = gateway.handle(signed_get(&wrong_client), b"");
        let second = gateway.handle(signed_get(&wrong_access), b"");

        assert_eq!(first.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(second.status(), http::StatusCode::UNAUTHORIZED);
        assert_eq!(body_bytes(first).await, body_bytes(second).await);
    }

    #[test]
    fn test_should_answer_health_check_without_auth() {
        let req = http::Request::builder().uri("/_health").body(()).unwrap();
        let response = test_gateway().handle(req, b"");
        assert_eq!(response.status(), http::StatusCode::OK);
    }

    #[test]
    fn test_should_detect_health_check_paths() {
        assert!(is_health_check(&http::Method::GET, "/_health"));
        assert!(is_health_check(&http::Method::GET, "/health"));
        assert!(!is_health_check(&http::Method::POST, "/_health"));
        assert!(!is_health_check(&http::Method::GET, "/config-dns/v1/zones"));
    }

    #[test]
    fn test_should_map_errors_to_status() {
        assert_eq!(
            status_for(&AuthError::SignatureDoesNotMatch),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&AuthError::MalformedHeader),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&AuthError::InvalidCredentialSet("host")),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
