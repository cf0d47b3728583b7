//! End-to-end verification through the gateway.

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};

    use crate::{send_signed, send_with_header, test_credentials};

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_should_accept_signed_get() {
        let (status, json) = send_signed(
            &test_credentials(),
            Method::GET,
            "/config-dns/v1/zones/example.com",
            b"",
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["valid"], true);
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_should_accept_signed_post_with_body() {
        let (status, _) = send_signed(
            &test_credentials(),
            Method::POST,
            "/firewall/v1/subscriptions",
            br#"{"serviceId":3}"#,
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_should_accept_signed_path_with_query() {
        let (status, _) = send_signed(
            &test_credentials(),
            Method::GET,
            "/config-dns/v2/zones/example.com/recordsets?page=1&pageSize=50",
            b"",
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_should_reject_wrong_secret() {
        let mut creds = test_credentials();
        creds.client_secret = "not-the-secret".to_owned();

        let (status, json) = send_signed(&creds, Method::GET, "/siteshield/v1/maps", b"")
            .await
            .unwrap();

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["valid"], false);
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_should_reject_header_signed_for_other_path() {
        let header = edgegrid_auth::sign(&test_credentials(), "GET", "/siteshield/v1/maps", b"")
            .unwrap();

        let (status, _) = send_with_header(Method::GET, "/siteshield/v1/maps/1", b"", Some(&header))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_should_reject_missing_authorization() {
        let (status, json) = send_with_header(Method::GET, "/siteshield/v1/maps", b"", None)
            .await
            .unwrap();

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json, serde_json::json!({ "valid": false }));
    }
}
