/*
[INPUT]:  Refresh tokens, access tokens, call batches and swap parameters
[OUTPUT]: Rotated tokens, transaction hashes, authorization URLs
[POS]:    HTTP layer - wallet backend endpoints
[UPDATE]: When adding new endpoints or changing request/response contracts
*/

use reqwest::{Method, Url};

use crate::auth::Secret;
use crate::http::{GatewayClient, Result};
use crate::types::{
    AuthUrlQuery, AuthUrlResponse, ExecuteRequest, ExecuteResponse, Provider, RefreshRequest,
    RefreshResponse, SwapRequest, SwapResponse,
};

impl GatewayClient {
    /// Exchange the current refresh token for a new token pair
    ///
    /// POST /auth/refresh
    /// Authorization: Bearer {org credential}, when one is configured
    pub async fn refresh(
        &self,
        refresh_token: &Secret,
        org_credential: Option<&Secret>,
    ) -> Result<RefreshResponse> {
        let body = RefreshRequest {
            refresh_token: refresh_token.expose(),
        };

        let mut builder = self.request(Method::POST, "auth/refresh")?.json(&body);
        if let Some(credential) = org_credential {
            builder = builder.bearer_auth(credential.expose());
        }
        self.send_json(builder).await
    }

    /// Execute a batch of contract calls from the session wallet
    ///
    /// POST /execute/session
    /// Authorization: Bearer {access token}
    pub async fn execute_calls(
        &self,
        access_token: &Secret,
        request: &ExecuteRequest,
    ) -> Result<String> {
        let builder = self
            .request(Method::POST, "execute/session")?
            .bearer_auth(access_token.expose())
            .json(request);
        let response: ExecuteResponse = self.send_json(builder).await?;
        Ok(response.transaction_hash())
    }

    /// Swap tokens from the session wallet
    ///
    /// POST /execute/session/swap
    /// Authorization: Bearer {access token}
    pub async fn swap(&self, access_token: &Secret, request: &SwapRequest) -> Result<String> {
        let builder = self
            .request(Method::POST, "execute/session/swap")?
            .bearer_auth(access_token.expose())
            .json(request);
        let response: SwapResponse = self.send_json(builder).await?;
        Ok(response.transaction_hash())
    }

    /// Ask the broker for the provider's authorization URL
    ///
    /// GET /auth/{provider}?network={network}&final_redirect_uri={uri}[&app_id={app_id}]
    pub async fn fetch_authorization_url(
        &self,
        provider: Provider,
        query: &AuthUrlQuery<'_>,
        org_credential: Option<&Secret>,
    ) -> Result<Url> {
        let mut builder = self
            .request(Method::GET, provider.auth_endpoint())?
            .query(query);
        if let Some(credential) = org_credential {
            builder = builder.bearer_auth(credential.expose());
        }
        let response: AuthUrlResponse = self.send_json(builder).await?;
        Ok(Url::parse(&response.url)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::Secret;
    use crate::http::{GatewayClient, WalletError};
    use crate::types::{AuthUrlQuery, Call, ExecuteRequest, Provider, SwapRequest};
    use rust_decimal::Decimal;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn execute_request() -> ExecuteRequest {
        ExecuteRequest {
            address: "0xwallet".to_string(),
            org_id: Some("org-1".to_string()),
            calls: vec![Call::new("0xtoken", "approve", vec!["0xspender".to_string()])],
            network: "sepolia".to_string(),
        }
    }

    #[tokio::test]
    async fn test_refresh_sends_token_and_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(header("authorization", "Bearer org-secret"))
            .and(body_json(serde_json::json!({"refresh_token": "r1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "a2",
                "refresh_token": "r2",
                "expires_in": 3600,
                "user_id": "u1",
                "email": "a@b.com",
                "org_id": "org-1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let response = client
            .refresh(&Secret::new("r1"), Some(&Secret::new("org-secret")))
            .await
            .unwrap();

        assert_eq!(response.access_token.expose(), "a2");
        assert_eq!(response.refresh_token.as_ref().map(Secret::expose), Some("r2"));
        assert_eq!(response.expires_in, 3600);
        assert_eq!(response.org_id.as_deref(), Some("org-1"));
    }

    #[tokio::test]
    async fn test_execute_unwraps_nested_hash() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute/session"))
            .and(header("authorization", "Bearer a1"))
            .and(body_json(serde_json::json!({
                "address": "0xwallet",
                "org_id": "org-1",
                "calls": [{
                    "contractAddress": "0xtoken",
                    "entryPoint": "approve",
                    "calldata": ["0xspender"],
                }],
                "network": "sepolia",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {"result": {"transactionHash": "0xhash"}},
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let hash = client
            .execute_calls(&Secret::new("a1"), &execute_request())
            .await
            .unwrap();
        assert_eq!(hash, "0xhash");
    }

    #[tokio::test]
    async fn test_non_success_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute/session"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let err = client
            .execute_calls(&Secret::new("a1"), &execute_request())
            .await
            .unwrap_err();

        match err {
            WalletError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute/session/swap"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/execute/session"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": {}})),
            )
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let swap = SwapRequest {
            address: "0xwallet".to_string(),
            org_id: None,
            network: "sepolia".to_string(),
            amount: Decimal::new(25, 1),
            sell_token_address: "0xsell".to_string(),
            buy_token_address: "0xbuy".to_string(),
        };
        let err = client.swap(&Secret::new("a1"), &swap).await.unwrap_err();
        assert!(matches!(err, WalletError::Decode(_)));

        let err = client
            .execute_calls(&Secret::new("a1"), &execute_request())
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::Decode(_)));
    }

    #[tokio::test]
    async fn test_swap_returns_hash() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/execute/session/swap"))
            .and(body_json(serde_json::json!({
                "address": "0xwallet",
                "org_id": "org-1",
                "network": "mainnet",
                "amount": 2.5,
                "sellTokenAddress": "0xsell",
                "buyTokenAddress": "0xbuy",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {"transactionHash": "0xswap"},
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let swap = SwapRequest {
            address: "0xwallet".to_string(),
            org_id: Some("org-1".to_string()),
            network: "mainnet".to_string(),
            amount: Decimal::new(25, 1),
            sell_token_address: "0xsell".to_string(),
            buy_token_address: "0xbuy".to_string(),
        };
        assert_eq!(client.swap(&Secret::new("a1"), &swap).await.unwrap(), "0xswap");
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = GatewayClient::new(&uri).unwrap();
        let err = client
            .refresh(&Secret::new("r1"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::Network(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_authorization_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/google"))
            .and(query_param("network", "sepolia"))
            .and(query_param("final_redirect_uri", "myapp://callback"))
            .and(query_param("app_id", "app-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "url": "https://accounts.google.com/o/oauth2/auth?state=xyz",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let query = AuthUrlQuery {
            network: "sepolia",
            final_redirect_uri: "myapp://callback",
            app_id: Some("app-1"),
        };
        let url = client
            .fetch_authorization_url(Provider::Google, &query, None)
            .await
            .unwrap();
        assert_eq!(url.host_str(), Some("accounts.google.com"));
    }
}
