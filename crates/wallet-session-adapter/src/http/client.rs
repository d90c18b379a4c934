/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for gateway calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::http::{Result, WalletError};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the wallet backend gateway.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http_client: Client,
    base_url: Url,
}

impl GatewayClient {
    /// Create a new client with default configuration
    ///
    /// `base_url` is the external API root, e.g. `https://services.<provider>/api/v1/external`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::default(), base_url)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Gateway root every endpoint is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint path relative to the base
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    /// Build request builder for an endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.endpoint_url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode a 2xx JSON body.
    ///
    /// Non-2xx maps to `Http`, undecodable bodies to `Decode`, transport errors to `Network`.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let response = ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(Into::into)
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    debug!(
        endpoint = response.url().path(),
        status = status.as_u16(),
        "gateway response"
    );
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(WalletError::http(status, body))
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    let mut url = Url::parse(trimmed)?;
    if url.cannot_be_a_base() {
        return Err(WalletError::Config(format!(
            "base URL cannot carry endpoint paths: {trimmed}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join_keeps_base_path() {
        let client = GatewayClient::new("https://services.example.com/api/v1/external").unwrap();
        let url = client.endpoint_url("/auth/refresh").unwrap();
        assert_eq!(
            url.as_str(),
            "https://services.example.com/api/v1/external/auth/refresh"
        );

        let client = GatewayClient::new("https://services.example.com/api/v1/external/").unwrap();
        let url = client.endpoint_url("execute/session/swap").unwrap();
        assert_eq!(
            url.as_str(),
            "https://services.example.com/api/v1/external/execute/session/swap"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            GatewayClient::new("not a url"),
            Err(WalletError::UrlParse(_))
        ));
        assert!(matches!(
            GatewayClient::new("mailto:someone@example.com"),
            Err(WalletError::Config(_))
        ));
    }
}
