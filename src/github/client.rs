//! Implements the GithubApi trait with reqwest
use async_trait::async_trait;
use log::*;
use reqwest::{
    Client, RequestBuilder, Url,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    Result,
    config::Config,
    github::{
        traits::GithubApi,
        types::{ApiResponse, Method},
    },
};

/// Media type requested from the GitHub REST API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

const USER_AGENT: &str = concat!("chartflow/", env!("CARGO_PKG_VERSION"));

/// Build the default headers: v3 JSON accept and bearer authorization.
pub fn default_headers(token: Option<&SecretString>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(
            format!("Bearer {}", token.expose_secret()).as_str(),
        )?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// GitHub REST client. Requests are sent as-is: no retries, no timeouts.
pub struct GithubClient {
    base_url: Url,
    client: Client,
    headers: HeaderMap,
}

impl GithubClient {
    /// Create a client sending the default accept and bearer headers.
    pub fn new(base_url: &str, token: Option<&SecretString>) -> Result<Self> {
        let headers = default_headers(token)?;
        Self::with_headers(base_url, headers)
    }

    /// Create a client that sends exactly the caller supplied headers.
    pub fn with_headers(base_url: &str, headers: HeaderMap) -> Result<Self> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            base_url,
            client,
            headers,
        })
    }

    /// Create a client from process configuration, authenticating with the
    /// bot token when one is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.bot_token.as_ref())
    }

    /// Resolve an endpoint against the base URL. Absolute URLs are used
    /// unchanged.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://")
        {
            return Ok(Url::parse(endpoint)?);
        }
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    fn request_builder(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> RequestBuilder {
        let builder = match method {
            Method::Get => self.client.get(url),
            Method::Post => self
                .client
                .post(url)
                .json(&body.unwrap_or_else(|| serde_json::json!({}))),
            Method::Delete => self.client.delete(url),
        };
        builder.headers(self.headers.clone())
    }
}

#[async_trait]
impl GithubApi for GithubClient {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse> {
        let url = self.endpoint_url(endpoint)?;
        debug!("{method} {url}");

        let response = self.request_builder(method, url, body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("{method} response status: {status}");

        Ok(ApiResponse { status, body })
    }

    async fn get_url(&self, url: &str) -> Result<ApiResponse> {
        self.request(Method::Get, url, None).await
    }
}
