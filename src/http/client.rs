//! Dashboard query client
//!
//! A thin wrapper over `reqwest::Client` that knows the fixed endpoint,
//! the resource-key header the public dashboard expects, and how to
//! classify HTTP outcomes into the crate's error taxonomy.

use crate::error::{Error, Result};
use crate::query;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the dashboard client
#[derive(Debug, Clone)]
pub struct DashboardClientConfig {
    /// Full URL of the analytics query endpoint
    pub endpoint: String,
    /// Request timeout
    pub timeout: Duration,
    /// Headers sent with every query
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for DashboardClientConfig {
    fn default() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(
            query::RESOURCE_KEY_HEADER.to_string(),
            query::RESOURCE_KEY.to_string(),
        );

        Self {
            endpoint: query::QUERY_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            default_headers,
            user_agent: format!("nijz-vaccinations/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl DashboardClientConfig {
    /// Create a new config builder
    pub fn builder() -> DashboardClientConfigBuilder {
        DashboardClientConfigBuilder::default()
    }
}

/// Builder for the dashboard client config
#[derive(Default)]
pub struct DashboardClientConfigBuilder {
    config: DashboardClientConfig,
}

impl DashboardClientConfigBuilder {
    /// Override the query endpoint (primarily for test servers)
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add or replace a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> DashboardClientConfig {
        self.config
    }
}

/// Per-query options
///
/// The timeout acts as the call's deadline and is handed straight to the
/// transport; upstream network calls are the only suspension points, so
/// cancellation is dropping the returned future.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Override the client timeout for this query
    pub timeout: Option<Duration>,
    /// Extra headers for this query
    pub headers: HashMap<String, String>,
}

impl QueryOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a per-query deadline
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Client for the public analytics query endpoint
///
/// Cheap to clone and safe to share across tasks: the underlying
/// `reqwest::Client` is reference-counted and the client itself holds no
/// per-call state.
#[derive(Clone)]
pub struct DashboardClient {
    client: Client,
    config: DashboardClientConfig,
}

impl DashboardClient {
    /// Create a client against the public dashboard endpoint
    pub fn new() -> Self {
        // The default config carries a known-good endpoint, so construction
        // cannot fail on URL parsing.
        Self::with_config(DashboardClientConfig::default())
            .unwrap_or_else(|_| unreachable!("default endpoint is a valid URL"))
    }

    /// Create a client with a custom configuration
    pub fn with_config(config: DashboardClientConfig) -> Result<Self> {
        Url::parse(&config.endpoint)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// POST a query payload and parse the JSON body
    pub async fn post_query(&self, payload: &Value) -> Result<Value> {
        self.post_query_with_options(payload, &QueryOptions::default())
            .await
    }

    /// POST a query payload with per-query options and parse the JSON body
    pub async fn post_query_with_options(
        &self,
        payload: &Value,
        options: &QueryOptions,
    ) -> Result<Value> {
        let mut req = self.client.post(&self.config.endpoint);

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }
        for (key, value) in &options.headers {
            req = req.header(key.as_str(), value.as_str());
        }
        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }

        let response = req.json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        debug!("Query succeeded: POST {}", self.config.endpoint);
        let text = response.text().await.map_err(Error::Http)?;
        let body: Value = serde_json::from_str(&text)?;
        Ok(body)
    }
}

impl Default for DashboardClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DashboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardClient")
            .field("endpoint", &self.config.endpoint)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}
