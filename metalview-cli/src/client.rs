//! HTTP client for the bare-metal provider's account API.

use anyhow::{Context, Result};
use metalview_core::api;
use metalview_core::types::{
    Account, Hardware, HardwareComponent, HardwareSummary, NetworkComponent, VlanTrunk,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Object mask requesting the nested records a configuration report needs.
const HARDWARE_DETAIL_MASK: &str = "datacenterName,networkVlans,backendRouters,frontendRouters,\
                                    backendNetworkComponents,frontendNetworkComponents";

/// Normalize an endpoint URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// HTTP client for the provider's REST API.
///
/// Every request carries HTTP basic authentication (username / API key).
/// Nested sub-records are requested through `mask` query parameters, so a
/// single hardware fetch returns the VLANs, routers, and network components
/// the report sections are built from.
///
/// # Retry Logic
///
/// The client automatically retries requests that fail due to:
/// - Connection errors (network unreachable, connection refused)
/// - Timeout errors
/// - Generic request errors
///
/// Retries use a growing backoff delay. Client errors (4xx) and server
/// errors (5xx) are not retried.
///
/// # Examples
///
/// ```no_run
/// use metalview_cli::client::MetalClient;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = MetalClient::with_config(
///     "https://api.metal.cloud".to_string(),
///     "acct1234".to_string(),
///     "supersecretapikey".to_string(),
///     30,  // timeout in seconds
///     3,   // max retries
///     Duration::from_millis(500),  // initial retry delay
/// ).await?;
///
/// let hardware = client.get_hardware(1001).await?;
/// println!("{}", hardware.fully_qualified_domain_name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MetalClient {
    client: Client,
    base_url: String,
    username: String,
    api_key: String,
    max_retries: u32,
    retry_delay: Duration,
    account: Account,
}

impl MetalClient {
    /// Get the account the credentials belong to.
    ///
    /// # Returns
    ///
    /// Returns the account record fetched during client initialization.
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Create a new client and validate the credentials against the API.
    ///
    /// Fetches the account object from the server during initialization, so
    /// a wrong endpoint or rejected credentials surface here rather than on
    /// the first report call.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the provider API
    /// * `username` - API username
    /// * `api_key` - API key paired with the username
    /// * `timeout_secs` - Request timeout in seconds
    /// * `max_retries` - Maximum number of retry attempts for failed requests
    /// * `retry_delay` - Initial delay between retries
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The username or API key is empty
    /// - The HTTP client cannot be created
    /// - The server is unreachable or rejects the credentials
    pub async fn with_config(
        endpoint: String,
        username: String,
        api_key: String,
        timeout_secs: u64,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        if username.trim().is_empty() {
            return Err(anyhow::anyhow!("API username cannot be empty"));
        }
        if api_key.trim().is_empty() {
            return Err(anyhow::anyhow!("API key cannot be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("metalview/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let mut this = Self {
            client,
            base_url: normalize_url(&endpoint),
            username,
            api_key,
            max_retries,
            retry_delay,
            account: Account::default(),
        };

        this.account = this
            .fetch_account()
            .await
            .context("Failed to fetch account information from the API")?;

        Ok(this)
    }

    /// Build a GET request carrying the account credentials.
    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .basic_auth(&self.username, Some(&self.api_key))
    }

    /// Process an HTTP response and extract the API data.
    ///
    /// Handle both successful responses and various error conditions,
    /// providing detailed error messages for debugging.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The HTTP status code indicates failure (4xx or 5xx)
    /// - The response body cannot be read
    /// - The JSON cannot be deserialized
    /// - The API returns an error response
    async fn handle_response<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", endpoint))?;

        if !status.is_success() {
            let error_msg = match status {
                StatusCode::NOT_FOUND => format!("Endpoint {} not found", endpoint),
                StatusCode::BAD_REQUEST => format!("Bad request to {}: {}", endpoint, text),
                StatusCode::UNAUTHORIZED => format!(
                    "Unauthorized access to {}: check the username and API key",
                    endpoint
                ),
                StatusCode::FORBIDDEN => format!("Access forbidden to {}", endpoint),
                StatusCode::INTERNAL_SERVER_ERROR => {
                    format!("Server error at {}: {}", endpoint, text)
                }
                StatusCode::SERVICE_UNAVAILABLE => format!("Service unavailable at {}", endpoint),
                _ => format!("HTTP {} error at {}: {}", status, endpoint, text),
            };
            return Err(anyhow::anyhow!(error_msg));
        }

        let api_response: api::ApiResponse<T> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))?;

        match api_response {
            api::ApiResponse::Success { data } => Ok(data),
            api::ApiResponse::Error { error } => {
                Err(anyhow::anyhow!("API error at {}: {}", endpoint, error))
            }
        }
    }

    /// Execute an HTTP request with automatic retry logic.
    ///
    /// Only retry on connection-related errors (connection failures,
    /// timeouts). Client errors (4xx) and server errors (5xx) are not
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns an error if all retry attempts fail.
    async fn execute_with_retry<F, Fut, T>(&self, endpoint: &str, request_fn: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<Response, reqwest::Error>>,
        T: DeserializeOwned,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match request_fn().await {
                Ok(response) => {
                    return Self::handle_response(response, endpoint).await;
                }
                Err(e) => {
                    // Only retry on connection errors, not client errors
                    let should_retry = e.is_connect() || e.is_timeout() || e.is_request();
                    last_error = Some(e);

                    // Don't retry on the last attempt
                    if attempt < self.max_retries && should_retry {
                        tokio::time::sleep(self.retry_delay * (attempt + 1)).await;
                        continue;
                    } else {
                        break;
                    }
                }
            }
        }

        Err(anyhow::anyhow!(
            "Failed to reach {} after {} attempts: {}",
            endpoint,
            self.max_retries + 1,
            last_error.unwrap()
        ))
    }

    async fn fetch_account(&self) -> Result<Account> {
        let url = format!("{}/api/v1/account", self.base_url);
        let endpoint = "account";

        self.execute_with_retry(endpoint, || self.get(&url).send())
            .await
    }

    /// List the account's dedicated hardware servers.
    ///
    /// # Returns
    ///
    /// Returns one summary record per server, with the datacenter name
    /// included via the listing mask.
    pub async fn list_hardware(&self) -> Result<Vec<HardwareSummary>> {
        let url = format!("{}/api/v1/account/hardware", self.base_url);
        let endpoint = "account/hardware";

        self.execute_with_retry(endpoint, || {
            self.get(&url).query(&[("mask", "datacenterName")]).send()
        })
        .await
    }

    /// Fetch one server with the nested records a report needs: VLANs,
    /// routers, and both network component lists.
    ///
    /// # Arguments
    ///
    /// * `id` - Hardware id
    pub async fn get_hardware(&self, id: u64) -> Result<Hardware> {
        let url = format!("{}/api/v1/hardware/{}", self.base_url, id);
        let endpoint = &format!("hardware/{}", id);

        self.execute_with_retry(endpoint, || {
            self.get(&url).query(&[("mask", HARDWARE_DETAIL_MASK)]).send()
        })
        .await
    }

    /// Fetch the installed hardware components of a server.
    ///
    /// # Arguments
    ///
    /// * `id` - Hardware id
    pub async fn get_hardware_components(&self, id: u64) -> Result<Vec<HardwareComponent>> {
        let url = format!("{}/api/v1/hardware/{}/components", self.base_url, id);
        let endpoint = &format!("hardware/{}/components", id);

        self.execute_with_retry(endpoint, || self.get(&url).send())
            .await
    }

    /// Fetch a network component together with its switch-side uplink.
    ///
    /// # Arguments
    ///
    /// * `id` - Network component id
    pub async fn get_network_component(&self, id: u64) -> Result<NetworkComponent> {
        let url = format!("{}/api/v1/network-component/{}", self.base_url, id);
        let endpoint = &format!("network-component/{}", id);

        self.execute_with_retry(endpoint, || {
            self.get(&url).query(&[("mask", "uplinkComponent")]).send()
        })
        .await
    }

    /// Fetch the VLANs trunked onto a network component.
    ///
    /// Trunks are defined on the switch-side uplink, so callers usually
    /// pass the id of an uplink component obtained via
    /// [`MetalClient::get_network_component`].
    ///
    /// # Arguments
    ///
    /// * `component_id` - Network component id
    pub async fn get_vlan_trunks(&self, component_id: u64) -> Result<Vec<VlanTrunk>> {
        let url = format!(
            "{}/api/v1/network-component/{}/trunks",
            self.base_url, component_id
        );
        let endpoint = &format!("network-component/{}/trunks", component_id);

        self.execute_with_retry(endpoint, || {
            self.get(&url).query(&[("mask", "networkVlan")]).send()
        })
        .await
    }

    /// Test basic connectivity to the API.
    ///
    /// Use a short timeout (3 seconds) to quickly determine if the endpoint
    /// is reachable.
    ///
    /// # Returns
    ///
    /// Returns `true` if the server responds with a success status, `false`
    /// otherwise. Does not return an error on connection failure - use for
    /// availability checks.
    pub async fn ping(&self) -> Result<bool> {
        let url = format!("{}/", self.base_url);

        // Use a shorter timeout for ping
        let client = Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .context("Failed to create ping client")?;

        match client
            .get(&url)
            .basic_auth(&self.username, Some(&self.api_key))
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_e) => {
                // Return false for any ping failure (not an error)
                Ok(false)
            }
        }
    }
}
