//! metalview CLI Library
//!
//! This library provides the core functionality for the metalview CLI tool.
//!
//! # Public API
//!
//! The primary public API is the [`client::MetalClient`] which provides
//! programmatic access to the bare-metal provider's account API.
//! Configuration types are also available via [`config::CliConfig`] and
//! [`config::ConfigBuilder`].
//!
//! ```no_run
//! use metalview_cli::client::MetalClient;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = MetalClient::with_config(
//!     "https://api.metal.cloud".to_string(),
//!     "acct1234".to_string(),
//!     "supersecretapikey".to_string(),
//!     30,  // timeout in seconds
//!     3,   // max retries
//!     Duration::from_millis(500),  // initial retry delay
//! ).await?;
//!
//! for server in client.list_hardware().await? {
//!     println!("{}", server.fully_qualified_domain_name);
//! }
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for the provider's account API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

// Mock provider server, used by the integration tests
#[doc(hidden)]
pub mod test_utils;
