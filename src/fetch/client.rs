//! HTTP client construction
//!
//! Builds the reqwest client used by [`HttpFetchEngine`](super::HttpFetchEngine).
//! Redirects are disabled at the client level so the engine can follow them
//! manually and record the hop chain for the redirect-chain audit.

use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Builds an HTTP client with the crawler's user agent and timeouts
///
/// # Arguments
///
/// * `user_agent` - Full user agent header value
/// * `timeout_secs` - Overall request timeout in seconds
/// * `connect_timeout_secs` - Connection establishment timeout in seconds
pub fn build_http_client(
    user_agent: &str,
    timeout_secs: u64,
    connect_timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client("TestGauge/1.0 (+https://example.com; a@b.com)", 30, 10);
        assert!(client.is_ok());
    }
}
