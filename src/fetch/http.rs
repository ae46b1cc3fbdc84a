//! Lightweight HTTP fetch engine
//!
//! Implements [`FetchEngine`] over reqwest. Redirects are followed manually
//! (max hop limit, loop detection) so every hop lands in the fetched page's
//! redirect history. The rendered path is reported as unavailable: rendering
//! requires a headless browser, which embedders supply behind the same trait.

use crate::fetch::{build_http_client, FetchEngine, FetchedPage, RedirectHop, RenderedPage};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Instant;
use url::Url;

/// Maximum number of redirect hops followed for one URL
const MAX_REDIRECT_HOPS: usize = 10;

/// Fetch engine backed by a plain HTTP client
pub struct HttpFetchEngine {
    client: Client,
}

impl HttpFetchEngine {
    /// Creates an engine with the given user agent and timeouts
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, timeout_secs, connect_timeout_secs)?;
        Ok(Self { client })
    }

    /// Wraps an already-built client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Classifies a reqwest error into the fetch error taxonomy
    fn classify_error(url: &Url, source: reqwest::Error) -> FetchError {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if source.is_connect() {
            FetchError::Unreachable {
                url: url.to_string(),
                message: source.to_string(),
            }
        } else {
            FetchError::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

#[async_trait]
impl FetchEngine for HttpFetchEngine {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let start = Instant::now();
        let mut current = url.clone();
        let mut redirect_history: Vec<RedirectHop> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(current.to_string());

        loop {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| Self::classify_error(&current, e))?;

            let status = response.status();

            if status.is_redirection() {
                if redirect_history.len() >= MAX_REDIRECT_HOPS {
                    return Err(FetchError::RedirectLimit {
                        url: url.to_string(),
                    });
                }

                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| FetchError::MissingLocation {
                        url: current.to_string(),
                    })?;

                let next = current
                    .join(location)
                    .map_err(|_| FetchError::MissingLocation {
                        url: current.to_string(),
                    })?;

                if !seen.insert(next.to_string()) {
                    return Err(FetchError::RedirectLoop {
                        url: next.to_string(),
                    });
                }

                tracing::debug!("Redirect {} {} -> {}", status.as_u16(), current, next);

                redirect_history.push(RedirectHop {
                    from: current.to_string(),
                    to: next.to_string(),
                    status: status.as_u16(),
                });
                current = next;
                continue;
            }

            let final_url = response.url().clone();
            let body = response
                .text()
                .await
                .map_err(|e| Self::classify_error(&current, e))?;

            let byte_size = body.len();
            let elapsed_ms = start.elapsed().as_millis() as u64;

            return Ok(FetchedPage {
                final_url,
                status: status.as_u16(),
                body,
                byte_size,
                elapsed_ms,
                redirect_history,
            });
        }
    }

    async fn fetch_rendered(
        &self,
        _url: &Url,
        _collect_speed: bool,
    ) -> Result<RenderedPage, FetchError> {
        Err(FetchError::RenderUnavailable {
            reason: "HttpFetchEngine has no browser backend".to_string(),
        })
    }
}
