//! Fetch engine abstraction
//!
//! The crawler talks to the network through the narrow [`FetchEngine`]
//! interface: a lightweight fetch and an optional full browser-rendered
//! re-fetch. The bundled [`HttpFetchEngine`] implements the lightweight path
//! over reqwest with manual redirect handling; a browser-backed engine is an
//! embedder concern and plugs in behind the same trait.

mod client;
mod http;

pub use client::build_http_client;
pub use http::HttpFetchEngine;

use crate::FetchError;
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

/// One hop of a redirect chain, in request order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectHop {
    /// URL that responded with a redirect
    pub from: String,

    /// URL the redirect pointed to
    pub to: String,

    /// HTTP status of the redirect response (301, 302, ...)
    pub status: u16,
}

/// Result of fetching one URL
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after following redirects
    pub final_url: Url,

    /// HTTP status of the final response
    pub status: u16,

    /// Decoded response body
    pub body: String,

    /// Body size in bytes (UTF-8)
    pub byte_size: usize,

    /// Wall-clock time spent fetching, in milliseconds
    pub elapsed_ms: u64,

    /// Redirect hops traversed before the final response
    pub redirect_history: Vec<RedirectHop>,
}

/// Page speed timings collected by a rendering fetch engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeedMetrics {
    /// Time to first byte, in milliseconds
    pub ttfb_ms: u64,

    /// Time until the DOM was ready, in milliseconds
    pub dom_load_ms: u64,

    /// Total load time, in milliseconds
    pub total_load_ms: u64,
}

/// Result of a browser-rendered fetch
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The rendered page, same shape as a lightweight fetch
    pub page: FetchedPage,

    /// Speed timings, when the engine was asked to collect them
    pub speed: Option<SpeedMetrics>,
}

/// Interface between the crawler and the underlying network machinery
///
/// Connection pooling, cookies, TLS and browser lifecycle all live behind
/// this trait. Implementations must tolerate being called from a spawned
/// task, hence the `Send + Sync` bound.
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// Fetches a URL with a lightweight HTTP GET
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;

    /// Re-fetches a URL with full browser rendering
    ///
    /// More expensive and may fail independently of [`FetchEngine::fetch`].
    /// When `collect_speed` is set, the engine should also gather navigation
    /// timings; engines that cannot may return `speed: None`.
    async fn fetch_rendered(
        &self,
        url: &Url,
        collect_speed: bool,
    ) -> Result<RenderedPage, FetchError>;
}
