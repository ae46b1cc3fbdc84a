use serde::Deserialize;

/// Main configuration structure for SiteGauge
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "render-fallback", default)]
    pub render_fallback: RenderFallbackConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Default maximum link depth when the CLI does not override it
    #[serde(rename = "default-max-depth")]
    pub default_max_depth: u32,

    /// Default page budget when the CLI does not override it
    #[serde(rename = "default-max-pages")]
    pub default_max_pages: usize,

    /// Overall request timeout (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_max_depth: 2,
            default_max_pages: 50,
            fetch_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Render-fallback tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderFallbackConfig {
    /// Successful responses smaller than this re-fetch with rendering
    #[serde(rename = "min-html-bytes")]
    pub min_html_bytes: usize,

    /// How many pages per job may collect speed timings
    #[serde(rename = "max-speed-measurements")]
    pub max_speed_measurements: u32,
}

impl Default for RenderFallbackConfig {
    fn default() -> Self {
        Self {
            min_html_bytes: crate::crawler::RENDER_MIN_HTML_BYTES,
            max_speed_measurements: crate::crawler::DEFAULT_MAX_SPEED_MEASUREMENTS,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler (optional)
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,

    /// Email address for crawler-related contact (optional)
    #[serde(rename = "contact-email", default)]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sitegauge".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `name/version` with a `(+url; email)` suffix when contact details
    /// are configured.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);

        match (self.contact_url.is_empty(), self.contact_email.is_empty()) {
            (true, true) => base,
            (false, true) => format!("{} (+{})", base, self.contact_url),
            (true, false) => format!("{} ({})", base, self.contact_email),
            (false, false) => format!("{} (+{}; {})", base, self.contact_url, self.contact_email),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path for the markdown report, written when set
    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,

    /// Path for the JSON result dump, written when set
    #[serde(rename = "json-path", default)]
    pub json_path: Option<String>,
}
