use crate::UrlError;
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Normalizes a URL for frontier deduplication
///
/// Two discovered links that normalize to the same URL are treated as the
/// same page: the second is never enqueued.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject non-HTTP(S) schemes
/// 3. Lowercase the host
/// 4. Normalize path:
///    - Remove dot segments (. and ..)
///    - Remove trailing slash (except for root /)
///    - Empty path becomes /
/// 5. Remove fragment (everything after #)
/// 6. Remove tracking query parameters
/// 7. Sort remaining query parameters alphabetically
/// 8. Remove empty query string (trailing ?)
///
/// Unlike the usual crawler-politeness normalizations, the scheme and any
/// `www.` prefix are kept as-is: an audit must fetch exactly the URL the
/// site links to, and `www.example.com` is a different hostname than
/// `example.com` for the internal-page check.
///
/// # Examples
///
/// ```
/// use sitegauge::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/page/?utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if let Some(host) = url.host_str() {
        let normalized_host = host.to_lowercase();
        url.set_host(Some(&normalized_host))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    } else {
        return Err(UrlError::MissingHost);
    }

    let normalized_path = normalize_path(url.path());
    url.set_path(&normalized_path);

    url.set_fragment(None);

    if url.query().is_some() {
        let filtered_params = filter_and_sort_query_params(&url);

        if filtered_params.is_empty() {
            url.set_query(None);
        } else {
            let query_string = filtered_params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query_string));
        }
    }

    Ok(url)
}

/// Normalizes a URL path by removing dot segments and trailing slashes
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let segments: Vec<&str> = path.split('/').collect();
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in segments {
        match segment {
            // Skip empty segments (from multiple slashes) and current directory markers
            "" | "." => continue,
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    if normalized_segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", normalized_segments.join("/"))
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    if TRACKING_PARAMS.contains(&key) {
        return true;
    }

    // Catches any custom utm parameter
    key.starts_with("utm_")
}
