use url::Url;

/// Checks whether a target URL belongs to the crawled site
///
/// Internal means the hostname matches the seed URL's hostname exactly.
/// Subdomains are external: `blog.example.com` is not internal to a crawl
/// seeded at `example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegauge::url::is_internal_url;
///
/// let seed = Url::parse("https://example.com/").unwrap();
/// let same = Url::parse("https://example.com/about").unwrap();
/// let sub = Url::parse("https://blog.example.com/post").unwrap();
///
/// assert!(is_internal_url(&same, &seed));
/// assert!(!is_internal_url(&sub, &seed));
/// ```
pub fn is_internal_url(target: &Url, seed: &Url) -> bool {
    match (target.host_str(), seed.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}
