//! Structural SEO metric extraction
//!
//! Computes the per-page signals the content scorer and the report consume.
//! All counts are exact: every element in the document is visited, nothing is
//! sampled.

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// Elements whose subtrees never contribute to the visible word count
const EXCLUDED_TEXT_CONTAINERS: &[&str] = &["script", "style", "nav", "footer", "noscript", "iframe"];

/// Structural SEO signals for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSeoMetrics {
    /// Character length of the first `<title>` text (0 when absent)
    pub title_length: usize,

    /// Number of `<title>` elements (0 and >1 are both flags)
    pub title_count: usize,

    /// Character length of the meta description content (0 when absent)
    pub meta_description_length: usize,

    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub h4_count: usize,
    pub h5_count: usize,
    pub h6_count: usize,

    /// Visible words, with script/style/nav/footer/noscript/iframe stripped
    pub word_count: usize,

    /// Images with a present `alt` attribute (empty `src` excluded)
    pub images_with_alt: usize,

    /// Images without an `alt` attribute (empty `src` excluded)
    pub images_without_alt: usize,

    /// Anchors resolving to the page's own hostname
    pub internal_link_count: usize,
}

impl PageSeoMetrics {
    /// Share of images carrying alt text, in percent
    ///
    /// `None` when the page has no images: coverage of an empty set is
    /// undefined, not zero.
    pub fn alt_coverage_percent(&self) -> Option<f64> {
        let total = self.images_with_alt + self.images_without_alt;
        if total == 0 {
            None
        } else {
            Some(self.images_with_alt as f64 / total as f64 * 100.0)
        }
    }
}

/// Extracts all structural metrics from a parsed document
pub fn extract_metrics(document: &Html, page_url: &Url) -> PageSeoMetrics {
    let (title_length, title_count) = title_signals(document);
    let meta_description_length = meta_description_length(document);
    let headings = heading_counts(document);
    let word_count = visible_word_count(document);
    let (images_with_alt, images_without_alt) = image_alt_counts(document);
    let internal_link_count = internal_link_count(document, page_url);

    PageSeoMetrics {
        title_length,
        title_count,
        meta_description_length,
        h1_count: headings[0],
        h2_count: headings[1],
        h3_count: headings[2],
        h4_count: headings[3],
        h5_count: headings[4],
        h6_count: headings[5],
        word_count,
        images_with_alt,
        images_without_alt,
        internal_link_count,
    }
}

/// Length of the first title's text and the total title element count
fn title_signals(document: &Html) -> (usize, usize) {
    let selector = match Selector::parse("title") {
        Ok(s) => s,
        Err(_) => return (0, 0),
    };

    let titles: Vec<_> = document.select(&selector).collect();
    let length = titles
        .first()
        .map(|el| el.text().collect::<String>().trim().chars().count())
        .unwrap_or(0);

    (length, titles.len())
}

fn meta_description_length(document: &Html) -> usize {
    let selector = match Selector::parse(r#"meta[name="description"]"#) {
        Ok(s) => s,
        Err(_) => return 0,
    };

    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|content| content.trim().chars().count())
        .unwrap_or(0)
}

fn heading_counts(document: &Html) -> [usize; 6] {
    let mut counts = [0usize; 6];
    for (i, tag) in ["h1", "h2", "h3", "h4", "h5", "h6"].iter().enumerate() {
        if let Ok(selector) = Selector::parse(tag) {
            counts[i] = document.select(&selector).count();
        }
    }
    counts
}

/// Counts whitespace-separated words in the document's visible text
fn visible_word_count(document: &Html) -> usize {
    let mut text = String::new();
    collect_visible_text(document.root_element(), &mut text);
    text.split_whitespace().count()
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !EXCLUDED_TEXT_CONTAINERS.contains(&child_element.value().name()) {
                collect_visible_text(child_element, out);
            }
        }
    }
}

/// Counts images split by alt-attribute presence, skipping empty `src`
fn image_alt_counts(document: &Html) -> (usize, usize) {
    let selector = match Selector::parse("img") {
        Ok(s) => s,
        Err(_) => return (0, 0),
    };

    let mut with_alt = 0;
    let mut without_alt = 0;

    for img in document.select(&selector) {
        let src = img.value().attr("src").unwrap_or("");
        if src.trim().is_empty() {
            continue;
        }

        if img.value().attr("alt").is_some() {
            with_alt += 1;
        } else {
            without_alt += 1;
        }
    }

    (with_alt, without_alt)
}

/// Counts anchors that resolve to the page's own hostname
fn internal_link_count(document: &Html, page_url: &Url) -> usize {
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return 0,
    };

    let mut count = 0;

    for anchor in document.select(&selector) {
        if let Some(href) = anchor.value().attr("href") {
            let href = href.trim();
            if href.is_empty() || href.starts_with('#') {
                continue;
            }

            let lower = href.to_lowercase();
            if lower.starts_with("mailto:")
                || lower.starts_with("javascript:")
                || lower.starts_with("tel:")
            {
                continue;
            }

            if let Ok(resolved) = page_url.join(href) {
                let same_host = match (resolved.host_str(), page_url.host_str()) {
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    _ => false,
                };
                if same_host {
                    count += 1;
                }
            }
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_of(html: &str) -> PageSeoMetrics {
        let document = Html::parse_document(html);
        let url = Url::parse("https://example.com/page").unwrap();
        extract_metrics(&document, &url)
    }

    #[test]
    fn test_title_signals() {
        let m = metrics_of("<html><head><title>Hello World</title></head><body></body></html>");
        assert_eq!(m.title_length, 11);
        assert_eq!(m.title_count, 1);
    }

    #[test]
    fn test_missing_title() {
        let m = metrics_of("<html><head></head><body></body></html>");
        assert_eq!(m.title_length, 0);
        assert_eq!(m.title_count, 0);
    }

    #[test]
    fn test_multiple_titles_counted() {
        let m = metrics_of(
            "<html><head><title>One</title><title>Two</title></head><body></body></html>",
        );
        assert_eq!(m.title_count, 2);
        assert_eq!(m.title_length, 3);
    }

    #[test]
    fn test_meta_description_length() {
        let m = metrics_of(
            r#"<html><head><meta name="description" content="  A fine page.  "></head><body></body></html>"#,
        );
        assert_eq!(m.meta_description_length, 12);
    }

    #[test]
    fn test_missing_meta_description() {
        let m = metrics_of("<html><head></head><body></body></html>");
        assert_eq!(m.meta_description_length, 0);
    }

    #[test]
    fn test_heading_counts() {
        let m = metrics_of(
            "<html><body><h1>a</h1><h2>b</h2><h2>c</h2><h3>d</h3><h6>e</h6></body></html>",
        );
        assert_eq!(m.h1_count, 1);
        assert_eq!(m.h2_count, 2);
        assert_eq!(m.h3_count, 1);
        assert_eq!(m.h4_count, 0);
        assert_eq!(m.h5_count, 0);
        assert_eq!(m.h6_count, 1);
    }

    #[test]
    fn test_word_count_strips_non_content() {
        let m = metrics_of(
            "<html><body>\
             <p>one two three</p>\
             <script>var ignored = 'four five';</script>\
             <style>p { color: red }</style>\
             <nav>home about</nav>\
             <footer>copyright notice</footer>\
             </body></html>",
        );
        assert_eq!(m.word_count, 3);
    }

    #[test]
    fn test_word_count_includes_nested_content() {
        let m = metrics_of("<html><body><div><p>one <b>two</b> three</p></div></body></html>");
        assert_eq!(m.word_count, 3);
    }

    #[test]
    fn test_image_alt_counts() {
        let m = metrics_of(
            r#"<html><body>
            <img src="/a.png" alt="a">
            <img src="/b.png">
            <img src="" alt="ignored, empty src">
            <img src="/c.png" alt="">
            </body></html>"#,
        );
        // An empty alt attribute is still a present alt attribute
        assert_eq!(m.images_with_alt, 2);
        assert_eq!(m.images_without_alt, 1);
    }

    #[test]
    fn test_internal_link_count() {
        let m = metrics_of(
            r##"<html><body>
            <a href="/about">internal</a>
            <a href="https://example.com/contact">internal absolute</a>
            <a href="https://other.com/">external</a>
            <a href="mailto:x@example.com">mail</a>
            <a href="#top">fragment</a>
            <a href="tel:123">phone</a>
            </body></html>"##,
        );
        assert_eq!(m.internal_link_count, 2);
    }

    #[test]
    fn test_alt_coverage_none_without_images() {
        let m = metrics_of("<html><body><p>text</p></body></html>");
        assert_eq!(m.alt_coverage_percent(), None);
    }

    #[test]
    fn test_alt_coverage_percent() {
        let m = metrics_of(
            r#"<html><body><img src="/a.png" alt="a"><img src="/b.png"></body></html>"#,
        );
        assert_eq!(m.alt_coverage_percent(), Some(50.0));
    }
}
