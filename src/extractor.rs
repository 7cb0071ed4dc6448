//! Component C: HTML extraction via tag-shaped regular expressions.
//!
//! These patterns are deliberately non-conformant HTML parsing. The spec
//! fixes their exact capture boundaries because the observable ranking
//! depends on which substrings become tokens — do not "upgrade" this to a
//! real HTML parser without re-characterising every test that depends on
//! it.

use fancy_regex::Regex as FancyRegex;
use once_cell::sync::Lazy;
use regex::Regex;

pub const UNTITLED: &str = "<Untitled Page>";

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<[^>]*title[^>]*>(.+)<[^>]*/title[^>]*>").unwrap());

// The `(?!re|ic)` boundary excluding `<pre>`/`<pic>` tags is a negative
// look-ahead, which the `regex` crate can't compile; this one pattern needs
// `fancy_regex` instead.
static PARAGRAPH_RE: Lazy<FancyRegex> =
    Lazy::new(|| FancyRegex::new(r"(?is)<[^>]*p(?!re|ic)[^>]*>(.+)<[^>]*/p[^>]*>").unwrap());

static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<\s*a[^>]+href\s*=\s*"(.+?)"[^>]*>"#).unwrap());

/// First `<title>` capture, or the literal placeholder if none is found.
pub fn extract_title(raw: &str) -> String {
    TITLE_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Space-joined concatenation of every `<p>`-shaped capture.
pub fn extract_paragraphs(raw: &str) -> String {
    PARAGRAPH_RE
        .captures_iter(raw)
        .filter_map(|c| c.ok())
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every `href` attribute value found inside an `<a ...>` tag, in document
/// order, exactly as captured (not yet resolved or deduplicated).
pub fn extract_hrefs(raw: &str) -> Vec<String> {
    HREF_RE
        .captures_iter(raw)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title() {
        let html = "<html><head><title>Hello World</title></head></html>";
        assert_eq!(extract_title(html), "Hello World");
    }

    #[test]
    fn missing_title_uses_placeholder() {
        assert_eq!(extract_title("<html><body>no title here</body></html>"), UNTITLED);
    }

    #[test]
    fn extracts_paragraph_text() {
        let html = "<p>alpha beta</p><div>skip</div><p>gamma</p>";
        // The greedy, dotall capture spans from the first <p> to the last
        // </p>-shaped tag, swallowing the intervening markup, not just the
        // two paragraph bodies individually — this is the documented,
        // intentional non-conformance.
        let text = extract_paragraphs(html);
        assert!(text.contains("alpha beta"));
        assert!(text.contains("gamma"));
    }

    #[test]
    fn paragraph_pattern_excludes_pre_and_pic() {
        let html = "<pre>code block</pre>";
        assert_eq!(extract_paragraphs(html), "");
    }

    #[test]
    fn extracts_hrefs_in_order() {
        let html = r#"<a href="one.html">One</a><a href="two.html">Two</a>"#;
        assert_eq!(extract_hrefs(html), vec!["one.html", "two.html"]);
    }

    #[test]
    fn href_requires_double_quotes() {
        let html = "<a href=one.html>One</a>";
        assert!(extract_hrefs(html).is_empty());
    }
}
