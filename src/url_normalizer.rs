//! Component A: URL parsing, canonicalisation, and relative-link resolution.
//!
//! A `NormalUrl` always decomposes a URL into four parts so that two URLs
//! that differ only in protocol/host case, or in a single trailing host
//! slash, compare equal after parsing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalUrl {
    pub protocol: String,
    pub host: String,
    pub base_path: String,
    pub file: String,
}

impl fmt::Display for NormalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", self.protocol, self.host, self.base_path, self.file)
    }
}

const SCHEMES: [&str; 2] = ["http://", "https://"];

fn strip_scheme(s: &str) -> Option<(&'static str, &str)> {
    let lower = s.to_ascii_lowercase();
    for scheme in SCHEMES {
        if lower.starts_with(scheme) {
            return Some((scheme, &s[scheme.len()..]));
        }
    }
    None
}

/// Parses an absolute URL string into a `NormalUrl`, lower-casing the
/// protocol and host and splitting the remainder at its last `/` into
/// `base_path` (always begins and ends with `/`) and `file` (never contains
/// `/`).
pub fn parse(s: &str) -> Result<NormalUrl, EngineError> {
    let (scheme, rest) = strip_scheme(s).ok_or_else(|| EngineError::MalformedUrl(s.to_string()))?;

    let (host_part, path_part) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx..]),
        None => (rest, ""),
    };

    let host = host_part.trim_end_matches('/').to_ascii_lowercase();
    if host.is_empty() {
        return Err(EngineError::MalformedUrl(s.to_string()));
    }

    let (base_path, file) = if path_part.is_empty() {
        ("/".to_string(), String::new())
    } else {
        match path_part.rfind('/') {
            Some(idx) => (path_part[..=idx].to_string(), path_part[idx + 1..].to_string()),
            None => ("/".to_string(), path_part.to_string()),
        }
    };

    Ok(NormalUrl {
        protocol: scheme.to_string(),
        host,
        base_path,
        file,
    })
}

/// Resolves an `href` discovered on `base`'s page against `base`. Mirrors
/// the source system's behaviour exactly, including returning `base`
/// unchanged for hrefs that don't match one of the three recognised shapes
/// (protocol-relative, bare relative, `mailto:`, etc. all fall through to
/// this case) — this is documented, intentional behaviour, not a bug.
pub fn resolve_against(base: &NormalUrl, href: &str) -> Result<NormalUrl, EngineError> {
    if strip_scheme(href).is_some() {
        return parse(href);
    }

    if let Some(rest) = href.strip_prefix("./") {
        let joined = format!("{}{}{}{}", base.protocol, base.host, base.base_path, rest);
        return parse(&joined);
    }

    if !href.starts_with("//") {
        if let Some(rest) = href.strip_prefix('/') {
            let joined = format!("{}{}/{}", base.protocol, base.host, rest);
            return parse(&joined);
        }
    }

    Ok(base.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalises_case_and_trailing_slash() {
        let a = parse("HTTP://People.Scs.Carleton.CA/").unwrap();
        let b = parse("http://people.scs.carleton.ca").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn splits_path_at_last_slash() {
        let u = parse("https://example.com/a/b/fruits").unwrap();
        assert_eq!(u.base_path, "/a/b/");
        assert_eq!(u.file, "fruits");
    }

    #[test]
    fn empty_path_becomes_root() {
        let u = parse("https://example.com").unwrap();
        assert_eq!(u.base_path, "/");
        assert_eq!(u.file, "");
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(parse("example.com/foo").is_err());
    }

    #[test]
    fn resolves_absolute_href() {
        let base = parse("https://example.com/a/").unwrap();
        let resolved = resolve_against(&base, "http://other.com/x").unwrap();
        assert_eq!(resolved, parse("http://other.com/x").unwrap());
    }

    #[test]
    fn resolves_dot_slash_href() {
        let base = parse("https://example.com/a/b/fruits").unwrap();
        let resolved = resolve_against(&base, "./apple.html").unwrap();
        assert_eq!(resolved, parse("https://example.com/a/apple.html").unwrap());
    }

    #[test]
    fn resolves_root_relative_href() {
        let base = parse("https://example.com/a/b/").unwrap();
        let resolved = resolve_against(&base, "/z.html").unwrap();
        assert_eq!(resolved, parse("https://example.com/z.html").unwrap());
    }

    #[test]
    fn unrecognised_shape_returns_base_unchanged() {
        let base = parse("https://example.com/a/").unwrap();
        let resolved = resolve_against(&base, "mailto:foo@example.com").unwrap();
        assert_eq!(resolved, base);

        let resolved = resolve_against(&base, "//cdn.example.com/x").unwrap();
        assert_eq!(resolved, base);

        let resolved = resolve_against(&base, "foo.html").unwrap();
        assert_eq!(resolved, base);
    }
}
