use async_trait::async_trait;
use std::collections::HashMap;

use keyword_search_engine::error::EngineError;
use keyword_search_engine::fetcher::Fetcher;
use keyword_search_engine::url_normalizer::{self, NormalUrl};

/// An in-memory `Fetcher` backed by a fixed map of canned HTML bodies, for
/// deterministic crawl tests without real network access.
pub struct MockFetcher {
    pages: HashMap<NormalUrl, String>,
}

impl MockFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        let pages = pages
            .iter()
            .map(|(u, body)| (url_normalizer::parse(u).unwrap(), body.to_string()))
            .collect();
        Self { pages }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &NormalUrl) -> Result<String, EngineError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| EngineError::MalformedUrl(format!("no mock page for {url}")))
    }
}
