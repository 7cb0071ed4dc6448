//! Component J: the Engine Facade. The single public surface: `crawl`,
//! `search`, `search_plus`, and the stat lookups, plus optional snapshot
//! persistence. The facade owns its current `Index` as a value; `crawl`
//! replaces it atomically, and queries borrow it read-only (§5, §9).

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::crawler::Crawler;
use crate::error::EngineError;
use crate::fetcher::Fetcher;
use crate::index::Index;
use crate::progress::{NoopListener, ProgressListener};
use crate::sorter;
use crate::url_normalizer::{self, NormalUrl};

pub const DEFAULT_SNAPSHOT_PATH: &str = "./data/crawl.dat";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResultPlus {
    pub title: String,
    pub score: f64,
    pub url: String,
    pub page_rank: f64,
    pub boosted: bool,
}

pub struct Engine<F: Fetcher> {
    config: EngineConfig,
    crawler: Crawler<F>,
    index: Option<Index>,
}

impl<F: Fetcher + 'static> Engine<F> {
    pub fn new(fetcher: Arc<F>, config: EngineConfig) -> Self {
        let crawler = Crawler::new(fetcher, config.clone());
        Self { config, crawler, index: None }
    }

    /// Clears any persisted snapshot at the default path. A fresh crawl
    /// doesn't depend on this having been called; it exists so callers can
    /// explicitly discard stale on-disk state before crawling.
    pub fn initialize(&self) -> Result<(), EngineError> {
        match fs::remove_file(DEFAULT_SNAPSHOT_PATH) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EngineError::Io(e)),
        }
    }

    /// Crawls `seed` and replaces the in-memory index atomically.
    pub async fn crawl(&mut self, seed: &str) -> Result<(), EngineError> {
        self.crawl_with_listener(seed, &NoopListener).await
    }

    pub async fn crawl_with_listener(
        &mut self,
        seed: &str,
        listener: &dyn ProgressListener,
    ) -> Result<(), EngineError> {
        let pages = self.crawler.crawl(seed, listener).await?;
        let index = Index::build_with_listener(
            seed,
            pages,
            self.config.damping_factor,
            self.config.convergence_epsilon,
            listener,
        );
        self.index = Some(index);
        Ok(())
    }

    /// Top-`k` results ranked by §4.H/§4.I. `k` is clamped to
    /// `[0, total_docs]`. Returns an empty vector if no crawl has run yet.
    pub fn search(&self, query: &str, boost: bool, k: usize) -> Vec<SearchResult> {
        let Some(index) = &self.index else {
            return Vec::new();
        };

        let mut scored = crate::query::score(index, query, boost);
        let mut rows: Vec<(String, f64)> = scored
            .drain(..)
            .map(|s| {
                let title = index.page(&s.url).map(|p| p.title.clone()).unwrap_or_default();
                (title, s.score)
            })
            .collect();

        sorter::sort_by_score_then_title(&mut rows, self.config.score_precision, |r| r.1, |r| &r.0);

        let k = k.min(rows.len());
        rows.into_iter()
            .take(k)
            .map(|(title, score)| SearchResult { title, score })
            .collect()
    }

    /// Same ranking as `search`, with the richer `SearchResultPlus` rows.
    pub fn search_plus(&self, query: &str, boost: bool, k: usize) -> Vec<SearchResultPlus> {
        let Some(index) = &self.index else {
            return Vec::new();
        };

        let scored = crate::query::score(index, query, boost);
        let mut rows: Vec<(String, f64, NormalUrl, f64)> = scored
            .into_iter()
            .map(|s| {
                let page = index.page(&s.url);
                let title = page.map(|p| p.title.clone()).unwrap_or_default();
                let page_rank = page.map(|p| p.page_rank.get()).unwrap_or(-1.0);
                (title, s.score, s.url, page_rank)
            })
            .collect();

        sorter::sort_by_score_then_title(&mut rows, self.config.score_precision, |r| r.1, |r| &r.0);

        let k = k.min(rows.len());
        rows.into_iter()
            .take(k)
            .map(|(title, score, url, page_rank)| SearchResultPlus {
                title,
                score,
                url: url.to_string(),
                page_rank,
                boosted: boost,
            })
            .collect()
    }

    pub fn idf(&self, word: &str) -> f64 {
        self.index.as_ref().map(|i| i.idf(word)).unwrap_or(0.0)
    }

    pub fn tf(&self, url: &str, word: &str) -> f64 {
        let Ok(url) = url_normalizer::parse(url) else { return 0.0 };
        self.index.as_ref().map(|i| i.tf(&url, word)).unwrap_or(0.0)
    }

    pub fn tf_idf(&self, url: &str, word: &str) -> f64 {
        let Ok(url) = url_normalizer::parse(url) else { return 0.0 };
        self.index.as_ref().map(|i| i.tf_idf(&url, word)).unwrap_or(0.0)
    }

    pub fn page_rank(&self, url: &str) -> f64 {
        let Ok(url) = url_normalizer::parse(url) else { return -1.0 };
        self.index.as_ref().map(|i| i.page_rank(&url)).unwrap_or(-1.0)
    }

    pub fn outgoing(&self, url: &str) -> Option<Vec<String>> {
        let url = url_normalizer::parse(url).ok()?;
        self.index.as_ref()?.outgoing(&url).map(|links| links.iter().map(|u| u.to_string()).collect())
    }

    pub fn incoming(&self, url: &str) -> Option<Vec<String>> {
        let url = url_normalizer::parse(url).ok()?;
        self.index.as_ref()?.incoming(&url).map(|links| links.iter().map(|u| u.to_string()).collect())
    }

    /// Read-only access to the current index, for introspection (and for
    /// integration tests that need to observe or perturb page state that
    /// the stat-lookup methods don't expose directly, such as page rank
    /// under interior mutability).
    pub fn index(&self) -> Option<&Index> {
        self.index.as_ref()
    }

    pub fn total_docs(&self) -> u32 {
        self.index.as_ref().map(|i| i.total_docs).unwrap_or(0)
    }

    /// Serialises the whole current index to `path` as a single opaque
    /// JSON blob (§6/§14). A no-op error if no crawl has run yet isn't
    /// raised; callers that crawl before saving never hit it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let Some(index) = &self.index else {
            return Ok(());
        };
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(index)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads a snapshot previously written by `save`, replacing the current
    /// in-memory index.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let json = fs::read_to_string(path)?;
        let index: Index = serde_json::from_str(&json)?;
        self.index = Some(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_normalizer::parse;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MockFetcher {
        pages: HashMap<NormalUrl, String>,
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

    fn engine_with_pages(pages: &[(&str, &str)]) -> Engine<MockFetcher> {
        let map = pages
            .iter()
            .map(|(u, body)| (parse(u).unwrap(), body.to_string()))
            .collect();
        Engine::new(Arc::new(MockFetcher { pages: map }), EngineConfig::default())
    }

    #[tokio::test]
    async fn search_before_crawl_is_empty() {
        let engine = engine_with_pages(&[]);
        assert!(engine.search("anything", false, 10).is_empty());
    }

    #[tokio::test]
    async fn top_k_clamps_to_total_docs() {
        let mut engine = engine_with_pages(&[
            ("https://example.com/a", r#"<title>A</title><a href="/b">b</a><p>alpha</p>"#),
            ("https://example.com/b", "<title>B</title><p>beta</p>"),
        ]);
        engine.crawl("https://example.com/a").await.unwrap();
        assert_eq!(engine.total_docs(), 2);
        assert_eq!(engine.search("", false, 1000).len(), engine.total_docs() as usize);
        assert_eq!(engine.search("", false, 0).len(), 0);
    }

    #[tokio::test]
    async fn empty_query_orders_by_title_ascending() {
        let mut engine = engine_with_pages(&[
            ("https://example.com/a", r#"<title>Zeta</title><a href="/b">b</a><p>alpha</p>"#),
            ("https://example.com/b", "<title>Alpha</title><p>beta</p>"),
        ]);
        engine.crawl("https://example.com/a").await.unwrap();
        let results = engine.search("", false, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Alpha");
        assert_eq!(results[1].title, "Zeta");
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[tokio::test]
    async fn snapshot_round_trips_observable_outputs() {
        let mut engine = engine_with_pages(&[(
            "https://example.com/a",
            "<title>A</title><p>alpha beta alpha</p>",
        )]);
        engine.crawl("https://example.com/a").await.unwrap();

        let dir = std::env::temp_dir().join(format!("engine-snapshot-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.json");
        engine.save(&path).unwrap();

        let mut reloaded = engine_with_pages(&[]);
        reloaded.load(&path).unwrap();

        assert_eq!(
            engine.search("alpha", false, 10),
            reloaded.search("alpha", false, 10)
        );
        assert_eq!(engine.page_rank("https://example.com/a"), reloaded.page_rank("https://example.com/a"));

        let _ = fs::remove_dir_all(&dir);
    }
}
