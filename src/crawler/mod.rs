//! Component E: the crawler. Breadth-first over the link graph from a seed
//! URL, bounded by a page cap and a per-URL retry budget.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::extractor;
use crate::fetcher::Fetcher;
use crate::progress::{ProgressListener, Stage};
use crate::url_normalizer::{self, NormalUrl};

/// A page as handed off by the crawler, before any index bookkeeping exists.
/// Discarded once the Index is built from it.
#[derive(Debug, Clone)]
pub struct UnprocessedPage {
    pub url: NormalUrl,
    pub raw_text: String,
    pub outlinks: Vec<NormalUrl>,
}

pub struct Crawler<F: Fetcher> {
    fetcher: Arc<F>,
    config: EngineConfig,
}

impl<F: Fetcher + 'static> Crawler<F> {
    pub fn new(fetcher: Arc<F>, config: EngineConfig) -> Self {
        Self { fetcher, config }
    }

    /// Runs the BFS crawl described in §4.E and returns every page admitted
    /// to `fetched`, in the order their fetches completed (here: the order
    /// each page was popped off the frontier, which is a deterministic
    /// total order given the input and satisfies the spec's ordering
    /// requirement without needing a completion race to settle it).
    pub async fn crawl(
        &self,
        seed: &str,
        listener: &dyn ProgressListener,
    ) -> Result<Vec<UnprocessedPage>, EngineError> {
        let seed_url = url_normalizer::parse(seed)?;

        let mut frontier: VecDeque<NormalUrl> = VecDeque::from([seed_url.clone()]);
        let mut seen: HashSet<NormalUrl> = HashSet::from([seed_url.clone()]);
        let mut fail_count: HashMap<NormalUrl, u32> = HashMap::new();
        let mut fetched: Vec<UnprocessedPage> = Vec::new();
        let mut admitted: usize = 0;

        listener.on_stage(Stage::Retrieving);
        info!(seed, page_cap = self.config.page_cap, "crawl starting");

        while !frontier.is_empty() && admitted < self.config.page_cap {
            let remaining_capacity = self.config.page_cap - admitted;
            let batch_size = self.config.concurrency.min(frontier.len()).min(remaining_capacity);

            let batch: Vec<NormalUrl> = (0..batch_size).filter_map(|_| frontier.pop_front()).collect();

            let mut handles = Vec::with_capacity(batch.len());
            for url in batch {
                let fetcher = Arc::clone(&self.fetcher);
                handles.push(tokio::spawn(async move {
                    let result = fetcher.fetch(&url).await;
                    (url, result)
                }));
            }

            for handle in handles {
                let (url, result) = handle.await.expect("fetch task panicked");
                match result {
                    Ok(raw_text) => {
                        debug!(url = %url, "fetched page");
                        let outlinks = extract_outlinks(&url, &raw_text);
                        for v in &outlinks {
                            if seen.insert(v.clone()) {
                                frontier.push_back(v.clone());
                            }
                        }
                        fetched.push(UnprocessedPage { url, raw_text, outlinks });
                        admitted += 1;
                    }
                    Err(_) => {
                        let attempts = fail_count.entry(url.clone()).or_insert(0);
                        if *attempts < self.config.max_retries {
                            *attempts += 1;
                            warn!(url = %url, attempt = *attempts, "fetch failed, retrying");
                            frontier.push_back(url);
                        } else {
                            warn!(url = %url, "fetch failed permanently, admitting blank page");
                            fetched.push(UnprocessedPage {
                                url,
                                raw_text: String::new(),
                                outlinks: Vec::new(),
                            });
                        }
                    }
                }
            }
        }

        info!(pages = fetched.len(), "crawl finished");
        Ok(fetched)
    }
}

/// Extracts hrefs from `raw_text`, resolves each against `base`, drops
/// malformed resolutions, and de-duplicates while preserving first-seen
/// order (the outlinks "ordered set" of §3).
fn extract_outlinks(base: &NormalUrl, raw_text: &str) -> Vec<NormalUrl> {
    let mut seen_on_page: HashSet<NormalUrl> = HashSet::new();
    let mut outlinks = Vec::new();

    for href in extractor::extract_hrefs(raw_text) {
        if let Ok(resolved) = url_normalizer::resolve_against(base, &href) {
            if seen_on_page.insert(resolved.clone()) {
                outlinks.push(resolved);
            }
        }
    }

    outlinks
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap as StdHashMap;
    use tokio::sync::Mutex as AsyncMutex;

    struct MockFetcher {
        pages: StdHashMap<NormalUrl, String>,
        failures_remaining: AsyncMutex<StdHashMap<NormalUrl, u32>>,
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &NormalUrl) -> Result<String, EngineError> {
            let mut failures = self.failures_remaining.lock().await;
            if let Some(count) = failures.get_mut(url) {
                if *count > 0 {
                    *count -= 1;
                    return Err(EngineError::MalformedUrl("simulated failure".into()));
                }
            }
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| EngineError::MalformedUrl(format!("no mock page for {url}")))
        }
    }

    fn page(pages: &[(&str, &str)]) -> StdHashMap<NormalUrl, String> {
        pages
            .iter()
            .map(|(u, body)| (url_normalizer::parse(u).unwrap(), body.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn bfs_follows_links_and_dedupes() {
        let pages = page(&[
            (
                "https://example.com/",
                r#"<a href="/a.html">A</a><a href="/a.html">A again</a><a href="/b.html">B</a>"#,
            ),
            ("https://example.com/a.html", "<p>alpha</p>"),
            ("https://example.com/b.html", "<p>beta</p>"),
        ]);
        let fetcher = Arc::new(MockFetcher {
            pages,
            failures_remaining: AsyncMutex::new(StdHashMap::new()),
        });
        let crawler = Crawler::new(fetcher, EngineConfig::default());

        let fetched = crawler
            .crawl("https://example.com/", &crate::progress::NoopListener)
            .await
            .unwrap();

        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[0].outlinks.len(), 2);
    }

    #[tokio::test]
    async fn page_cap_bounds_total_fetched() {
        let pages = page(&[
            ("https://example.com/", r#"<a href="/a.html">A</a>"#),
            ("https://example.com/a.html", r#"<a href="/b.html">B</a>"#),
            ("https://example.com/b.html", "<p>stop here</p>"),
        ]);
        let fetcher = Arc::new(MockFetcher {
            pages,
            failures_remaining: AsyncMutex::new(StdHashMap::new()),
        });
        let mut config = EngineConfig::default();
        config.page_cap = 2;
        let crawler = Crawler::new(fetcher, config);

        let fetched = crawler
            .crawl("https://example.com/", &crate::progress::NoopListener)
            .await
            .unwrap();

        assert_eq!(fetched.len(), 2);
    }

    #[tokio::test]
    async fn retries_then_admits_blank_page() {
        let pages = page(&[("https://example.com/", "<p>hello</p>")]);
        let mut failures = StdHashMap::new();
        failures.insert(url_normalizer::parse("https://example.com/").unwrap(), 10);
        let fetcher = Arc::new(MockFetcher {
            pages,
            failures_remaining: AsyncMutex::new(failures),
        });
        let mut config = EngineConfig::default();
        config.max_retries = 2;
        let crawler = Crawler::new(fetcher, config);

        let fetched = crawler
            .crawl("https://example.com/", &crate::progress::NoopListener)
            .await
            .unwrap();

        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].raw_text, "");
        assert!(fetched[0].outlinks.is_empty());
    }
}
