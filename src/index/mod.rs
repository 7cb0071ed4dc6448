//! Component F: the Index. Owns every indexed page and the global term
//! table; builds them from crawl output in the four ordered stages of
//! §4.F, then serves the lazy stat lookups in §4.F/§6.

pub mod page;
pub mod pagerank;
pub mod terms;

use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::crawler::UnprocessedPage;
use crate::extractor;
use crate::progress::{ProgressListener, Stage};
use crate::tokenizer;
use crate::url_normalizer::NormalUrl;

pub use page::IndexedPage;
pub use terms::{DocTermStat, GlobalTermStat};

#[derive(Debug, Serialize, Deserialize)]
pub struct Index {
    pub total_docs: u32,
    pub total_unique_words: u32,
    pub seed_url: String,
    pub crawl_time: u64,
    /// Enumeration order: the order each page's fetch was admitted to
    /// `fetched` during the crawl (§5). Iterating `pages_order` and looking
    /// each URL up in `pages` is the canonical iteration of the index.
    pub pages_order: Vec<NormalUrl>,
    pub pages: HashMap<NormalUrl, IndexedPage>,
    pub words: HashMap<String, GlobalTermStat>,
}

impl Index {
    /// Runs the four build stages of §4.F over freshly crawled pages.
    pub fn build(seed_url: &str, pages: Vec<UnprocessedPage>, damping_factor: f64, epsilon: f64) -> Self {
        Self::build_with_listener(seed_url, pages, damping_factor, epsilon, &crate::progress::NoopListener)
    }

    pub fn build_with_listener(
        seed_url: &str,
        unprocessed: Vec<UnprocessedPage>,
        damping_factor: f64,
        epsilon: f64,
        listener: &dyn ProgressListener,
    ) -> Self {
        listener.on_stage(Stage::Parsing);
        info!(pages = unprocessed.len(), "index build: parsing");

        let mut pages_order = Vec::with_capacity(unprocessed.len());
        let mut pages: HashMap<NormalUrl, IndexedPage> = HashMap::with_capacity(unprocessed.len());
        let mut words: HashMap<String, GlobalTermStat> = HashMap::new();

        // --- Stage 1: parse ---
        for up in unprocessed {
            let title = extractor::extract_title(&up.raw_text);
            let paragraphs = extractor::extract_paragraphs(&up.raw_text);
            let tokens = tokenizer::tokenize(&paragraphs);

            let outlinks: HashSet<NormalUrl> = up.outlinks.into_iter().collect();
            let mut page = IndexedPage::new(up.url.clone(), title, outlinks);
            page.size = tokens.len() as u32;

            for token in tokens {
                match page.word_map.get_mut(&token) {
                    Some(stat) => stat.count += 1,
                    None => {
                        let global = words.entry(token.clone()).or_insert_with(|| GlobalTermStat::new(token.clone()));
                        global.doc_occurrence += 1;
                        global.pages.push(up.url.clone());

                        let mut stat = DocTermStat::new(token.clone());
                        stat.count = 1;
                        page.word_map.insert(token, stat);
                    }
                }
            }
            page.unique_words = page.word_map.len() as u32;

            pages_order.push(up.url.clone());
            pages.insert(up.url, page);
        }

        let total_docs = pages.len() as u32;

        let mut index = Index {
            total_docs,
            total_unique_words: words.len() as u32,
            seed_url: seed_url.to_string(),
            crawl_time: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            pages_order,
            pages,
            words,
        };

        // --- Stage 2: TF·IDF prime ---
        info!("index build: priming tf-idf caches");
        let word_pairs: Vec<(NormalUrl, String)> = index
            .pages_order
            .iter()
            .flat_map(|u| {
                index.pages[u]
                    .word_map
                    .keys()
                    .cloned()
                    .map(move |w| (u.clone(), w))
                    .collect::<Vec<_>>()
            })
            .collect();
        for (url, word) in word_pairs {
            index.tf_idf(&url, &word);
        }

        // --- Stage 3: reciprocal in-links ---
        listener.on_stage(Stage::Linking);
        info!("index build: linking reciprocal inlinks");
        let reciprocal: Vec<(NormalUrl, NormalUrl)> = index
            .pages_order
            .iter()
            .flat_map(|p| {
                index.pages[p]
                    .outlinks
                    .iter()
                    .filter(|v| index.pages.contains_key(*v))
                    .map(move |v| (p.clone(), v.clone()))
            })
            .collect();
        for (p, v) in reciprocal {
            index.pages.get_mut(&v).unwrap().inlinks.insert(p);
        }

        // --- Stage 4: PageRank ---
        listener.on_stage(Stage::Ranking);
        info!("index build: computing pagerank");
        let ranks = pagerank::compute(
            &index.pages_order,
            |u| index.pages[u].outlinks.iter().cloned().collect(),
            damping_factor,
            epsilon,
        );
        for (url, rank) in index.pages_order.clone().into_iter().zip(ranks) {
            index.pages.get_mut(&url).unwrap().page_rank.set(rank);
        }

        listener.on_stage(Stage::Done);
        index
    }

    /// Iterates indexed pages in enumeration order (order of first
    /// successful fetch).
    pub fn pages_in_order(&self) -> impl Iterator<Item = &IndexedPage> {
        self.pages_order.iter().map(move |u| &self.pages[u])
    }

    pub fn page(&self, url: &NormalUrl) -> Option<&IndexedPage> {
        self.pages.get(url)
    }

    /// `idf(w)`: `log2(N / (1 + doc_occurrence))`, cached on first read, 0
    /// for an unknown word.
    pub fn idf(&self, word: &str) -> f64 {
        self.idf_if_known(word).unwrap_or(0.0)
    }

    /// Like `idf`, but `None` distinguishes "word not in the index" from a
    /// legitimately-zero IDF value — the Query Scorer needs that
    /// distinction to decide whether a query token contributes at all.
    pub fn idf_if_known(&self, word: &str) -> Option<f64> {
        let global = self.words.get(word)?;
        if let Some(cached) = global.idf.get() {
            return Some(cached);
        }
        let value = (self.total_docs as f64 / (1.0 + global.doc_occurrence as f64)).log2();
        global.idf.set(Some(value));
        Some(value)
    }

    /// `tf(u, w)`: `count(w in u) / size(u)`, cached on first read, 0 if `u`
    /// is unknown or doesn't contain `w`.
    pub fn tf(&self, url: &NormalUrl, word: &str) -> f64 {
        let Some(page) = self.pages.get(url) else {
            return 0.0;
        };
        let Some(stat) = page.word_map.get(word) else {
            return 0.0;
        };
        if let Some(cached) = stat.tf.get() {
            return cached;
        }
        let value = stat.count as f64 / page.size as f64;
        stat.tf.set(Some(value));
        value
    }

    /// `tf_idf(u, w)`: `log2(1 + tf(u,w)) * idf(w)`, cached on first read, 0
    /// unless both `u` is indexed and `w` is globally known.
    pub fn tf_idf(&self, url: &NormalUrl, word: &str) -> f64 {
        let Some(page) = self.pages.get(url) else {
            return 0.0;
        };
        let Some(stat) = page.word_map.get(word) else {
            return 0.0;
        };
        if let Some(cached) = stat.tf_idf.get() {
            return cached;
        }
        if !self.words.contains_key(word) {
            return 0.0;
        }
        let tf = self.tf(url, word);
        let idf = self.idf(word);
        let value = (1.0 + tf).log2() * idf;
        stat.tf_idf.set(Some(value));
        value
    }

    pub fn page_rank(&self, url: &NormalUrl) -> f64 {
        match self.pages.get(url) {
            Some(p) => p.page_rank.get(),
            None => -1.0,
        }
    }

    pub fn outgoing(&self, url: &NormalUrl) -> Option<Vec<NormalUrl>> {
        self.pages.get(url).map(|p| p.outlinks.iter().cloned().collect())
    }

    pub fn incoming(&self, url: &NormalUrl) -> Option<Vec<NormalUrl>> {
        self.pages.get(url).map(|p| p.inlinks.iter().cloned().collect())
    }
}
