//! Component H: the query scorer. Builds an ephemeral query document and
//! ranks every indexed page by cosine similarity over TF·IDF vectors,
//! optionally boosted by PageRank.

use std::collections::HashMap;

use tracing::debug;

use crate::index::Index;
use crate::tokenizer;
use crate::url_normalizer::NormalUrl;

struct QueryTerm {
    tf_idf: f64,
}

/// An ephemeral mirror of `IndexedPage`'s term structure: owns no global
/// entries, has no URL, and is discarded after a single search.
struct QueryDocument {
    terms: HashMap<String, QueryTerm>,
}

fn build_query_document(index: &Index, query: &str) -> QueryDocument {
    let tokens = tokenizer::tokenize(query);
    let size = tokens.len();

    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in &tokens {
        // Unknown tokens contribute nothing: only attach terms the index
        // actually knows about.
        if index.idf_if_known(token).is_some() {
            *counts.entry(token.clone()).or_insert(0) += 1;
        }
    }

    let terms = counts
        .into_iter()
        .map(|(word, count)| {
            let tf = count as f64 / size as f64;
            let idf = index.idf(&word);
            let tf_idf = (1.0 + tf).log2() * idf;
            (word, QueryTerm { tf_idf })
        })
        .collect();

    QueryDocument { terms }
}

fn cosine_similarity(index: &Index, query: &QueryDocument, page_url: &NormalUrl) -> f64 {
    let mut dot = 0.0;
    let mut query_sq = 0.0;
    let mut doc_sq_restricted = 0.0;

    for (word, qterm) in &query.terms {
        query_sq += qterm.tf_idf * qterm.tf_idf;

        if let Some(page) = index.page(page_url) {
            if page.word_map.contains_key(word) {
                let doc_tf_idf = index.tf_idf(page_url, word);
                dot += qterm.tf_idf * doc_tf_idf;
                doc_sq_restricted += doc_tf_idf * doc_tf_idf;
            }
        }
    }

    let denom = query_sq.sqrt() * doc_sq_restricted.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// One scored page: its URL and the final score (cosine, optionally
/// multiplied by page rank).
pub struct ScoredPage {
    pub url: NormalUrl,
    pub score: f64,
}

/// Scores every indexed page against `query`, optionally boosted by
/// PageRank (§4.H step 3). Unranked/unsorted: callers apply the Result
/// Sorter (§4.I) afterwards.
pub fn score(index: &Index, query_text: &str, boost: bool) -> Vec<ScoredPage> {
    let query = build_query_document(index, query_text);
    debug!(terms = query.terms.len(), "scoring query");

    index
        .pages_in_order()
        .map(|page| {
            let cos = cosine_similarity(index, &query, &page.url);
            let score = cos * if boost { page.page_rank.get() } else { 1.0 };
            ScoredPage { url: page.url.clone(), score }
        })
        .collect()
}
