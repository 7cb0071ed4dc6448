use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use crate::index::terms::DocTermStat;
use crate::url_normalizer::NormalUrl;

/// An indexed page. Identity is `url`. `page_rank` is written exactly once,
/// by the PageRank Engine, at the end of index build.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexedPage {
    pub url: NormalUrl,
    pub title: String,
    pub size: u32,
    pub unique_words: u32,
    pub word_map: HashMap<String, DocTermStat>,
    pub outlinks: HashSet<NormalUrl>,
    pub inlinks: HashSet<NormalUrl>,
    #[serde(with = "cached_f64")]
    pub page_rank: Cell<f64>,
}

impl IndexedPage {
    pub fn new(url: NormalUrl, title: String, outlinks: HashSet<NormalUrl>) -> Self {
        Self {
            url,
            title,
            size: 0,
            unique_words: 0,
            word_map: HashMap::new(),
            outlinks,
            inlinks: HashSet::new(),
            page_rank: Cell::new(0.0),
        }
    }
}

mod cached_f64 {
    use super::Cell;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Cell<f64>, s: S) -> Result<S::Ok, S::Error> {
        value.get().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Cell<f64>, D::Error> {
        Ok(Cell::new(f64::deserialize(d)?))
    }
}
