use serde::{Deserialize, Serialize};
use std::cell::Cell;

use crate::url_normalizer::NormalUrl;

/// Global per-word statistics shared by every page that contains the word.
/// `idf` is a lazy cache: computed on first read, frozen thereafter (the
/// word-document membership it depends on never changes after index build).
#[derive(Debug, Serialize, Deserialize)]
pub struct GlobalTermStat {
    pub word: String,
    pub doc_occurrence: u32,
    /// Pages containing this word, in order of first insertion. Stored as
    /// URL keys (a relational lookup into `Index::pages`), never as an
    /// owning reference.
    pub pages: Vec<NormalUrl>,
    #[serde(with = "cached_f64")]
    pub idf: Cell<Option<f64>>,
}

impl GlobalTermStat {
    pub fn new(word: String) -> Self {
        Self {
            word,
            doc_occurrence: 0,
            pages: Vec::new(),
            idf: Cell::new(None),
        }
    }
}

/// Per-page statistics for one word. `global_ref` is the word string itself:
/// a relational key back into `Index::words`, not an owning reference, per
/// the cyclic-graph strategy in the design notes.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocTermStat {
    pub word: String,
    pub count: u32,
    #[serde(with = "cached_f64")]
    pub tf: Cell<Option<f64>>,
    #[serde(with = "cached_f64")]
    pub tf_idf: Cell<Option<f64>>,
}

impl DocTermStat {
    pub fn new(word: String) -> Self {
        Self {
            word,
            count: 0,
            tf: Cell::new(None),
            tf_idf: Cell::new(None),
        }
    }
}

/// (De)serialises a `Cell<Option<f64>>` cache as a plain `Option<f64>`, so a
/// snapshot round-trip reproduces every cached value rather than forcing
/// every query to recompute after `load`.
mod cached_f64 {
    use super::Cell;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Cell<Option<f64>>, s: S) -> Result<S::Ok, S::Error> {
        value.get().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Cell<Option<f64>>, D::Error> {
        Ok(Cell::new(Option::<f64>::deserialize(d)?))
    }
}
