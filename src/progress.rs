/// Advisory crawl/index-build stages, reported through a `ProgressListener`.
/// A listener is never load-bearing for correctness: the default
/// implementation does nothing, and a slow or panicking listener must never
/// be able to stall the crawl loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieving,
    Parsing,
    Linking,
    Ranking,
    Done,
}

pub trait ProgressListener: Send + Sync {
    fn on_stage(&self, stage: Stage);
}

/// Listener used when the caller doesn't care to observe progress.
pub struct NoopListener;

impl ProgressListener for NoopListener {
    fn on_stage(&self, _stage: Stage) {}
}
