use thiserror::Error;

/// Crate-wide error type. Per the engine's failure-semantics contract, almost
/// none of these ever reach a caller of the public facade: fetch failures are
/// retried and then absorbed, and lookups on unknown inputs return sentinel
/// values rather than errors. These variants exist for the lower layers
/// (`Fetcher`, URL parsing, snapshot persistence) that a caller of the facade
/// never sees directly.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed url: {0}")]
    MalformedUrl(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}
