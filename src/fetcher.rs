//! Component B: the page fetcher. Retrieves a URL's full response body as
//! text; bounded retry lives in the Crawler (§4.E), not here — this trait
//! exposes one attempt at a time so the Crawler can apply its own retry
//! budget and requeue-at-tail policy.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::EngineError;
use crate::url_normalizer::NormalUrl;

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &NormalUrl) -> Result<String, EngineError>;
}

/// Line-terminator normalisation applied to every fetched body: `\r\n` and
/// bare `\r` both collapse to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Default `Fetcher` backed by `reqwest`.
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()
            .expect("building the reqwest client should never fail for these options");
        Self { client }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &NormalUrl) -> Result<String, EngineError> {
        let full = url.to_string();
        let response = self
            .client
            .get(&full)
            .send()
            .await
            .map_err(|source| EngineError::Fetch { url: full.clone(), source })?;

        let text = response
            .text()
            .await
            .map_err(|source| EngineError::Fetch { url: full.clone(), source })?;

        Ok(normalize_newlines(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_crlf_and_cr() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
    }
}
