use crate::config::Config;
use crate::error::QuoteError;
use crate::types::{Quote, RemoteItem};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// The remote quote source polled by the sync agent.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch at most `limit` quotes, already mapped to the server category.
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<Quote>, QuoteError>;

    /// Send one quote upstream. The response body is ignored.
    async fn post_quote(&self, quote: &Quote) -> Result<(), QuoteError>;
}

/// Remote source over plain HTTP. One attempt per call, no retry.
#[derive(Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    url: Url,
}

impl HttpRemote {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, QuoteError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("quotekeeper/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let client = builder.build()?;
        Ok(Self::new(client, cfg.remote_url.clone()))
    }

    fn batch_url(&self, limit: usize) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("_limit", &limit.to_string());
        url
    }
}

#[async_trait]
impl RemoteSource for HttpRemote {
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<Quote>, QuoteError> {
        let resp = self
            .client
            .get(self.batch_url(limit))
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(QuoteError::RemoteStatus(status));
        }
        let items: Vec<RemoteItem> = resp.json().await?;
        let quotes: Vec<Quote> = items
            .into_iter()
            .filter_map(RemoteItem::into_quote)
            .take(limit)
            .collect();
        debug!(count = quotes.len(), "remote batch fetched");
        Ok(quotes)
    }

    async fn post_quote(&self, quote: &Quote) -> Result<(), QuoteError> {
        let resp = self.client.post(self.url.clone()).json(quote).send().await?;
        info!(status = %resp.status(), text = %quote.text, "quote posted to remote");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_url_carries_limit() {
        let remote = HttpRemote::new(
            reqwest::Client::new(),
            Url::parse("https://example.test/posts").unwrap(),
        );
        assert_eq!(
            remote.batch_url(5).as_str(),
            "https://example.test/posts?_limit=5"
        );
    }

    #[tokio::test]
    async fn unreachable_remote_is_a_transport_error() {
        let remote = HttpRemote::new(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9/posts").unwrap(),
        );
        let err = remote.fetch_batch(3).await.unwrap_err();
        assert!(matches!(err, QuoteError::Reqwest(_)));
    }
}
