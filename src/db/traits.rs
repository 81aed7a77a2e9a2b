use crate::error::QuoteError;
use async_trait::async_trait;

/// Opaque string key-value storage, the shape of both browser stores.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, QuoteError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), QuoteError>;
}
