use crate::db::{KeyValueStore, QUOTES_KEY};
use crate::error::QuoteError;
use crate::types::{Quote, default_quotes};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of an `import_many` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Ordered quotes held in memory and mirrored to durable storage on every mutation.
pub struct QuoteStore {
    quotes: Vec<Quote>,
    durable: Arc<dyn KeyValueStore>,
}

impl QuoteStore {
    /// Read the persisted list, falling back to the built-in defaults when the
    /// key is absent or unparsable. Only storage backend failures are returned.
    pub async fn load(durable: Arc<dyn KeyValueStore>) -> Result<Self, QuoteError> {
        let quotes = match durable.get(QUOTES_KEY).await? {
            Some(raw) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(quotes) => {
                    info!(count = quotes.len(), "quotes restored from durable storage");
                    quotes
                }
                Err(e) => {
                    warn!(error = %e, "stored quotes unparsable; using defaults");
                    default_quotes()
                }
            },
            None => {
                info!("no stored quotes; using defaults");
                default_quotes()
            }
        };
        Ok(Self { quotes, durable })
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn contains(&self, quote: &Quote) -> bool {
        self.quotes.contains(quote)
    }

    async fn save(&self, quotes: &[Quote]) -> Result<(), QuoteError> {
        let payload = serde_json::to_string(quotes)?;
        self.durable.set(QUOTES_KEY, &payload).await?;
        debug!(count = quotes.len(), "quotes saved");
        Ok(())
    }

    /// Persist `next` and only then make it the in-memory sequence, so a failed
    /// write leaves memory as it was.
    async fn commit(&mut self, next: Vec<Quote>) -> Result<(), QuoteError> {
        self.save(&next).await?;
        self.quotes = next;
        Ok(())
    }

    /// Append one quote after trimming both fields; empty fields are rejected
    /// before anything is mutated.
    pub async fn add(&mut self, text: &str, category: &str) -> Result<Quote, QuoteError> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(QuoteError::Validation(
                "Please fill in both fields before adding a quote.".to_string(),
            ));
        }
        let quote = Quote::new(text, category);
        let mut next = self.quotes.clone();
        next.push(quote.clone());
        self.commit(next).await?;
        Ok(quote)
    }

    /// Append an imported payload. Field contents are taken as-is; elements
    /// that are not quote-shaped objects are skipped.
    pub async fn import_many(&mut self, payload: Value) -> Result<ImportSummary, QuoteError> {
        let Value::Array(items) = payload else {
            return Err(QuoteError::ImportNotASequence);
        };

        let mut summary = ImportSummary::default();
        let mut next = self.quotes.clone();
        for item in items {
            match serde_json::from_value::<Quote>(item) {
                Ok(quote) => {
                    next.push(quote);
                    summary.imported += 1;
                }
                Err(e) => {
                    debug!(error = %e, "skipping non-quote element in import");
                    summary.skipped += 1;
                }
            }
        }
        self.commit(next).await?;
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            total = self.quotes.len(),
            "quotes imported"
        );
        Ok(summary)
    }

    /// Swap in a merged sequence and persist it.
    pub async fn replace_all(&mut self, quotes: Vec<Quote>) -> Result<(), QuoteError> {
        self.commit(quotes).await
    }
}
