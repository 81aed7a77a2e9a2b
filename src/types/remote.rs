use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::quote::Quote;
use crate::config::SERVER_CATEGORY;

/// Generic item returned by the remote source. Only `title` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl RemoteItem {
    /// Map into the quote shape; items without a usable title are dropped.
    pub fn into_quote(self) -> Option<Quote> {
        let title = self.title?;
        let text = title.trim();
        if text.is_empty() {
            return None;
        }
        Some(Quote::new(text, SERVER_CATEGORY))
    }
}
