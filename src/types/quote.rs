use serde::{Deserialize, Serialize};
use std::fmt;

/// A text/category record. Records carry no identity; dedup compares `text` only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" — [{}]", self.text, self.category)
    }
}

/// Body of an add request, before trimming and validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewQuote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

/// Seed set used when durable storage holds nothing usable.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The best way to get started is to quit talking and begin doing.",
            "Motivation",
        ),
        Quote::new("Don’t let yesterday take up too much of today.", "Wisdom"),
        Quote::new(
            "It’s not whether you get knocked down, it’s whether you get up.",
            "Perseverance",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_page_format() {
        let q = Quote::new("Stay hungry.", "Motivation");
        assert_eq!(q.to_string(), "\"Stay hungry.\" — [Motivation]");
    }

    #[test]
    fn new_quote_tolerates_missing_fields() {
        let nq: NewQuote = serde_json::from_str(r#"{"text":"only text"}"#).unwrap();
        assert_eq!(nq.text, "only text");
        assert!(nq.category.is_empty());
    }
}
