//! Dedup-by-text merge of a remote batch into the local quote list.
//!
//! A remote quote is appended only when its exact text is not already stored
//! locally. Local quotes are never modified, reordered or dropped.

use crate::types::Quote;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub added: usize,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        self.added > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub quotes: Vec<Quote>,
    pub outcome: MergeOutcome,
}

pub fn merge(local: &[Quote], remote: &[Quote]) -> Merged {
    let mut known: HashSet<&str> = local.iter().map(|q| q.text.as_str()).collect();
    let mut quotes = local.to_vec();
    let mut outcome = MergeOutcome::default();

    for incoming in remote {
        // also drops repeats within the batch
        if known.insert(incoming.text.as_str()) {
            quotes.push(incoming.clone());
            outcome.added += 1;
        }
    }

    Merged { quotes, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, category: &str) -> Quote {
        Quote::new(text, category)
    }

    #[test]
    fn new_texts_are_appended_in_remote_order() {
        let local = vec![q("a", "Wisdom")];
        let remote = vec![q("b", "Server"), q("c", "Server")];

        let merged = merge(&local, &remote);
        assert_eq!(
            merged.quotes,
            vec![q("a", "Wisdom"), q("b", "Server"), q("c", "Server")]
        );
        assert_eq!(merged.outcome, MergeOutcome { added: 2 });
    }

    #[test]
    fn matching_text_leaves_local_quote_untouched() {
        let local = vec![
            q("sunt aut facere", "Philosophy"),
            q("b", "Humor"),
            q("sunt aut facere", "Motivation"),
        ];
        let remote = vec![q("sunt aut facere", "Server"), q("b", "Server")];

        let merged = merge(&local, &remote);
        assert_eq!(merged.quotes, local);
        assert_eq!(merged.outcome, MergeOutcome { added: 0 });
        assert!(!merged.outcome.changed());
    }

    #[test]
    fn duplicates_within_batch_collapse() {
        let merged = merge(&[], &[q("x", "Server"), q("x", "Other")]);
        assert_eq!(merged.quotes, vec![q("x", "Server")]);
        assert_eq!(merged.outcome.added, 1);
    }

    #[test]
    fn empty_remote_is_identity() {
        let local = vec![q("a", "Wisdom")];
        let merged = merge(&local, &[]);
        assert_eq!(merged.quotes, local);
        assert!(!merged.outcome.changed());
    }
}
