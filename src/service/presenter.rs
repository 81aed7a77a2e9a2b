use crate::types::{CategoryFilter, CategoryOption, Notice, PageSnapshot, Quote, QuoteDisplay};
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Presentation port driven by the quotes actor and the sync agent.
pub trait Presenter: Send + Sync {
    fn show_quote(&self, quote: &Quote);

    fn show_empty(&self, message: &str);

    fn populate_categories(&self, options: &[CategoryOption], selected: &CategoryFilter);

    fn notify(&self, notice: Notice);

    fn set_status(&self, status: &str);
}

/// Page state served over HTTP; cheap to clone, all clones share one snapshot.
#[derive(Clone, Default)]
pub struct PageState {
    inner: Arc<RwLock<PageSnapshot>>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        match self.inner.read() {
            Ok(page) => page.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut PageSnapshot)) {
        match self.inner.write() {
            Ok(mut page) => f(&mut page),
            Err(poisoned) => {
                warn!("page state lock poisoned; recovering");
                f(&mut poisoned.into_inner())
            }
        }
    }
}

impl Presenter for PageState {
    fn show_quote(&self, quote: &Quote) {
        let quote = quote.clone();
        self.update(|page| page.display = QuoteDisplay::Quote { quote });
    }

    fn show_empty(&self, message: &str) {
        self.update(|page| {
            page.display = QuoteDisplay::Empty {
                message: message.to_string(),
            }
        });
    }

    fn populate_categories(&self, options: &[CategoryOption], selected: &CategoryFilter) {
        self.update(|page| {
            page.categories = options.to_vec();
            page.filter = selected.clone();
        });
    }

    fn notify(&self, notice: Notice) {
        self.update(|page| page.notice = Some(notice));
    }

    fn set_status(&self, status: &str) {
        self.update(|page| page.status = Some(status.to_string()));
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Records every presenter call in order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Quote(Quote),
        Empty(String),
        Categories(Vec<String>, String),
        Notice(Notice),
        Status(String),
    }

    #[derive(Default)]
    pub struct RecordingPresenter {
        pub calls: Mutex<Vec<Call>>,
    }

    impl RecordingPresenter {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn notices(&self) -> Vec<Notice> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Notice(n) => Some(n),
                    _ => None,
                })
                .collect()
        }

        pub fn statuses(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Status(s) => Some(s),
                    _ => None,
                })
                .collect()
        }
    }

    impl Presenter for RecordingPresenter {
        fn show_quote(&self, quote: &Quote) {
            self.calls.lock().unwrap().push(Call::Quote(quote.clone()));
        }

        fn show_empty(&self, message: &str) {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Empty(message.to_string()));
        }

        fn populate_categories(&self, options: &[CategoryOption], selected: &CategoryFilter) {
            let values = options.iter().map(|o| o.value.clone()).collect();
            self.calls
                .lock()
                .unwrap()
                .push(Call::Categories(values, selected.as_str().to_string()));
        }

        fn notify(&self, notice: Notice) {
            self.calls.lock().unwrap().push(Call::Notice(notice));
        }

        fn set_status(&self, status: &str) {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Status(status.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_state_clones_share_snapshot() {
        let page = PageState::new();
        let other = page.clone();

        other.show_quote(&Quote::new("Stay hungry.", "Motivation"));
        other.set_status("Syncing with server...");
        other.notify(Notice::error("Invalid JSON file."));

        let snap = page.snapshot();
        assert_eq!(
            snap.display,
            QuoteDisplay::Quote {
                quote: Quote::new("Stay hungry.", "Motivation")
            }
        );
        assert_eq!(snap.status.as_deref(), Some("Syncing with server..."));
        assert_eq!(snap.notice, Some(Notice::error("Invalid JSON file.")));
    }

    #[test]
    fn empty_replaces_previous_quote() {
        let page = PageState::new();
        page.show_quote(&Quote::new("a", "b"));
        page.show_empty("nothing");
        assert_eq!(
            page.snapshot().display,
            QuoteDisplay::Empty {
                message: "nothing".to_string()
            }
        );
    }
}
