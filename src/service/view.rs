use crate::db::{KeyValueStore, LAST_VIEWED_QUOTE_KEY, SELECTED_CATEGORY_KEY};
use crate::error::QuoteError;
use crate::service::category_index::category_options;
use crate::service::presenter::Presenter;
use crate::service::quote_store::QuoteStore;
use crate::types::page::EMPTY_MESSAGE;
use crate::types::{CategoryFilter, Quote};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Pick one quote uniformly among those matching `filter`.
pub fn select_candidate<'a, R: Rng>(
    quotes: &'a [Quote],
    filter: &CategoryFilter,
    rng: &mut R,
) -> Option<&'a Quote> {
    let candidates: Vec<&Quote> = quotes.iter().filter(|q| filter.matches(q)).collect();
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates[index])
}

/// Drives the display region and owns the selected category filter.
pub struct ViewController {
    filter: CategoryFilter,
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    presenter: Arc<dyn Presenter>,
}

impl ViewController {
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            filter: CategoryFilter::All,
            durable,
            session,
            presenter,
        }
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Restore the persisted filter, populate the dropdown, then either show the
    /// session's last quote as-is or roll a fresh one.
    pub async fn init<R: Rng>(
        &mut self,
        store: &QuoteStore,
        rng: &mut R,
    ) -> Result<Option<Quote>, QuoteError> {
        if let Some(saved) = self.durable.get(SELECTED_CATEGORY_KEY).await? {
            self.filter = CategoryFilter::from(saved);
        }
        self.refresh_categories(store);

        if let Some(last) = self.restore_last_viewed(store).await? {
            debug!(quote = %last, "restored last viewed quote");
            self.presenter.show_quote(&last);
            return Ok(Some(last));
        }
        self.render_current(store, rng).await
    }

    async fn restore_last_viewed(&self, store: &QuoteStore) -> Result<Option<Quote>, QuoteError> {
        let Some(raw) = self.session.get(LAST_VIEWED_QUOTE_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<Quote>(&raw) {
            Ok(quote) if store.contains(&quote) => Ok(Some(quote)),
            Ok(quote) => {
                debug!(quote = %quote, "last viewed quote no longer in store; re-rolling");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "last viewed quote unparsable; re-rolling");
                Ok(None)
            }
        }
    }

    pub fn refresh_categories(&self, store: &QuoteStore) {
        let options = category_options(store.quotes());
        self.presenter.populate_categories(&options, &self.filter);
    }

    /// Show one random quote matching `filter`, or the empty-state message.
    /// Only a shown quote is written to the session store.
    pub async fn render<R: Rng>(
        &self,
        store: &QuoteStore,
        filter: &CategoryFilter,
        rng: &mut R,
    ) -> Result<Option<Quote>, QuoteError> {
        let Some(quote) = select_candidate(store.quotes(), filter, rng).cloned() else {
            self.presenter.show_empty(EMPTY_MESSAGE);
            return Ok(None);
        };
        self.presenter.show_quote(&quote);
        let payload = serde_json::to_string(&quote)?;
        self.session.set(LAST_VIEWED_QUOTE_KEY, &payload).await?;
        Ok(Some(quote))
    }

    /// Re-render with the current filter.
    pub async fn render_current<R: Rng>(
        &self,
        store: &QuoteStore,
        rng: &mut R,
    ) -> Result<Option<Quote>, QuoteError> {
        self.render(store, &self.filter, rng).await
    }

    /// Persist the new filter, then render with it.
    pub async fn set_filter<R: Rng>(
        &mut self,
        value: CategoryFilter,
        store: &QuoteStore,
        rng: &mut R,
    ) -> Result<Option<Quote>, QuoteError> {
        self.durable
            .set(SELECTED_CATEGORY_KEY, value.as_str())
            .await?;
        self.filter = value;
        self.refresh_categories(store);
        self.render(store, &self.filter, rng).await
    }
}
