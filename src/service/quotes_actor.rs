use crate::api::RemoteSource;
use crate::db::KeyValueStore;
use crate::error::QuoteError;
use crate::service::category_index::category_options;
use crate::service::merge::{MergeOutcome, merge};
use crate::service::presenter::Presenter;
use crate::service::quote_store::{ImportSummary, QuoteStore};
use crate::service::transfer::{export_json, parse_import};
use crate::service::view::ViewController;
use crate::types::{CategoryFilter, CategoryOption, NewQuote, Notice, Quote};

use rand::SeedableRng;
use rand::rngs::StdRng;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ADD_SUCCESS: &str = "New quote added successfully!";
pub const IMPORT_SUCCESS: &str = "Quotes imported successfully!";
pub const IMPORT_INVALID: &str = "Invalid JSON file.";
pub const IMPORT_NOT_SAVED: &str = "Saving the imported quotes failed.";

/// Messages handled by the quotes actor. Each runs to completion before the next.
#[derive(Debug)]
pub enum QuotesActorMessage {
    /// Snapshot of the whole store.
    List(RpcReplyPort<Vec<Quote>>),
    /// Validate, append and persist one quote.
    Add(NewQuote, RpcReplyPort<Result<Quote, QuoteError>>),
    /// Parse uploaded file contents and append their quotes.
    Import(Vec<u8>, RpcReplyPort<Result<ImportSummary, QuoteError>>),
    /// Pretty JSON of the whole store.
    Export(RpcReplyPort<Result<String, QuoteError>>),
    /// Roll a new quote with the current filter.
    Render(RpcReplyPort<Result<Option<Quote>, QuoteError>>),
    /// Persist a new filter and render with it.
    SetFilter(CategoryFilter, RpcReplyPort<Result<Option<Quote>, QuoteError>>),
    Categories(RpcReplyPort<Vec<CategoryOption>>),
    /// Merge a fetched remote batch into the live store.
    ApplyRemote(Vec<Quote>, RpcReplyPort<Result<MergeOutcome, QuoteError>>),
}

/// Handle for interacting with the quotes actor.
#[derive(Clone)]
pub struct QuotesHandle {
    actor: ActorRef<QuotesActorMessage>,
}

impl QuotesHandle {
    pub async fn list(&self) -> Result<Vec<Quote>, QuoteError> {
        ractor::call!(self.actor, QuotesActorMessage::List)
            .map_err(|e| QuoteError::RactorError(format!("List RPC failed: {e}")))
    }

    pub async fn add(&self, new_quote: NewQuote) -> Result<Quote, QuoteError> {
        ractor::call!(self.actor, QuotesActorMessage::Add, new_quote)
            .map_err(|e| QuoteError::RactorError(format!("Add RPC failed: {e}")))?
    }

    pub async fn import(&self, contents: Vec<u8>) -> Result<ImportSummary, QuoteError> {
        ractor::call!(self.actor, QuotesActorMessage::Import, contents)
            .map_err(|e| QuoteError::RactorError(format!("Import RPC failed: {e}")))?
    }

    pub async fn export(&self) -> Result<String, QuoteError> {
        ractor::call!(self.actor, QuotesActorMessage::Export)
            .map_err(|e| QuoteError::RactorError(format!("Export RPC failed: {e}")))?
    }

    pub async fn render(&self) -> Result<Option<Quote>, QuoteError> {
        ractor::call!(self.actor, QuotesActorMessage::Render)
            .map_err(|e| QuoteError::RactorError(format!("Render RPC failed: {e}")))?
    }

    pub async fn set_filter(&self, filter: CategoryFilter) -> Result<Option<Quote>, QuoteError> {
        ractor::call!(self.actor, QuotesActorMessage::SetFilter, filter)
            .map_err(|e| QuoteError::RactorError(format!("SetFilter RPC failed: {e}")))?
    }

    pub async fn categories(&self) -> Result<Vec<CategoryOption>, QuoteError> {
        ractor::call!(self.actor, QuotesActorMessage::Categories)
            .map_err(|e| QuoteError::RactorError(format!("Categories RPC failed: {e}")))
    }

    pub async fn apply_remote(&self, batch: Vec<Quote>) -> Result<MergeOutcome, QuoteError> {
        ractor::call!(self.actor, QuotesActorMessage::ApplyRemote, batch)
            .map_err(|e| QuoteError::RactorError(format!("ApplyRemote RPC failed: {e}")))?
    }
}

/// Collaborators injected into the actor at spawn.
pub struct QuotesActorArgs {
    pub durable: Arc<dyn KeyValueStore>,
    pub session: Arc<dyn KeyValueStore>,
    pub presenter: Arc<dyn Presenter>,
    /// When set, every added quote is also posted here.
    pub upstream: Option<Arc<dyn RemoteSource>>,
    pub rng: StdRng,
}

impl QuotesActorArgs {
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            durable,
            session,
            presenter,
            upstream: None,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_upstream(mut self, upstream: Arc<dyn RemoteSource>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }
}

/// Internal state held by the quotes actor
struct QuotesActorState {
    store: QuoteStore,
    view: ViewController,
    presenter: Arc<dyn Presenter>,
    upstream: Option<Arc<dyn RemoteSource>>,
    rng: StdRng,
}

struct QuotesActor;

#[ractor::async_trait]
impl Actor for QuotesActor {
    type Msg = QuotesActorMessage;
    type State = QuotesActorState;
    type Arguments = QuotesActorArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let QuotesActorArgs {
            durable,
            session,
            presenter,
            upstream,
            mut rng,
        } = args;

        let store = QuoteStore::load(durable.clone())
            .await
            .map_err(|e| ActorProcessingErr::from(format!("quote store load failed: {}", e)))?;

        let mut view = ViewController::new(durable, session, presenter.clone());
        view.init(&store, &mut rng)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("view init failed: {}", e)))?;

        info!(
            quotes = store.len(),
            filter = view.filter().as_str(),
            "QuotesActor started"
        );

        Ok(QuotesActorState {
            store,
            view,
            presenter,
            upstream,
            rng,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            QuotesActorMessage::List(rp) => {
                let _ = rp.send(state.store.quotes().to_vec());
            }
            QuotesActorMessage::Add(new_quote, rp) => {
                let res = self.handle_add(state, new_quote).await;
                let _ = rp.send(res);
            }
            QuotesActorMessage::Import(contents, rp) => {
                let res = self.handle_import(state, &contents).await;
                let _ = rp.send(res);
            }
            QuotesActorMessage::Export(rp) => {
                let _ = rp.send(export_json(state.store.quotes()));
            }
            QuotesActorMessage::Render(rp) => {
                let res = state
                    .view
                    .render_current(&state.store, &mut state.rng)
                    .await;
                let _ = rp.send(res);
            }
            QuotesActorMessage::SetFilter(filter, rp) => {
                debug!(filter = filter.as_str(), "filter changed");
                let res = state
                    .view
                    .set_filter(filter, &state.store, &mut state.rng)
                    .await;
                let _ = rp.send(res);
            }
            QuotesActorMessage::Categories(rp) => {
                let _ = rp.send(category_options(state.store.quotes()));
            }
            QuotesActorMessage::ApplyRemote(batch, rp) => {
                let res = self.handle_apply_remote(state, batch).await;
                let _ = rp.send(res);
            }
        }
        Ok(())
    }
}

impl QuotesActor {
    async fn handle_add(
        &self,
        state: &mut QuotesActorState,
        new_quote: NewQuote,
    ) -> Result<Quote, QuoteError> {
        let quote = match state.store.add(&new_quote.text, &new_quote.category).await {
            Ok(q) => q,
            Err(e) => {
                warn!(error = %e, "add rejected");
                state.presenter.notify(Notice::error(user_message(&e)));
                return Err(e);
            }
        };
        state.view.refresh_categories(&state.store);
        state.presenter.notify(Notice::info(ADD_SUCCESS));
        info!(text = %quote.text, category = %quote.category, "quote added");

        if let Some(upstream) = state.upstream.clone() {
            let posted = quote.clone();
            tokio::spawn(async move {
                if let Err(e) = upstream.post_quote(&posted).await {
                    warn!(error = %e, "posting quote to remote failed");
                }
            });
        }
        Ok(quote)
    }

    async fn handle_import(
        &self,
        state: &mut QuotesActorState,
        contents: &[u8],
    ) -> Result<ImportSummary, QuoteError> {
        let payload = match parse_import(contents) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "import rejected");
                state.presenter.notify(Notice::error(IMPORT_INVALID));
                return Err(e);
            }
        };
        let summary = match state.store.import_many(payload).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "import not saved");
                state.presenter.notify(Notice::error(IMPORT_NOT_SAVED));
                return Err(e);
            }
        };
        state.view.refresh_categories(&state.store);
        state.presenter.notify(Notice::info(IMPORT_SUCCESS));
        Ok(summary)
    }

    async fn handle_apply_remote(
        &self,
        state: &mut QuotesActorState,
        batch: Vec<Quote>,
    ) -> Result<MergeOutcome, QuoteError> {
        let merged = merge(state.store.quotes(), &batch);
        if merged.outcome.changed() {
            state.store.replace_all(merged.quotes).await?;
        }
        state.view.refresh_categories(&state.store);
        state
            .view
            .render_current(&state.store, &mut state.rng)
            .await?;
        debug!(
            added = merged.outcome.added,
            total = state.store.len(),
            "remote batch merged"
        );
        Ok(merged.outcome)
    }
}

fn user_message(err: &QuoteError) -> String {
    match err {
        QuoteError::Validation(msg) => msg.clone(),
        _ => "Saving the quote failed.".to_string(),
    }
}

/// Async spawn of the quotes actor and return a handle.
pub async fn spawn(args: QuotesActorArgs) -> Result<QuotesHandle, QuoteError> {
    let (actor, _jh) = Actor::spawn(None, QuotesActor, args)
        .await
        .map_err(|e| QuoteError::RactorError(format!("failed to spawn QuotesActor: {e}")))?;
    Ok(QuotesHandle { actor })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{LAST_VIEWED_QUOTE_KEY, MemoryKv, QUOTES_KEY};
    use crate::service::presenter::testing::RecordingPresenter;
    use crate::types::NoticeLevel;

    struct Harness {
        durable: Arc<MemoryKv>,
        session: Arc<MemoryKv>,
        presenter: Arc<RecordingPresenter>,
        handle: QuotesHandle,
    }

    async fn harness(quotes: &[Quote]) -> Harness {
        let durable = Arc::new(MemoryKv::new());
        durable
            .set(QUOTES_KEY, &serde_json::to_string(quotes).unwrap())
            .await
            .unwrap();
        let session = Arc::new(MemoryKv::new());
        let presenter = Arc::new(RecordingPresenter::default());
        let args = QuotesActorArgs::new(durable.clone(), session.clone(), presenter.clone())
            .with_rng(StdRng::seed_from_u64(42));
        let handle = spawn(args).await.unwrap();
        Harness {
            durable,
            session,
            presenter,
            handle,
        }
    }

    fn values(options: Vec<CategoryOption>) -> Vec<String> {
        options.into_iter().map(|o| o.value).collect()
    }

    #[tokio::test]
    async fn add_grows_store_and_category_index() {
        let h = harness(&[Quote::new("Stay hungry.", "Motivation")]).await;

        let added = h
            .handle
            .add(NewQuote {
                text: "Keep going.".into(),
                category: "Perseverance".into(),
            })
            .await
            .unwrap();

        let quotes = h.handle.list().await.unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes.last(), Some(&added));
        assert_eq!(
            values(h.handle.categories().await.unwrap()),
            vec!["all", "Motivation", "Perseverance"]
        );
        assert_eq!(h.presenter.notices().last(), Some(&Notice::info(ADD_SUCCESS)));
    }

    #[tokio::test]
    async fn add_with_blank_field_surfaces_validation_error() {
        let h = harness(&[Quote::new("Stay hungry.", "Motivation")]).await;

        let err = h
            .handle
            .add(NewQuote {
                text: "".into(),
                category: "x".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));
        assert_eq!(h.handle.list().await.unwrap().len(), 1);
        assert_eq!(
            h.presenter.notices().last().map(|n| n.level),
            Some(NoticeLevel::Error)
        );
    }

    #[tokio::test]
    async fn import_of_non_json_leaves_store_intact() {
        let h = harness(&[Quote::new("Stay hungry.", "Motivation")]).await;
        let before = h.durable.get(QUOTES_KEY).await.unwrap();

        let err = h.handle.import(b"not json".to_vec()).await.unwrap_err();
        assert!(matches!(err, QuoteError::Json(_)));
        assert_eq!(h.handle.list().await.unwrap().len(), 1);
        assert_eq!(h.durable.get(QUOTES_KEY).await.unwrap(), before);
        assert_eq!(
            h.presenter.notices().last(),
            Some(&Notice::error(IMPORT_INVALID))
        );

        // invalid UTF-8 is just another malformed file
        let err = h.handle.import(vec![b'[', 0xff, 0xfe, b']']).await.unwrap_err();
        assert!(matches!(err, QuoteError::Json(_)));
        assert_eq!(h.handle.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn export_then_import_doubles_every_record() {
        let original = vec![
            Quote::new("Stay hungry.", "Motivation"),
            Quote::new("Know thyself.", "Wisdom"),
        ];
        let h = harness(&original).await;

        let exported = h.handle.export().await.unwrap();
        let summary = h.handle.import(exported.into_bytes()).await.unwrap();
        assert_eq!(summary.imported, 2);

        let mut quotes = h.handle.list().await.unwrap();
        quotes.sort();
        let mut expected = [original.clone(), original].concat();
        expected.sort();
        assert_eq!(quotes, expected);
    }

    #[tokio::test]
    async fn filtered_render_only_returns_matching_category() {
        let h = harness(&[
            Quote::new("Stay hungry.", "Motivation"),
            Quote::new("Know thyself.", "Wisdom"),
            Quote::new("Begin.", "Motivation"),
        ])
        .await;

        let first = h
            .handle
            .set_filter(CategoryFilter::from("Motivation"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.category, "Motivation");
        for _ in 0..20 {
            let q = h.handle.render().await.unwrap().unwrap();
            assert_eq!(q.category, "Motivation");
        }
        let last: Quote = serde_json::from_str(
            &h.session.get(LAST_VIEWED_QUOTE_KEY).await.unwrap().unwrap(),
        )
        .unwrap();
        assert_eq!(last.category, "Motivation");
    }

    #[tokio::test]
    async fn apply_remote_merges_against_live_store_without_touching_local_quotes() {
        let h = harness(&[Quote::new("Stay hungry.", "Motivation")]).await;
        h.handle
            .add(NewQuote {
                text: "added mid-sync".into(),
                category: "Local".into(),
            })
            .await
            .unwrap();

        let outcome = h
            .handle
            .apply_remote(vec![
                Quote::new("added mid-sync", "Server"),
                Quote::new("fresh", "Server"),
            ])
            .await
            .unwrap();
        assert_eq!(outcome, MergeOutcome { added: 1 });

        let quotes = h.handle.list().await.unwrap();
        assert_eq!(
            quotes,
            vec![
                Quote::new("Stay hungry.", "Motivation"),
                Quote::new("added mid-sync", "Local"),
                Quote::new("fresh", "Server"),
            ]
        );
        let persisted: Vec<Quote> =
            serde_json::from_str(&h.durable.get(QUOTES_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(persisted, quotes);
    }
}
