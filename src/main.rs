use mimalloc::MiMalloc;
use quotekeeper::api::HttpRemote;
use quotekeeper::config::Config;
use quotekeeper::db::{MemoryKv, SqliteKv};
use quotekeeper::router::{AppState, quotes_router};
use quotekeeper::service::presenter::PageState;
use quotekeeper::service::quotes_actor::{self, QuotesActorArgs, QuotesHandle};
use quotekeeper::service::sync_agent::SyncAgent;
use quotekeeper::service::transfer::read_import_file;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        remote_url = %cfg.remote_url,
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        sync_interval_secs = cfg.sync_interval_secs,
        loglevel = %cfg.loglevel
    );

    let pool = quotekeeper::db::connect(&cfg.database_url).await?;
    let durable = SqliteKv::new(pool);
    durable.init_schema().await?;

    let page = PageState::new();
    let remote = Arc::new(HttpRemote::from_config(&cfg)?);

    let mut args = QuotesActorArgs::new(
        Arc::new(durable),
        Arc::new(MemoryKv::new()),
        Arc::new(page.clone()),
    );
    if cfg.post_new_quotes {
        args = args.with_upstream(remote.clone());
    }
    let handle = quotes_actor::spawn(args).await?;

    if let Some(path) = cfg.import_path.as_ref() {
        import_on_start(&handle, path).await;
    }

    let sync = Arc::new(SyncAgent::new(
        handle.clone(),
        remote,
        Arc::new(page.clone()),
        cfg.sync_batch_size,
    ));
    let _sync_task = sync.clone().spawn_periodic(cfg.sync_interval());

    let state = AppState::new(handle, sync, page);
    let app = quotes_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn import_on_start(handle: &QuotesHandle, path: &Path) {
    let contents = match read_import_file(path).await {
        Ok(contents) => contents,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read import file");
            return;
        }
    };
    match handle.import(contents).await {
        Ok(summary) => info!(
            path = %path.display(),
            imported = summary.imported,
            skipped = summary.skipped,
            "startup import finished"
        ),
        Err(e) => warn!(path = %path.display(), error = %e, "startup import rejected"),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
