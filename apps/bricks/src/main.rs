use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bricks::components::ModuleCatalog;
use bricks::config::{Config, ContentSource};
use bricks::fetch::{DirectoryFetcher, HttpFetcher, ResourceFetcher};
use bricks::routes::build_router;
use bricks::state::AppState;
use bricks::{AppContext, Hydrator};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing content source)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bricks v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the content fetcher
    let fetcher: Arc<dyn ResourceFetcher> = match &config.content {
        ContentSource::Directory(dir) => {
            info!("Serving content from {}", dir.display());
            Arc::new(DirectoryFetcher::new(dir.clone()))
        }
        ContentSource::Origin(url) => {
            info!("Serving content from {url}");
            Arc::new(HttpFetcher::new(url.clone())?)
        }
    };

    // Initialize component modules and the page pipeline
    let modules = ModuleCatalog::with_builtin();
    info!("Component catalog: {} modules", modules.len());
    let ctx = Arc::new(AppContext::new(
        config.code_base_path.clone(),
        fetcher,
        Arc::new(modules),
    ));
    info!("Priority blocks: {:?}", config.lcp_blocks);
    let state = AppState::new(Hydrator::new(ctx, config.lcp_blocks.clone()));

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
