//! Research Agent server entry point

use anyhow::{Context, Result};
use research_agent::{
    config,
    content::ContentFetcher,
    engines::EngineLoader,
    history::{HistoryStore, SqliteHistoryStore},
    network::HttpClient,
    research::{ResearchOptions, Researcher},
    search::EngineSearchClient,
    summarize::GeminiSummarizer,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration before logging so `debug` can pick the level
    let settings = config::load()?;

    let default_level = if settings.server.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Research Agent v{}", research_agent::VERSION);
    settings.validate()?;

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;

    // Search
    let engine = EngineLoader::load(&settings.search)?;
    info!("Using search engine: {}", engine.name());
    let search = EngineSearchClient::new(client.clone(), engine)
        .with_timeout(Duration::from_secs_f64(settings.search.timeout_secs));

    // Extraction and summarization
    let extractor = ContentFetcher::new(client.clone(), &settings.extractor);
    let summarizer = GeminiSummarizer::new(client, &settings.summarizer)
        .context("Failed to initialize summarizer")?;
    info!("Summarizing with model: {}", settings.summarizer.model);

    // History
    let store: Arc<dyn HistoryStore> = Arc::new(
        SqliteHistoryStore::connect(&settings.database)
            .await
            .context("Failed to open history database")?,
    );

    let researcher = Researcher::new(
        Arc::new(search),
        Arc::new(extractor),
        Arc::new(summarizer),
        store.clone(),
        ResearchOptions::from_settings(&settings),
    );

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    // Create router
    let app = create_router(AppState::new(settings, researcher, store));

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
