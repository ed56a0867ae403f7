//! OA discovery HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use oa_discovery::analysis::ArticleAnalyzer;
use oa_discovery::cache::CacheStore;
use oa_discovery::cluster::ClusterEngine;
use oa_discovery::config::Config;
use oa_discovery::embedding::{CachedEmbedder, OpenAiEmbedder};
use oa_discovery::gateway::{AppState, create_router_with_state};
use oa_discovery::oa::{OaVerifier, UnpaywallClient};
use oa_discovery::pdf::PdfStore;
use oa_discovery::pool::CandidatePool;
use oa_discovery::scoring::RelatedRanker;
use oa_discovery::search::{DoajAdapter, OpenAlexAdapter, SearchAdapter};
use oa_discovery::service::DiscoveryService;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "OA discovery starting"
    );

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let cache = Arc::new(CacheStore::new(config.cache_dir.clone()));
    cache.ensure_dir()?;

    let pdf_store = Arc::new(PdfStore::new(config.pdf_dir.clone(), http_client.clone()));
    pdf_store.ensure_dir()?;

    let unpaywall = UnpaywallClient::new(http_client.clone(), config.unpaywall_email.clone());
    let verifier = Arc::new(OaVerifier::new(Arc::new(unpaywall), cache.clone()));

    let mut openai = OpenAiEmbedder::new(http_client.clone(), config.openai_api_key.clone());
    if let Some(base) = &config.openai_api_base {
        openai = openai.with_api_base(base.clone());
    }
    if !openai.has_api_key() {
        tracing::warn!("No OPENAI_API_KEY configured, embeddings disabled");
    }
    let embedder = Arc::new(CachedEmbedder::new(Arc::new(openai), cache));

    let pool = Arc::new(CandidatePool::new());
    let clusters = Arc::new(ClusterEngine::new(pool.clone(), embedder.clone()));
    let ranker = Arc::new(RelatedRanker::new(
        pool.clone(),
        clusters.clone(),
        embedder,
        verifier.clone(),
    ));
    let analyzer = ArticleAnalyzer::new(pdf_store.clone(), verifier.clone(), ranker);

    let adapters: Vec<Arc<dyn SearchAdapter>> = vec![
        Arc::new(OpenAlexAdapter::new(
            http_client.clone(),
            verifier.clone(),
            pdf_store.clone(),
        )),
        Arc::new(DoajAdapter::new(http_client, verifier, pdf_store.clone())),
    ];

    let service = Arc::new(DiscoveryService::new(adapters, pool, clusters, analyzer));
    let refresh_handle =
        service.spawn_cluster_refresh(Duration::from_secs(config.cluster_refresh_secs));

    let app = create_router_with_state(AppState::new(service, pdf_store));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresh_handle.abort();
    tracing::info!("OA discovery shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("OA_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
