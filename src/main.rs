//! DoH edge resolver entrypoint.
//!
//! Serves DNS-over-HTTPS on one HTTP listener, forwarding ordinary
//! names to an upstream DoH provider and answering ENS names from the
//! Ethereum blockchain.

use std::sync::Arc;

use axum::{routing::get, Router};
use log::info;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::{net::TcpListener, signal, task};

use doh_edge::{
    blocklist::BlockList,
    cache::{ContentHashCache, CACHE, CACHE_CLEANUP_INTERVAL},
    config::ServerConfig,
    ens::Ens,
    errors::DnsError,
    handlers::{handle_get, handle_post, AppState},
    resolver::Resolver,
    upstream::Upstream,
};

#[tokio::main]
async fn main() -> Result<(), DnsError> {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    // Load configuration from environment variables
    let config = ServerConfig::from_env()?;

    // Expose Prometheus metrics when an exporter address is configured
    if let Some(addr) = config.metrics_addr {
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .map_err(|e| DnsError::Config(format!("Failed to install metrics exporter: {e}")))?;
        info!("Metrics exporter listening on {}", addr);
    }

    // Load the blocklist, if any
    let blocklist = match &config.blocklist_path {
        Some(path) => BlockList::from_file(path)?,
        None => BlockList::empty(),
    };

    // Initialize the contenthash cache
    let cache = CACHE.get_or_init(|| ContentHashCache::new(config.cache_ttl));

    // Set up cache cleanup task
    let cache_cleanup = task::spawn({
        let cache = cache.clone();
        async move {
            let mut interval = tokio::time::interval(CACHE_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                cache.cleanup();
            }
        }
    });

    // Wire the collaborators together
    let http = reqwest::Client::new();
    let upstream = Upstream::new(http.clone(), config.upstream_url.clone());
    let ens = Ens::new(
        http,
        config.eth_provider.clone(),
        config.ipfs_gateway.clone(),
        cache.clone(),
    );
    let resolver = Resolver::new(upstream.clone(), ens, config.default_ttl);
    let state = Arc::new(AppState {
        resolver,
        upstream,
        blocklist,
    });

    let app = Router::new()
        .route("/dns-query", get(handle_get).post(handle_post))
        .with_state(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("DoH server listening on {}", config.bind_addr);

    // Serve until a shutdown signal arrives
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c()
                .await
                .expect("Failed to listen for shutdown signal");
            info!("Shutdown signal received, initiating graceful shutdown...");
        })
        .await?;

    cache_cleanup.abort();
    Ok(())
}
