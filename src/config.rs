//! Configuration for the DoH resolver.
//!
//! This module defines the configuration structure and methods to load
//! configuration from environment variables.

use std::{env, net::SocketAddr};

use crate::errors::DnsError;

/// Default TTL in seconds for records the upstream does not specify.
pub const DEFAULT_TTL: u32 = 3600;

/// How long resolved contenthashes stay cached, in seconds.
pub const DEFAULT_CACHE_TTL: u64 = 300;

/// DoH provider queries are forwarded to when this resolver cannot
/// answer them itself.
pub const DEFAULT_UPSTREAM: &str = "https://cloudflare-dns.com/dns-query";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,

    /// Upstream DoH provider URL.
    pub upstream_url: String,

    /// HTTP URL of the Ethereum JSON-RPC provider.
    pub eth_provider: String,

    /// Hostname of the IPFS gateway ENS names are proxied to.
    pub ipfs_gateway: String,

    /// TTL for synthesized records.
    pub default_ttl: u32,

    /// TTL for cached contenthash lookups.
    pub cache_ttl: u64,

    /// Optional path to a newline-separated blocklist file.
    pub blocklist_path: Option<String>,

    /// Optional address for the Prometheus metrics exporter.
    pub metrics_addr: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load server configuration from environment variables.
    ///
    /// # Returns
    /// A `Result` containing either the loaded `ServerConfig` or a `DnsError`.
    pub fn from_env() -> Result<Self, DnsError> {
        let bind_addr = env::var("DOH_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse()
            .map_err(|_| DnsError::Config("Invalid DOH_BIND address".into()))?;

        let metrics_addr = match env::var("DOH_METRICS_BIND") {
            Ok(value) => Some(
                value
                    .parse()
                    .map_err(|_| DnsError::Config("Invalid DOH_METRICS_BIND address".into()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            bind_addr,
            upstream_url: env::var("DOH_UPSTREAM").unwrap_or_else(|_| DEFAULT_UPSTREAM.into()),
            eth_provider: env::var("ETH_PROVIDER")
                .unwrap_or_else(|_| "https://cloudflare-eth.com".into()),
            ipfs_gateway: env::var("IPFS_GATEWAY")
                .unwrap_or_else(|_| "cloudflare-ipfs.com".into()),
            default_ttl: env::var("DOH_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL),
            cache_ttl: env::var("DOH_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CACHE_TTL),
            blocklist_path: env::var("DOH_BLOCKLIST").ok(),
            metrics_addr,
        })
    }
}
