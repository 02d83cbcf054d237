//! DoH edge resolver.
//!
//! This library implements a DNS-over-HTTPS resolver that additionally
//! resolves ENS-registered names by translating them into synthetic DNS
//! answers. The heart of it is an RFC1035 wire-format codec; around it
//! sit the HTTP endpoint, the upstream DoH passthrough and the ENS
//! translation layer.

// Wire-format codec, leaf first.
pub mod bytes;
pub mod errors;
pub mod header;
pub mod message;
pub mod name;
pub mod rdata;
pub mod record;
pub mod types;

// Resolver glue.
pub mod blocklist;
pub mod cache;
pub mod config;
pub mod ens;
pub mod handlers;
pub mod resolver;
pub mod upstream;

// Re-export commonly used items.
pub use config::ServerConfig;
pub use errors::DnsError;
pub use header::Header;
pub use message::Message;
pub use rdata::RData;
pub use record::{Question, ResourceRecord};
pub use types::RecordType;
