//! Error types for the DoH resolver.
//!
//! This module defines the error types used throughout the resolver,
//! covering both wire-format codec failures and the surrounding HTTP
//! and blockchain collaborators.

use thiserror::Error;

use crate::types::RecordType;

/// Represents errors that can occur in the DoH resolver.
#[derive(Error, Debug)]
pub enum DnsError {
    /// Fewer than 12 bytes were supplied to the header decoder.
    #[error("truncated header: got {0} bytes, need 12")]
    TruncatedHeader(usize),

    /// A domain-name label claimed more bytes than remain in the buffer.
    #[error("truncated domain name")]
    TruncatedName,

    /// A name length byte had its two high bits set (compression pointer).
    #[error("compressed domain names are not supported")]
    UnsupportedNameCompression,

    /// A domain-name label exceeds the 63-byte wire limit.
    #[error("label of {0} bytes exceeds the 63 byte limit")]
    LabelTooLong(usize),

    /// A domain name exceeds the 255-byte wire limit.
    #[error("name of {0} bytes exceeds the 255 byte limit")]
    NameTooLong(usize),

    /// A domain name contains an empty label or bytes that are not UTF-8.
    #[error("invalid domain name: {0}")]
    InvalidName(String),

    /// A message section claims more records than the buffer holds.
    #[error("truncated message")]
    TruncatedMessage,

    /// A resource record is malformed or runs past the buffer end.
    #[error("invalid resource record: {0}")]
    InvalidRecord(String),

    /// RDATA encode or decode was requested for a type with no codec.
    #[error("no RDATA codec for record type {0}")]
    UnimplementedType(RecordType),

    /// A fixed-width read would run past the buffer end.
    #[error("read of {width} bytes at offset {offset} exceeds buffer length {len}")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    /// I/O errors from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Base64 decoding errors.
    #[error("base64 error: {0}")]
    Base64(String),

    /// Errors talking to the upstream DoH provider or Ethereum RPC.
    #[error("upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// JSON serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ENS resolution errors (registry, resolver or contenthash).
    #[error("ENS error: {0}")]
    Ens(String),
}
