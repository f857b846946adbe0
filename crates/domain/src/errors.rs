use std::net::IpAddr;
use thiserror::Error;

/// Failures raised while encoding or decoding a single DNS message.
///
/// Every variant is fatal for the message being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Buffer access out of bounds at offset {offset}")]
    BufferBounds { offset: usize },

    #[error("Limit of {limit} compression jumps exceeded")]
    CompressionLoopExceeded { limit: usize },

    #[error("Single label exceeds 63 characters of length: {label}")]
    LabelTooLong { label: String },

    #[error("Unsupported record type {qtype} cannot be serialized")]
    UnsupportedRecordWrite { qtype: u16 },

    #[error("Address {addr} cannot be encoded as IPv4")]
    InvalidAddress { addr: IpAddr },
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Wire format error: {0}")]
    Wire(#[from] WireError),

    #[error("Network I/O error: {0}")]
    NetworkIo(String),

    #[error("Transport timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Failed to resolve {domain}: {reason}")]
    NameResolutionFailure { domain: String, reason: String },

    #[error("Delegation limit of {limit} exceeded while resolving {domain}")]
    DelegationLimitExceeded { domain: String, limit: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
