//! iterdns domain layer: wire codec, errors and configuration model.
pub mod config;
pub mod errors;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig, ServerConfig};
pub use errors::{DomainError, WireError};
pub use wire::{
    AaaaLayout, Header, Message, QueryType, Question, Record, ResultCode, WireBuffer,
    MAX_MESSAGE_SIZE,
};
