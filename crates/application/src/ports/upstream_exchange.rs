use async_trait::async_trait;
use iterdns_domain::{DomainError, Message};
use std::net::SocketAddr;

/// One request/reply round-trip with a single name server.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    /// Sends `request` to `server` and returns the parsed reply.
    ///
    /// Implementations must only return a reply whose ID matches the request.
    async fn query(&self, server: SocketAddr, request: Message) -> Result<Message, DomainError>;
}
