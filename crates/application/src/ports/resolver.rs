use async_trait::async_trait;
use iterdns_domain::{DomainError, Message, QueryType};

#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolves `qname` and returns the terminal reply of the resolution.
    ///
    /// NXDOMAIN and best-effort referrals are returned as `Ok`; only transport,
    /// codec and delegation-limit failures surface as errors.
    async fn resolve(&self, qname: &str, qtype: QueryType) -> Result<Message, DomainError>;
}
