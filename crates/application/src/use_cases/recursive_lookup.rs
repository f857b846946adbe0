use crate::ports::{Resolver, UpstreamExchange};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use iterdns_domain::{DomainError, Message, QueryType, ResolverConfig, ResultCode};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Iterative resolver that walks the delegation tree from a root server.
///
/// Each hop queries the current name server and then either stops (answer,
/// NXDOMAIN, dead end) or moves to the next server, taken from glue records
/// or from a nested resolution of the delegated name server's hostname.
pub struct RecursiveResolver {
    upstream: Arc<dyn UpstreamExchange>,
    root: SocketAddr,
    upstream_port: u16,
    max_iterations: usize,
    max_depth: usize,
}

impl RecursiveResolver {
    pub fn new(upstream: Arc<dyn UpstreamExchange>, config: &ResolverConfig) -> Self {
        Self {
            upstream,
            root: config.root_addr(),
            upstream_port: config.upstream_port,
            max_iterations: config.max_iterations,
            max_depth: config.max_depth,
        }
    }

    /// Sends a single query to `server` with a fresh random ID.
    pub async fn lookup(
        &self,
        qname: &str,
        qtype: QueryType,
        server: SocketAddr,
    ) -> Result<Message, DomainError> {
        let request = Message::query(fastrand::u16(..), qname, qtype);
        self.upstream.query(server, request).await
    }

    fn resolve_at_depth<'a>(
        &'a self,
        qname: &'a str,
        qtype: QueryType,
        depth: usize,
    ) -> BoxFuture<'a, Result<Message, DomainError>> {
        async move {
            let mut server = self.root;

            for iteration in 0..self.max_iterations {
                info!(
                    domain = %qname,
                    record_type = %qtype,
                    server = %server,
                    iteration,
                    depth,
                    "Querying name server"
                );

                let response = self.lookup(qname, qtype, server).await?;

                if !response.answers.is_empty() && response.header.rescode == ResultCode::NOERROR {
                    return Ok(response);
                }

                if response.header.rescode == ResultCode::NXDOMAIN {
                    debug!(domain = %qname, server = %server, "Name does not exist");
                    return Ok(response);
                }

                if let Some(glue) = response.resolved_ns(qname).next() {
                    server = self.name_server_addr(glue);
                    continue;
                }

                let Some(ns_host) = response.unresolved_ns(qname).next().map(str::to_string)
                else {
                    debug!(
                        domain = %qname,
                        server = %server,
                        rescode = %response.header.rescode,
                        "No further delegation, returning last reply"
                    );
                    return Ok(response);
                };

                if depth >= self.max_depth {
                    warn!(domain = %qname, ns = %ns_host, depth, "Name server resolution too deep");
                    return Err(DomainError::DelegationLimitExceeded {
                        domain: qname.to_string(),
                        limit: self.max_depth,
                    });
                }

                let ns_response = self
                    .resolve_at_depth(&ns_host, QueryType::A, depth + 1)
                    .await?;

                match ns_response.first_a() {
                    Some(addr) => server = self.name_server_addr(addr),
                    None => {
                        debug!(domain = %qname, ns = %ns_host, "Name server has no address");
                        return Ok(response);
                    }
                }
            }

            warn!(domain = %qname, limit = self.max_iterations, "Delegation chain too long");
            Err(DomainError::DelegationLimitExceeded {
                domain: qname.to_string(),
                limit: self.max_iterations,
            })
        }
        .boxed()
    }

    fn name_server_addr(&self, addr: IpAddr) -> SocketAddr {
        SocketAddr::new(addr, self.upstream_port)
    }
}

#[async_trait]
impl Resolver for RecursiveResolver {
    async fn resolve(&self, qname: &str, qtype: QueryType) -> Result<Message, DomainError> {
        self.resolve_at_depth(qname, qtype, 0)
            .await
            .map_err(|e| match e {
                DomainError::DelegationLimitExceeded { .. } => e,
                other => DomainError::NameResolutionFailure {
                    domain: qname.to_string(),
                    reason: other.to_string(),
                },
            })
    }
}
