use crate::wire::AaaaLayout;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Delegation-walk and upstream transport settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Name server every top-level resolution starts from (f.root-servers.net).
    #[serde(default = "default_root_server")]
    pub root_server: Ipv4Addr,

    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    /// Receive timeout for a single upstream round-trip.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Attempts per upstream round-trip; only timeouts are retried.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u8,

    /// Local source port for outbound queries. 0 lets the OS pick one per
    /// query; a fixed port serializes all outbound exchanges.
    #[serde(default)]
    pub outbound_port: u16,

    /// Name-server hops allowed in one resolution chain.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Nested sub-resolutions (name servers without glue) allowed.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub aaaa_layout: AaaaLayout,
}

impl ResolverConfig {
    pub fn root_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(self.root_server), self.upstream_port)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    pub fn with_root_server(mut self, root_server: Ipv4Addr) -> Self {
        self.root_server = root_server;
        self
    }

    pub fn with_limits(mut self, max_iterations: usize, max_depth: usize) -> Self {
        self.max_iterations = max_iterations;
        self.max_depth = max_depth;
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.query_timeout_ms = timeout_ms;
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_server: default_root_server(),
            upstream_port: default_upstream_port(),
            query_timeout_ms: default_query_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            outbound_port: 0,
            max_iterations: default_max_iterations(),
            max_depth: default_max_depth(),
            aaaa_layout: AaaaLayout::default(),
        }
    }
}

fn default_root_server() -> Ipv4Addr {
    Ipv4Addr::new(192, 5, 5, 241)
}

fn default_upstream_port() -> u16 {
    53
}

fn default_query_timeout_ms() -> u64 {
    3000
}

fn default_retry_attempts() -> u8 {
    2
}

fn default_max_iterations() -> usize {
    20
}

fn default_max_depth() -> usize {
    10
}
