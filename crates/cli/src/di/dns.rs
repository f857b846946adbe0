use iterdns_application::use_cases::{HandleQueryUseCase, RecursiveResolver};
use iterdns_domain::Config;
use iterdns_infrastructure::dns::{DnsServerHandler, UdpTransport};
use std::sync::Arc;
use tracing::info;

pub struct DnsServices {
    pub resolver: Arc<RecursiveResolver>,
    pub handler: DnsServerHandler,
}

impl DnsServices {
    pub fn new(config: &Config) -> Self {
        let resolver_config = &config.resolver;

        info!(
            root = %resolver_config.root_addr(),
            timeout_ms = resolver_config.query_timeout_ms,
            attempts = resolver_config.retry_attempts,
            outbound_port = resolver_config.outbound_port,
            max_iterations = resolver_config.max_iterations,
            max_depth = resolver_config.max_depth,
            "Initializing resolver"
        );

        let transport = Arc::new(UdpTransport::from_config(resolver_config));
        let resolver = Arc::new(RecursiveResolver::new(transport, resolver_config));
        let use_case = Arc::new(HandleQueryUseCase::new(resolver.clone()));
        let handler =
            DnsServerHandler::new(use_case).with_aaaa_layout(resolver_config.aaaa_layout);

        Self { resolver, handler }
    }
}
