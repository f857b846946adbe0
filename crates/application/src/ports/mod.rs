mod resolver;
mod upstream_exchange;

pub use resolver::Resolver;
pub use upstream_exchange::UpstreamExchange;
