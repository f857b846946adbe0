use iterdns_application::ports::Resolver;
use iterdns_application::use_cases::RecursiveResolver;
use iterdns_domain::QueryType;
use std::net::SocketAddr;

/// Resolves `name` and prints the terminal reply. With `server` set, sends a
/// single query there instead of walking from the root.
pub async fn run_lookup(
    resolver: &RecursiveResolver,
    name: &str,
    qtype: QueryType,
    server: Option<SocketAddr>,
) -> anyhow::Result<()> {
    let reply = match server {
        Some(server) => resolver.lookup(name, qtype, server).await?,
        None => resolver.resolve(name, qtype).await?,
    };

    print!("{}", reply);
    Ok(())
}
