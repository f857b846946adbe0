use clap::{Parser, Subcommand};
use iterdns_domain::{CliOverrides, QueryType};
use std::net::{Ipv4Addr, SocketAddr};
use tracing::{error, info};

mod bootstrap;
mod commands;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "iterdns")]
#[command(version)]
#[command(about = "Iterative DNS resolver walking the delegation tree from the root")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long, global = true)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Root name server every resolution starts from
    #[arg(long, value_name = "IPV4", global = true)]
    root_server: Option<Ipv4Addr>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer DNS queries over UDP (default)
    Serve,

    /// Resolve one name and print the reply
    Lookup {
        name: String,

        /// Record type (A, NS, CNAME, MX, AAAA or a number)
        #[arg(short = 't', long, default_value = "A")]
        qtype: QueryType,

        /// Query this server directly instead of walking from the root
        #[arg(short = 's', long, value_name = "ADDR")]
        server: Option<SocketAddr>,
    },

    /// Parse a raw DNS message from a file and print it
    Decode { file: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        root_server: cli.root_server,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting iterdns v{}", env!("CARGO_PKG_VERSION"));

            let services = di::DnsServices::new(&config);
            let dns_addr = config.server.listen_addr();

            tokio::select! {
                result = server::start_dns_server(dns_addr, services.handler) => {
                    if let Err(e) = result {
                        error!(error = %e, "DNS server error");
                        return Err(e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
            }

            info!("Server shutdown complete");
        }
        Command::Lookup {
            name,
            qtype,
            server,
        } => {
            let services = di::DnsServices::new(&config);
            commands::run_lookup(&services.resolver, &name, qtype, server).await?;
        }
        Command::Decode { file } => commands::run_decode(&file)?,
    }

    Ok(())
}
