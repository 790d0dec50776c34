use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use etec_api::common::constants;
use etec_api::metrics::{init_metrics, ApiMetrics};
use etec_api::{loader, logging, server, Catalog, Config, SearchCriteria};

#[derive(Parser)]
#[command(name = "etec_api")]
#[command(about = "HTTP API for scraped ETEC institution and course data")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to the scraped JSON data (overrides config and environment)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the catalog over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Prometheus exporter address, e.g. 127.0.0.1:9464
        #[arg(long)]
        metrics_addr: Option<String>,
    },
    /// Print catalog statistics as JSON
    Stats,
    /// Run a search and print the matching records as JSON
    Search {
        #[arg(long)]
        cidade: Option<String>,
        #[arg(long)]
        curso: Option<String>,
        #[arg(long)]
        modalidade: Option<String>,
        #[arg(long)]
        nome: Option<String>,
    },
}

fn build_catalog(config: &Config) -> Result<Catalog> {
    let raw = loader::load_institutions(&config.data.path)
        .with_context(|| format!("loading {}", config.data.path.display()))?;
    Ok(Catalog::build(&raw, &config.formatter(), config.query_filter()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?.with_env_overrides()?;
    if let Some(data) = cli.data {
        config.data.path = data;
    }

    match cli.command {
        Commands::Serve {
            port,
            host,
            metrics_addr,
        } => {
            let _guard = logging::init_logging(&config.data.log_dir);

            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(addr) = metrics_addr {
                config.server.metrics_addr = Some(addr);
            }

            if let Some(addr) = config.server.metrics_addr.as_deref() {
                if let Err(e) = init_metrics(addr) {
                    error!("Metrics disabled: {}", e);
                }
            }

            let catalog = build_catalog(&config)?;
            ApiMetrics::record_catalog(&catalog.stats());

            let addr: SocketAddr = config
                .bind_addr()
                .parse()
                .with_context(|| format!("invalid bind address {}", config.bind_addr()))?;
            info!(%addr, etecs = catalog.len(), "Starting ETEC API");

            if let Err(e) = server::start_server(catalog, addr).await {
                error!("Server failed: {}", e);
                anyhow::bail!("server failed: {e}");
            }
        }
        Commands::Stats => {
            logging::init_console_logging();
            let catalog = build_catalog(&config)?;
            println!("{}", serde_json::to_string_pretty(&catalog.stats())?);
        }
        Commands::Search {
            cidade,
            curso,
            modalidade,
            nome,
        } => {
            logging::init_console_logging();
            let catalog = build_catalog(&config)?;
            let criteria = SearchCriteria {
                cidade,
                curso,
                modalidade,
                nome,
            };
            let results = catalog.search(&criteria);
            if results.is_empty() {
                eprintln!("{}", constants::MSG_NO_SEARCH_MATCH);
                std::process::exit(1);
            }
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
