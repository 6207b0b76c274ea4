//! Portico server.
//!
//! Compiles a REST API description into tools and serves them to
//! tool-calling clients over JSON-RPC at `POST /mcp`.

use clap::Parser;
use eyre::OptionExt;
use mockable::DefaultClock;
use portico::description::{
    adapters::{HttpDescriptionLoader, LocationDescriptionLoader},
    domain::{DescriptionLocation, declared_base_url},
    ports::DescriptionLoader,
};
use portico::invocation::{
    adapters::ReqwestTransport,
    domain::{InvokerConfig, parse_header_spec},
    services::ToolInvoker,
};
use portico::protocol::{adapters::memory::InMemorySessionStore, services::ProtocolRouter};
use portico::server::{DEFAULT_BIND, McpHost, ServerConfig, ToolCatalog, app, serve};
use portico::tool::{domain::ToolRegistry, services::compile_description};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log filter applied when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "portico=info,tower_http=info";

#[derive(Parser)]
#[command(name = "portico")]
#[command(about = "Expose a REST API description as callable tools", long_about = None)]
struct Args {
    /// Path or http(s) URL of the OpenAPI JSON document
    #[arg(short, long, env = "PORTICO_DESCRIPTION")]
    description: String,

    /// Base URL of the target API; defaults to the first absolute servers entry
    #[arg(long, env = "PORTICO_BASE_URL")]
    base_url: Option<String>,

    /// Static header sent with every call, as `Name: value`
    #[arg(long = "header", env = "PORTICO_HEADERS", value_delimiter = '\n')]
    headers: Vec<String>,

    /// Bearer credential sent with every call
    #[arg(long, env = "PORTICO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Listening address
    #[arg(short, long, env = "PORTICO_BIND", default_value = DEFAULT_BIND)]
    bind: String,

    /// Timeout in seconds for upstream calls and description fetches
    #[arg(long, env = "PORTICO_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Recompile the description after this many seconds
    #[arg(long, env = "PORTICO_REFRESH_SECS")]
    refresh_secs: Option<u64>,

    /// Maximum number of retained sessions
    #[arg(long, env = "PORTICO_MAX_SESSIONS", default_value_t = 1024)]
    max_sessions: usize,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let server_config = ServerConfig::parse(&args.bind)?
        .with_refresh_interval(args.refresh_secs.map(Duration::from_secs))
        .with_max_sessions(args.max_sessions);
    let timeout = Duration::from_secs(args.timeout_secs);

    let loader = Arc::new(LocationDescriptionLoader::new(HttpDescriptionLoader::new(
        timeout,
    )?));
    let catalog = ToolCatalog::new(
        Arc::clone(&loader),
        DescriptionLocation::parse(&args.description),
        server_config.refresh_interval(),
    );

    let (base_url, registry) = match args.base_url {
        Some(configured) => (configured, ToolRegistry::new()),
        None => {
            let document = loader.load(catalog.location()).await?;
            let declared = declared_base_url(&document)
                .ok_or_eyre("no --base-url given and the description declares no absolute server")?;
            catalog.mark_loaded().await;
            (declared, compile_description(&document).registry)
        }
    };

    let with_headers = args
        .headers
        .iter()
        .filter(|spec| !spec.trim().is_empty())
        .try_fold(InvokerConfig::new(&base_url)?, |pending, spec| {
            let (name, value) = parse_header_spec(spec)?;
            pending.with_header(name, value)
        })?;
    let invoker_config = args
        .api_key
        .map(SecretString::from)
        .into_iter()
        .fold(with_headers, InvokerConfig::with_api_key);
    info!(base_url = invoker_config.base_url(), "target API configured");

    let invoker = ToolInvoker::new(
        Arc::new(invoker_config),
        Arc::new(ReqwestTransport::new(timeout)?),
    );
    let router = ProtocolRouter::new(
        Arc::new(InMemorySessionStore::with_capacity(
            server_config.max_sessions(),
        )),
        Arc::new(invoker),
        Arc::new(DefaultClock),
        registry,
    );

    let listener = TcpListener::bind(server_config.bind()).await?;
    serve(listener, app(Arc::new(McpHost::new(router, catalog)))).await?;
    Ok(())
}
