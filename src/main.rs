//! Flower gateway entry point.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use flower_gateway::api::{cors_layer, create_router, AppState};
use flower_gateway::config::Config;
use flower_gateway::flowers::{lookup_flower, FlowerStore, InMemoryFlowerStore, MongoFlowerStore};
use flower_gateway::metrics;
use flower_gateway::GatewayError;
use flower_gateway::shopping::{collect_all, NaverShoppingClient, ShoppingResponse};
use flower_gateway::utils::shutdown_signal;

/// Flower lookup and Naver Shopping search gateway.
#[derive(Parser, Debug)]
#[command(name = "flower-gateway")]
#[command(about = "HTTP gateway for flower records and Naver Shopping search")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve flowers from a JSON seed file instead of DB_URI.
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Serve flowers from a JSON seed file instead of DB_URI.
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Look up one flower by English or Korean name.
    Lookup {
        /// Flower name.
        name: String,

        /// Read flowers from a JSON seed file instead of DB_URI.
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Collect all Naver Shopping results for a query.
    Search {
        /// Search terms.
        query: String,
    },
}

/// Store selected at startup; the Mongo variant needs an explicit shutdown.
enum StoreHandle {
    Mongo(MongoFlowerStore),
    Memory(InMemoryFlowerStore),
}

impl StoreHandle {
    fn shared(&self) -> Arc<dyn FlowerStore> {
        match self {
            StoreHandle::Mongo(store) => Arc::new(store.clone()),
            StoreHandle::Memory(store) => Arc::new(store.clone()),
        }
    }

    async fn shutdown(self) {
        if let StoreHandle::Mongo(store) = self {
            store.shutdown().await;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Pick up RUST_LOG from .env before the filter is built
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("flower_gateway=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle subcommands
    match args.command {
        Some(Command::Serve { port, seed }) => cmd_serve(port.or(args.port), seed.or(args.seed)).await,
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Lookup { name, seed }) => cmd_lookup(&name, seed.or(args.seed)).await,
        Some(Command::Search { query }) => cmd_search(&query).await,
        None => cmd_serve(args.port, args.seed).await,
    }
}

/// Open the flower store: a seed file wins over DB_URI.
async fn open_store(config: &Config, seed: Option<&Path>) -> flower_gateway::Result<StoreHandle> {
    if let Some(path) = seed {
        let store = InMemoryFlowerStore::from_json_file(path)?;
        return Ok(StoreHandle::Memory(store));
    }

    let uri = match config.db_uri.as_deref() {
        Some(uri) if config.has_db() => uri,
        _ => {
            return Err(GatewayError::InvalidConfig(
                "DB_URI is not set and no --seed file was given".to_string(),
            ));
        }
    };

    let store = MongoFlowerStore::connect(uri).await?;

    // Report reachability in the background; lookups report 500 until the server is back
    let probe = store.clone();
    tokio::spawn(async move {
        match probe.ping().await {
            Ok(()) => info!(database = %probe.database_name(), "MongoDB connected"),
            Err(e) => error!("MongoDB connection error: {}", e),
        }
    });

    Ok(StoreHandle::Mongo(store))
}

/// Load and validate configuration.
fn load_config() -> anyhow::Result<Config> {
    Config::load_validated().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e.into()
    })
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(port_override: Option<u16>, seed: Option<PathBuf>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = load_config()?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    let store = open_store(&config, seed.as_deref()).await?;
    let shopping = NaverShoppingClient::new(&config)?;

    let mut app_state = AppState::new(store.shared(), Arc::new(shopping));
    if config.metrics_enabled {
        match metrics::init_metrics() {
            Ok(handle) => app_state = app_state.with_metrics(handle),
            Err(e) => warn!("Metrics disabled, recorder install failed: {}", e),
        }
    }

    let router = create_router(app_state, cors_layer(&config.cors_origin)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server is running on http://localhost:{}", config.port);
    info!("CORS origin: {}", config.cors_origin);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.shutdown().await;
    info!("Server stopped");

    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("FLOWER GATEWAY - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Checking document store... ");
    match config.db_uri.as_deref() {
        Some(uri) if config.has_db() => match MongoFlowerStore::connect(uri).await {
            Ok(store) => match store.ping().await {
                Ok(()) => {
                    println!("OK");
                    println!("  Database: {}", store.database_name());
                    store.shutdown().await;
                }
                Err(e) => {
                    println!("UNREACHABLE");
                    println!("  Error: {}", e);
                }
            },
            Err(e) => {
                println!("FAILED");
                println!("  Error: {}", e);
                return Err(anyhow::anyhow!("DB_URI is invalid"));
            }
        },
        _ => println!("NOT SET (use --seed to serve from a file)"),
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Port: {}", config.port);
    println!("  CORS Origin: {}", config.cors_origin);
    println!("  Search URL: {}", config.naver_shop_url);
    println!("  Client ID: {}", config.client_id);
    println!("  Client Secret: present");
    println!("  Metrics: {}", if config.metrics_enabled { "Enabled" } else { "Disabled" });
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Look up one flower and print it as JSON.
async fn cmd_lookup(name: &str, seed: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load()?;

    let store = open_store(&config, seed.as_deref()).await?;
    let result = lookup_flower(store.shared().as_ref(), name).await;
    store.shutdown().await;

    let flower = result?;
    println!("{}", serde_json::to_string_pretty(&flower)?);
    Ok(())
}

/// Collect all search results and print them as JSON.
async fn cmd_search(query: &str) -> anyhow::Result<()> {
    let config = load_config()?;
    let client = NaverShoppingClient::new(&config)?;

    let items = collect_all(&client, query).await?;
    info!("Collected {} items for {:?}", items.len(), query);

    println!("{}", serde_json::to_string_pretty(&ShoppingResponse { items })?);
    Ok(())
}
