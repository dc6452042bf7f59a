use anyhow::Context;
use clap::Parser;
use score_graph::config::cli::Command;
use score_graph::config::StoreBackend;
use score_graph::gateway::{self, GraphDataClient, RpcGraphClient};
use score_graph::utils::error::ErrorCategory;
use score_graph::utils::{logger, shutdown::shutdown_signal};
use score_graph::{AppConfig, Cli, FirestoreStore, GraphDataService, GraphError, MemoryStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    // 初始化日誌
    logger::init_logger(cli.verbose, config.logging.json);
    if cli.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    let result = match cli.command {
        Command::Serve { .. } => run_service(config).await,
        Command::Gateway { .. } => run_gateway(config).await,
        Command::Probe { .. } => return run_probe(config).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);

        let exit_code = match e.category() {
            ErrorCategory::Config => 2,
            _ => 1,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run_service(config: AppConfig) -> Result<(), GraphError> {
    config.validate_service_side()?;
    let addr = config.service_addr()?;

    tracing::info!(
        "Starting aggregation service (backend: {:?}, collection: '{}', workers: {})",
        config.store.backend,
        config.store.collection,
        config.service.max_workers
    );

    match config.store.backend {
        StoreBackend::Firestore => {
            let store = Arc::new(FirestoreStore::new(&config.store)?);
            GraphDataService::new(store, &config)
                .serve(addr, shutdown_signal())
                .await
        }
        StoreBackend::Memory => {
            let store = match &config.store.seed_file {
                Some(path) => MemoryStore::from_seed_file(&config.store.collection, path)?,
                None => MemoryStore::new(),
            };
            GraphDataService::new(Arc::new(store), &config)
                .serve(addr, shutdown_signal())
                .await
        }
    }
}

async fn run_gateway(config: AppConfig) -> Result<(), GraphError> {
    config.validate_gateway_side()?;
    let addr = config.gateway_addr()?;

    // one channel for the life of the process
    let client = RpcGraphClient::connect_lazy(&config.gateway.service_endpoint)?;
    let router = gateway::router(Arc::new(client));

    gateway::serve(router, addr, shutdown_signal()).await
}

async fn run_probe(config: AppConfig) -> anyhow::Result<()> {
    let endpoint = &config.gateway.service_endpoint;
    score_graph::utils::validation::validate_url("endpoint", endpoint)?;

    let client = RpcGraphClient::connect_lazy(endpoint)?;
    tracing::info!("Sending GetGraphData request to {}", endpoint);

    let response = client
        .get_graph_data()
        .await
        .map_err(GraphError::from)
        .with_context(|| format!("GetGraphData against {} failed", endpoint))?;

    tracing::info!("Server responded with {} points", response.data_points.len());
    for point in &response.data_points {
        println!("{}\t{}", point.label, point.value);
    }

    Ok(())
}
