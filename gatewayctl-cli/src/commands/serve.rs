//! Serve subcommand implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use gatewayctl_common::{AppConfig, LogEncoding, DEFAULT_CONFIG_PATH};
use gatewayctl_core::{ApisixGateway, MemoryCatalog, PgCatalog, PluginCatalog, RegistrationService};
use gatewayctl_http::ApiServer;
use gatewayctl_observability::{
    init_basic_observability, init_minimal_logging, shutdown_tracing, LogFileConfig,
    TracingConfig,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Backing store for the plugin catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// PostgreSQL, configured under `data.db.postgres`
    Postgres,
    /// Process memory; contents are lost on exit
    Memory,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to the YAML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, env = "APP_CONF")]
    pub conf: PathBuf,

    /// Address to bind to, overrides `http.host` and `http.port`
    #[arg(long, env = "GATEWAYCTL_BIND")]
    pub bind: Option<SocketAddr>,

    /// Catalog store
    #[arg(long, value_enum, default_value_t = StoreKind::Postgres, env = "GATEWAYCTL_STORE")]
    pub store: StoreKind,

    /// Enable OpenTelemetry tracing (metrics is separate via --metrics)
    #[arg(long, env = "GATEWAYCTL_OBSERVABILITY")]
    pub observability: bool,

    /// Enable the /metrics endpoint
    #[arg(long, env = "GATEWAYCTL_METRICS")]
    pub metrics: bool,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let config = AppConfig::load(&args.conf)
        .with_context(|| format!("loading configuration from {}", args.conf.display()))?;

    let tracing_config = TracingConfig {
        service_name: "gatewayctl".to_string(),
        otlp_endpoint: config.log.otlp_endpoint.clone(),
        default_filter: config.log.log_level.clone(),
        json: config.log.encoding == LogEncoding::Json,
        log_file: config.log.log_file().map(|path| LogFileConfig {
            path: path.to_path_buf(),
            max_backups: config.log.max_backups,
        }),
    };
    // Dropping the guard stops the file writer; keep it until run() returns.
    let _log_guard = if args.observability || args.metrics {
        init_basic_observability(tracing_config, args.observability, args.metrics)?
    } else {
        init_minimal_logging(&tracing_config)?
    };

    config.validate()?;
    info!(
        "Starting gatewayctl v{} (env: {}, mode: {})",
        env!("CARGO_PKG_VERSION"),
        config.env,
        config.mode
    );

    let gateway = ApisixGateway::new(&config.gateway.apisix)?;
    info!("Gateway admin API: {}", config.gateway.apisix.url);

    let mut postgres = None;
    let catalog: Arc<dyn PluginCatalog> = match args.store {
        StoreKind::Postgres => {
            let pg_config = &config.data.db.postgres;
            pg_config.validate()?;
            let pg = PgCatalog::connect(pg_config)
                .await
                .context("connecting to postgres")?;
            if pg_config.migrate {
                pg.migrate().await.context("creating plugin table")?;
            }
            info!("Plugin catalog: postgres");
            postgres = Some(pg.clone());
            Arc::new(pg)
        }
        StoreKind::Memory => {
            warn!("Plugin catalog: memory, registrations are lost on exit");
            Arc::new(MemoryCatalog::new())
        }
    };

    let service = RegistrationService::new(Arc::new(gateway), catalog);
    let bind = match args.bind {
        Some(addr) => addr,
        None => config.http.bind_addr()?,
    };

    let result = ApiServer::builder()
        .bind(bind)
        .service(service)
        .build()?
        .run_until(shutdown_signal())
        .await;

    if let Some(pg) = postgres {
        pg.close().await;
    }
    shutdown_tracing();

    result.map_err(Into::into)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("Shutdown requested");
}
