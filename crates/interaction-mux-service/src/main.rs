//! # Interaction-Mux Service
//!
//! Binary entry point for the interaction HTTP service.
//!
//! This executable:
//! - Loads configuration from files and environment
//! - Initializes logging
//! - Registers the demo todo routes
//! - Optionally overwrites the global command set over REST
//! - Starts the HTTP server from interaction-mux-api

mod settings;
mod todo;

use anyhow::Context;
use interaction_mux_api::{start_server, LoggingConfig, Mux, ServiceConfig, ServiceError};
use interaction_mux_client::{ClientConfig, CommandScope, InteractionClient};
use std::sync::Arc;
use std::time::Duration;
use todo::TodoList;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let explicit_path = std::env::var(settings::CONFIG_FILE_ENV).ok();
    let loaded = settings::load_config(explicit_path.as_deref(), settings::environment());

    let service_config = match loaded {
        Ok(config) => {
            init_tracing(&config.logging);
            config
        }
        Err(e) => {
            init_tracing(&LoggingConfig::default());
            error!(
                error = %e,
                "Could not load service configuration; aborting. \
                 Fix the configuration and restart."
            );
            std::process::exit(3);
        }
    };

    info!("Starting Interaction-Mux Service");
    if let Some(path) = explicit_path.as_deref().filter(|p| !p.is_empty()) {
        info!(path = %path, "Loaded configuration from explicit path");
    }

    if let Err(e) = service_config.validate() {
        error!(error = %e, "Service configuration is invalid; aborting");
        std::process::exit(3);
    }

    let mut mux = match Mux::from_config(&service_config) {
        Ok(mux) => mux,
        Err(e) => {
            error!(error = %e, "Failed to create interaction multiplexer; aborting");
            std::process::exit(3);
        }
    };

    let list = Arc::new(TodoList::default());
    todo::mount(&mut mux, &list);

    for route in mux.routes() {
        info!(
            namespace = %route.namespace,
            route = %route.route,
            kinds = ?route.kinds,
            "Registered route"
        );
    }

    if service_config.application.register_commands {
        if let Err(e) = register_commands(&service_config).await {
            // The previously registered command set keeps working.
            warn!(error = %e, "Failed to register commands");
        }
    }

    let shutdown_timeout = Duration::from_secs(service_config.server.shutdown_timeout_seconds);
    let shutdown = shutdown_signal(shutdown_timeout);
    if let Err(e) = start_server(mux, &service_config.server, shutdown).await {
        error!("Failed to start server: {}", e);

        let exit_code = match e {
            ServiceError::BindFailed { .. } => 1,
            ServiceError::ServerFailed { .. } => 2,
            ServiceError::Configuration(_) => 3,
        };

        std::process::exit(exit_code);
    }
}

// ============================================================================
// Private helpers
// ============================================================================

fn init_tracing(logging: &LoggingConfig) {
    let default_filter = format!(
        "interaction_mux_service={level},interaction_mux_api={level},\
         interaction_mux_client={level},tower_http=debug",
        level = logging.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&default_filter))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json_format {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn register_commands(config: &ServiceConfig) -> anyhow::Result<()> {
    let client = InteractionClient::new(
        config.application.application_id,
        config.application.bot_token.clone(),
        ClientConfig::default(),
    )
    .context("building REST client")?;

    let registered = client
        .bulk_overwrite_commands(CommandScope::Global, &todo::commands())
        .await
        .context("overwriting global commands")?;

    for command in &registered {
        info!(command = %command.name, command_id = %command.id, "Command available");
    }
    Ok(())
}

async fn shutdown_signal(shutdown_timeout: Duration) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Received SIGINT (Ctrl+C), initiating graceful shutdown"
            );
        },
        _ = terminate => {
            info!(
                timeout_seconds = shutdown_timeout.as_secs(),
                "Received SIGTERM, initiating graceful shutdown"
            );
        },
    }
}
