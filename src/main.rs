use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware, web, App, HttpServer};

use testcrier::config;
use testcrier::dispatch::{self, DispatchWorker};
use testcrier::routes;
use testcrier::services::{DestinationRegistry, MessagingProvider, SlackClient};

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Load configuration
    let config = config::Config::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("Starting Testcrier server on {}:{}", config.host, config.port);

    let slack = SlackClient::from_config(&config.slack).map_err(|e| {
        log::error!("Slack client error: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let provider: Arc<dyn MessagingProvider> = Arc::new(slack);

    // Known destinations are required before accepting any report
    let registry = DestinationRegistry::initialize(provider.as_ref())
        .await
        .map_err(|e| {
            log::error!("Unable to load destinations: {}", e);
            std::io::Error::other(e.to_string())
        })?;

    if let Some(ref name) = config.default_channel {
        if registry.resolve(name).is_none() {
            log::warn!("Default channel '{}' is not a known destination", name);
        }
    }

    let registry = web::Data::new(registry);

    // Start the single dispatch worker
    let (queue, rx) = dispatch::channel();
    let worker = DispatchWorker::new(provider, rx).spawn();
    let queue = web::Data::new(queue);

    let host = config.host.clone();
    let port = config.port;
    let config = web::Data::new(config);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(registry.clone())
            .app_data(queue.clone())
            .app_data(config.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::health::configure)
            .configure(routes::ingest::configure)
    })
    .bind((host.as_str(), port))?
    .shutdown_timeout(30)
    .run();

    // Spawn graceful shutdown handler
    let server_handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        log::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await?;

    // Give the worker a bounded window to drain what is already queued
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::error!("Dispatch worker terminated abnormally: {}", e),
        Err(_) => log::warn!("Dispatch worker still busy at shutdown, exiting anyway"),
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {}", e);
                // Wait forever if signal handler fails
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
