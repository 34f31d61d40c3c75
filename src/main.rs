//! notification-agent server binary.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use notification_agent::adapters::http::RouterOptions;
use notification_agent::adapters::{
    InlineDispatcher, PlaceholderGenerator, PostgresCampaignReader, PostgresSessionStore,
    RedisQueueDispatcher, RedisQueueWorker,
};
use notification_agent::app::{session_processor, AppComponents};
use notification_agent::config::{AppConfig, ServerConfig};
use notification_agent::ports::{SessionStore, WorkDispatcher};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        async_tasks = config.features.enable_async_tasks,
        "starting notification-agent"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let store: Arc<dyn SessionStore> = Arc::new(PostgresSessionStore::new(pool.clone()));
    let campaigns = Arc::new(PostgresCampaignReader::new(pool.clone()));
    let processor = session_processor(
        store.clone(),
        Arc::new(PlaceholderGenerator::new()),
        config.dispatch.processing_timeout(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut workers: Vec<JoinHandle<()>> = Vec::new();

    let dispatcher: Arc<dyn WorkDispatcher> = match (&config.queue.url, config.features.uses_queue()) {
        (Some(url), true) => {
            let client = redis::Client::open(url.as_str())?;
            let conn = client.get_multiplexed_async_connection().await?;

            for worker_id in 0..config.queue.workers {
                let worker = RedisQueueWorker::new(
                    client.clone(),
                    config.queue.queue_name.clone(),
                    processor.clone(),
                )
                .with_poll_timeout(config.queue.poll_timeout())
                .with_worker_id(worker_id);
                let shutdown = shutdown_rx.clone();
                workers.push(tokio::spawn(async move {
                    if let Err(e) = worker.run(shutdown).await {
                        error!(worker = worker_id, error = %e, "queue worker exited");
                    }
                }));
            }

            info!(workers = config.queue.workers, queue = %config.queue.queue_name, "deferred dispatch enabled");
            Arc::new(RedisQueueDispatcher::new(conn, config.queue.queue_name.clone()))
        }
        _ => {
            info!("inline dispatch enabled");
            Arc::new(InlineDispatcher::new(processor))
        }
    };

    let options = RouterOptions {
        cors_origins: config.server.cors_origins_list(),
        request_timeout: config.server.request_timeout(),
        is_production: config.is_production(),
    };
    let router = AppComponents {
        store,
        campaigns,
        dispatcher,
        verbose_errors: config.features.verbose_errors,
    }
    .into_router(&options);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("http server stopped, draining workers");
    let _ = shutdown_tx.send(true);
    for worker in workers {
        if let Err(e) = worker.await {
            warn!(error = %e, "worker task panicked");
        }
    }
    pool.close().await;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if server.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
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

    info!("shutdown signal received");
}
