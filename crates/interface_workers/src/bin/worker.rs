//! Claims Worker Host Binary
//!
//! Starts the external-task worker host: one poll loop per claim-lifecycle
//! topic, all sharing the domain services and the claim cache.
//!
//! # Usage
//!
//! ```bash
//! # Run against a local stack
//! CLAIMS_WORKER_QUEUE_URL=http://localhost:8080 cargo run --bin claims-worker
//! ```
//!
//! # Environment Variables
//!
//! * `CLAIMS_WORKER_QUEUE_URL` - External task queue base URL (required)
//! * `CLAIMS_WORKER_CLAIMS_URL` - Claim store base URL
//! * `CLAIMS_WORKER_CUSTOMERS_URL` - Customer directory base URL
//! * `CLAIMS_WORKER_POLICIES_URL` - Policy directory base URL
//! * `CLAIMS_WORKER_EMPLOYEES_URL` - Employee directory base URL
//! * `CLAIMS_WORKER_NOTIFICATIONS_URL` - Notification gateway base URL
//! * `CLAIMS_WORKER_MAX_TASKS` - Tasks fetched per poll (default: 10)
//! * `CLAIMS_WORKER_LOCK_DURATION_SECS` - Task lock duration (default: 30)
//! * `CLAIMS_WORKER_POLL_INTERVAL_SECS` - Idle poll pause (default: 5)
//! * `CLAIMS_WORKER_REQUEST_TIMEOUT_SECS` - HTTP timeout (default: 30)
//! * `CLAIMS_WORKER_LOG_LEVEL` - Log level: trace, debug, info, warn, error
//!
//! A collaborator URL left unset leaves that port unconfigured; the owning
//! services degrade to empty results and the affected workers fail their
//! tasks instead of crashing the host.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::{HealthCheckable, InMemoryCache};
use domain_claims::{AdjusterAssignmentService, ClaimStorePort, ClaimStoreService};
use domain_directory::{
    AdjusterDirectoryPort, CustomerDirectoryPort, CustomerLookupService, NotificationPort,
    NotificationService, PolicyDirectoryPort, PolicyLookupService,
};
use infra_queue::WorkerHost;
use infra_rest::{
    RestAdjusterDirectory, RestClaimStore, RestCustomerDirectory, RestNotificationGateway,
    RestPolicyDirectory, RestTaskQueue,
};
use interface_workers::{WorkerConfig, WorkerServices};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env().context("Invalid CLAIMS_WORKER_* configuration")?;
    init_tracing(&config.log_level);

    tracing::info!("Starting claims worker host");

    let queue_url = config
        .queue_url
        .clone()
        .context("CLAIMS_WORKER_QUEUE_URL is required")?;
    let queue = Arc::new(
        RestTaskQueue::new(config.rest(&queue_url)).context("Failed to build task queue client")?,
    );
    tracing::info!(worker_id = %queue.worker_id(), %queue_url, "Task queue client ready");

    let claim_store = config
        .claims_url
        .as_deref()
        .map(|url| RestClaimStore::new(config.rest(url)))
        .transpose()
        .context("Failed to build claim store adapter")?
        .map(Arc::new);
    let customer_directory = config
        .customers_url
        .as_deref()
        .map(|url| RestCustomerDirectory::new(config.rest(url)))
        .transpose()
        .context("Failed to build customer directory adapter")?
        .map(Arc::new);
    let policy_directory = config
        .policies_url
        .as_deref()
        .map(|url| RestPolicyDirectory::new(config.rest(url)))
        .transpose()
        .context("Failed to build policy directory adapter")?
        .map(Arc::new);
    let adjuster_directory = config
        .employees_url
        .as_deref()
        .map(|url| RestAdjusterDirectory::new(config.rest(url)))
        .transpose()
        .context("Failed to build employee directory adapter")?
        .map(Arc::new);
    let notification_gateway = config
        .notifications_url
        .as_deref()
        .map(|url| RestNotificationGateway::new(config.rest(url)))
        .transpose()
        .context("Failed to build notification gateway adapter")?
        .map(Arc::new);

    report_startup_health(
        &queue,
        &claim_store,
        &customer_directory,
        &policy_directory,
        &adjuster_directory,
        &notification_gateway,
    )
    .await;

    let claims = Arc::new(ClaimStoreService::new(
        claim_store.map(|adapter| adapter as Arc<dyn ClaimStorePort>),
        Arc::new(InMemoryCache::new()),
    ));
    let adjusters = adjuster_directory.map(|adapter| adapter as Arc<dyn AdjusterDirectoryPort>);
    let services = WorkerServices {
        assignments: Arc::new(AdjusterAssignmentService::new(
            adjusters,
            Arc::clone(&claims),
        )),
        customers: Arc::new(CustomerLookupService::new(
            customer_directory.map(|adapter| adapter as Arc<dyn CustomerDirectoryPort>),
            Arc::new(InMemoryCache::new()),
        )),
        policies: Arc::new(PolicyLookupService::new(
            policy_directory.map(|adapter| adapter as Arc<dyn PolicyDirectoryPort>),
        )),
        notifications: Arc::new(NotificationService::new(
            notification_gateway.map(|adapter| adapter as Arc<dyn NotificationPort>),
        )),
        claims,
    };

    let mut host = WorkerHost::new(queue, config.poller());
    services
        .register_all(&mut host)
        .context("Worker registration failed")?;
    tracing::info!(topics = ?host.topics(), "Workers registered");

    let shutdown = host.shutdown_token();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.cancel();
    });

    host.run().await;

    tracing::info!("Worker host shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Probes every configured adapter once and logs the outcome
///
/// A degraded collaborator is logged, not fatal; the owning services
/// degrade per call and recover as soon as the remote side does.
async fn report_startup_health(
    queue: &Arc<RestTaskQueue>,
    claim_store: &Option<Arc<RestClaimStore>>,
    customer_directory: &Option<Arc<RestCustomerDirectory>>,
    policy_directory: &Option<Arc<RestPolicyDirectory>>,
    adjuster_directory: &Option<Arc<RestAdjusterDirectory>>,
    notification_gateway: &Option<Arc<RestNotificationGateway>>,
) {
    let mut probes: Vec<Arc<dyn HealthCheckable>> =
        vec![Arc::clone(queue) as Arc<dyn HealthCheckable>];
    if let Some(adapter) = claim_store {
        probes.push(Arc::clone(adapter) as Arc<dyn HealthCheckable>);
    }
    if let Some(adapter) = customer_directory {
        probes.push(Arc::clone(adapter) as Arc<dyn HealthCheckable>);
    }
    if let Some(adapter) = policy_directory {
        probes.push(Arc::clone(adapter) as Arc<dyn HealthCheckable>);
    }
    if let Some(adapter) = adjuster_directory {
        probes.push(Arc::clone(adapter) as Arc<dyn HealthCheckable>);
    }
    if let Some(adapter) = notification_gateway {
        probes.push(Arc::clone(adapter) as Arc<dyn HealthCheckable>);
    }

    for probe in probes {
        let result = probe.health_check().await;
        if result.is_healthy() {
            tracing::info!(
                service = %result.service,
                latency_ms = result.latency_ms,
                "Collaborator healthy"
            );
        } else {
            tracing::warn!(
                service = %result.service,
                message = result.message.as_deref().unwrap_or("no detail"),
                "Collaborator degraded at startup"
            );
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM)
///
/// Cancelling the host's shutdown token lets in-flight tasks finish their
/// current poll cycle before the loops exit.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
