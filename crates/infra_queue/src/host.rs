//! The polling host
//!
//! Runs one poll-lock-execute-report loop per registered worker. Poll
//! failures are logged and the loop keeps going; task execution failures
//! are reported to the queue, which owns retry policy. Shutdown fans out
//! through a cancellation token.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use core_kernel::PortError;

use crate::ports::{TaskFailure, TaskQueuePort};
use crate::worker::TaskWorker;

/// Polling parameters shared by every worker loop
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Maximum tasks fetched per poll
    pub max_tasks: u32,
    /// How long each fetched task stays locked to this process
    pub lock_duration: Duration,
    /// Delay between polls on one topic
    pub poll_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            max_tasks: 10,
            lock_duration: Duration::from_secs(30),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Worker registration errors
#[derive(Debug, Error)]
pub enum HostError {
    #[error("A worker is already registered for topic '{0}'")]
    DuplicateTopic(String),
}

/// Hosts a fleet of workers, one polling loop per topic
pub struct WorkerHost {
    queue: Arc<dyn TaskQueuePort>,
    config: PollerConfig,
    workers: Vec<Arc<dyn TaskWorker>>,
    topics: HashSet<String>,
    shutdown: CancellationToken,
}

impl WorkerHost {
    /// Creates a host with no workers registered
    pub fn new(queue: Arc<dyn TaskQueuePort>, config: PollerConfig) -> Self {
        Self {
            queue,
            config,
            workers: Vec::new(),
            topics: HashSet::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Registers a worker for its topic
    ///
    /// Each topic takes exactly one worker; a second registration for the
    /// same topic is a wiring mistake and fails.
    pub fn register(&mut self, worker: Arc<dyn TaskWorker>) -> Result<(), HostError> {
        let topic = worker.topic().to_string();
        if !self.topics.insert(topic.clone()) {
            return Err(HostError::DuplicateTopic(topic));
        }
        info!(topic = %worker.topic(), "Worker registered");
        self.workers.push(worker);
        Ok(())
    }

    /// Topics with a registered worker, in registration order
    pub fn topics(&self) -> Vec<&str> {
        self.workers.iter().map(|worker| worker.topic()).collect()
    }

    /// Token that stops every polling loop when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Runs all polling loops until the shutdown token is cancelled
    pub async fn run(self) {
        info!(workers = self.workers.len(), "Worker host starting");

        let handles: Vec<_> = self
            .workers
            .into_iter()
            .map(|worker| {
                tokio::spawn(poll_loop(
                    Arc::clone(&self.queue),
                    worker,
                    self.config.clone(),
                    self.shutdown.clone(),
                ))
            })
            .collect();

        futures::future::join_all(handles).await;
        info!("Worker host stopped");
    }
}

async fn poll_loop(
    queue: Arc<dyn TaskQueuePort>,
    worker: Arc<dyn TaskWorker>,
    config: PollerConfig,
    shutdown: CancellationToken,
) {
    let topic = worker.topic().to_string();
    info!(%topic, "Polling started");

    let mut interval = tokio::time::interval(config.poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                if let Err(error) = poll_once(queue.as_ref(), worker.as_ref(), &config).await {
                    warn!(%topic, %error, "Poll failed, will retry on next interval");
                }
            }
        }
    }

    info!(%topic, "Polling stopped");
}

/// Runs one poll-lock-execute-report cycle for a worker
///
/// Returns the number of tasks fetched. Task execution errors are reported
/// to the queue, not returned; only a poll failure surfaces as an error.
pub async fn poll_once(
    queue: &dyn TaskQueuePort,
    worker: &dyn TaskWorker,
    config: &PollerConfig,
) -> Result<usize, PortError> {
    let tasks = queue
        .poll_and_lock(worker.topic(), config.max_tasks, config.lock_duration)
        .await?;
    let fetched = tasks.len();

    for task in tasks {
        match worker.execute(&task).await {
            Ok(output) => {
                if let Err(error) = queue.complete(&task, output).await {
                    // The lock will expire and the queue will redeliver.
                    warn!(task = %task, %error, "Completion report failed");
                } else {
                    debug!(task = %task, "Task completed");
                }
            }
            Err(error) => {
                warn!(task = %task, kind = error.kind(), %error, "Task failed");
                let failure = TaskFailure::from_worker_error(&error);
                if let Err(report_error) = queue.fail(&task, failure).await {
                    warn!(task = %task, %report_error, "Failure report failed");
                }
            }
        }
    }

    Ok(fetched)
}
