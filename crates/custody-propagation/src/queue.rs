//! Job transport for propagation work.
//!
//! Two interchangeable implementations behind one trait, so callers
//! that need strict ordering (multi-step transactions, tests) can
//! swap the durable worker for a run-on-submit descent.

use crate::engine::PropagationEngine;
use async_trait::async_trait;
use custody_core::{Error, PropagationJob, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Submission side of the job transport.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Hand a propagation job to the transport.
    async fn submit(&self, job: PropagationJob) -> Result<()>;
}

/// Run-on-submit transport: executes the full recursive descent in
/// the caller's execution context before returning.
pub struct InlineQueue {
    engine: Arc<PropagationEngine>,
}

impl InlineQueue {
    /// Create an inline queue over the given engine.
    pub fn new(engine: Arc<PropagationEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl JobQueue for InlineQueue {
    async fn submit(&self, job: PropagationJob) -> Result<()> {
        self.engine.run_to_completion(job).await
    }
}

/// Redelivery policy for the worker transport.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delivery attempts per job before it is dropped
    pub max_attempts: u32,
    /// Sleep between redeliveries, multiplied by the attempt number
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

struct WorkerShared {
    tx: mpsc::UnboundedSender<PropagationJob>,
    in_flight: AtomicUsize,
    idle: Notify,
}

impl WorkerShared {
    fn submit(&self, job: PropagationJob) -> Result<()> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.tx.send(job).map_err(|e| {
            self.finish_one();
            Error::queue_failed(format!("worker queue closed: {e}"))
        })
    }

    fn finish_one(&self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// Deferred transport: a spawned worker consumes jobs one at a time
/// and re-submits the follow-up jobs it produces, one enqueue/dequeue
/// round-trip per graph edge.
///
/// Delivery is at-least-once with no ordering across independent
/// jobs. Retryable failures are redelivered unchanged per the
/// [`RetryPolicy`]; non-retryable failures abandon the job with a log
/// line. There is no delivery-id deduplication, so submitting an
/// identical job twice double-counts its quantity in the ledger.
pub struct WorkerQueue {
    shared: Arc<WorkerShared>,
    worker: JoinHandle<()>,
}

impl WorkerQueue {
    /// Spawn the worker task.
    pub fn start(engine: Arc<PropagationEngine>, policy: RetryPolicy) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<PropagationJob>();
        let shared = Arc::new(WorkerShared {
            tx,
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
        });

        let worker_shared = shared.clone();
        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                Self::deliver(&engine, &worker_shared, &policy, job).await;
                worker_shared.finish_one();
            }
        });

        Self { shared, worker }
    }

    async fn deliver(
        engine: &PropagationEngine,
        shared: &WorkerShared,
        policy: &RetryPolicy,
        job: PropagationJob,
    ) {
        let mut attempt: u32 = 1;
        loop {
            match engine.step(&job).await {
                Ok(follow_ups) => {
                    for follow_up in follow_ups {
                        if let Err(error) = shared.submit(follow_up) {
                            tracing::error!(error = %error, "Failed to enqueue follow-up job");
                        }
                    }
                    return;
                }
                Err(error) if error.is_retryable() && attempt < policy.max_attempts => {
                    tracing::warn!(
                        initial = %job.initial,
                        r#final = %job.r#final,
                        attempt,
                        error = %error,
                        "Propagation step failed, redelivering"
                    );
                    tokio::time::sleep(policy.backoff * attempt).await;
                    attempt += 1;
                }
                Err(error) => {
                    tracing::warn!(
                        initial = %job.initial,
                        r#final = %job.r#final,
                        error = %error,
                        "Propagation job abandoned"
                    );
                    return;
                }
            }
        }
    }

    /// Wait until every submitted job, including follow-ups, has been
    /// processed.
    pub async fn settled(&self) {
        loop {
            if self.shared.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            let notified = self.shared.idle.notified();
            if self.shared.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Stop the worker. Jobs still in the channel are dropped.
    pub fn shutdown(self) {
        self.worker.abort();
    }
}

#[async_trait]
impl JobQueue for WorkerQueue {
    async fn submit(&self, job: PropagationJob) -> Result<()> {
        self.shared.submit(job)
    }
}
