//! Worker-queue delivery: async descent, redelivery behavior.

mod common;

use common::Harness;
use custody_core::{DocumentKind, PropagationJob, Quantity};
use custody_propagation::{JobQueue, OperationHook, RetryPolicy, RunMode, WorkerQueue};
use custody_testkit::{forward, group, DocumentBuilder};
use std::sync::Arc;

#[tokio::test]
async fn async_descent_reaches_the_same_ledger_state_as_sync() {
    let h = Harness::new();
    let initial = DocumentBuilder::new(DocumentKind::General)
        .received(100)
        .insert(&h.store)
        .await;
    let suite = DocumentBuilder::new(DocumentKind::General)
        .received(100)
        .operation("D 15")
        .insert(&h.store)
        .await;
    forward(&h.store, &initial, &suite).await;
    let aggregate = DocumentBuilder::new(DocumentKind::General)
        .received(100)
        .operation("R 1")
        .insert(&h.store)
        .await;
    group(&h.store, &aggregate, &suite, 100).await;

    let queue = Arc::new(WorkerQueue::start(h.engine.clone(), RetryPolicy::default()));
    let hook = OperationHook::new(h.engine.clone(), queue.clone());

    let seeded = hook
        .operation_signed(&aggregate, RunMode::Enqueue)
        .await
        .unwrap();
    assert!(seeded);
    queue.settled().await;

    for id in [aggregate.id, suite.id, initial.id] {
        let row = h
            .ledger
            .record(&id, &aggregate.id, DocumentKind::General)
            .await
            .unwrap();
        assert_eq!(row.quantity, Quantity::from(100));
    }
}

#[tokio::test]
async fn duplicate_delivery_double_counts() {
    // At-least-once delivery plus an additive upsert: redelivering an
    // identical job doubles the stored quantity. There is no
    // delivery-id deduplication; this pins the observed behavior.
    let h = Harness::new();
    let doc = DocumentBuilder::new(DocumentKind::General)
        .received(100)
        .operation("R 1")
        .insert(&h.store)
        .await;

    let queue = Arc::new(WorkerQueue::start(h.engine.clone(), RetryPolicy::default()));
    let seed = PropagationJob::seed(&doc);
    queue.submit(seed.clone()).await.unwrap();
    queue.submit(seed).await.unwrap();
    queue.settled().await;

    let row = h
        .ledger
        .record(&doc.id, &doc.id, DocumentKind::General)
        .await
        .unwrap();
    assert_eq!(row.quantity, Quantity::from(200));
}

#[tokio::test]
async fn non_retryable_job_is_abandoned_without_poisoning_the_queue() {
    let h = Harness::new();
    // Terminal operation, no received quantity: a data inconsistency
    // the queue must not spin on.
    let bad = DocumentBuilder::new(DocumentKind::General)
        .operation("R 1")
        .insert(&h.store)
        .await;
    let good = DocumentBuilder::new(DocumentKind::General)
        .received(50)
        .operation("R 1")
        .insert(&h.store)
        .await;

    let queue = Arc::new(WorkerQueue::start(h.engine.clone(), RetryPolicy::default()));
    queue.submit(PropagationJob::seed(&bad)).await.unwrap();
    queue.submit(PropagationJob::seed(&good)).await.unwrap();
    queue.settled().await;

    assert!(h
        .ledger
        .record(&bad.id, &bad.id, DocumentKind::General)
        .await
        .is_none());
    let row = h
        .ledger
        .record(&good.id, &good.id, DocumentKind::General)
        .await
        .unwrap();
    assert_eq!(row.quantity, Quantity::from(50));
}
