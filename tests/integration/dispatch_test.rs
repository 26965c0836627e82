//! Integration tests for the dispatch worker
//!
//! Tests delivery, direct-message resolution, the drop-on-failure policy and
//! single-flight sending.

use std::sync::Arc;
use std::time::Duration;

use testcrier::dispatch::{self, deliver, DispatchWorker};
use testcrier::error::AppError;
use testcrier::models::{Destination, PendingNotification, StatusColor, Summary};
use testcrier::services::MessagingProvider;

use crate::common::{wait_for_attempts, wait_for_sends, RecordingProvider};

fn pending(destination: Destination, suite: &str, failures: i64) -> PendingNotification {
    PendingNotification::new(
        destination,
        Summary {
            destination_name: "general".to_string(),
            suite_name: suite.to_string(),
            total_tests: 5,
            total_failures: failures,
            skipped_count: 1,
        },
    )
}

fn channel() -> Destination {
    Destination::Channel("C123".to_string())
}

// =============================================================================
// deliver()
// =============================================================================

#[tokio::test]
async fn test_deliver_sends_formatted_message_to_channel() {
    let provider = RecordingProvider::new();

    deliver(&provider, &pending(channel(), "suite1", 1))
        .await
        .unwrap();

    let sent = provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].conversation_id, "C123");
    assert_eq!(sent[0].attachments[0].color, StatusColor::Fail);
    assert_eq!(sent[0].field("Passed"), Some("3"));
    assert!(provider.opened().is_empty());
}

#[tokio::test]
async fn test_deliver_opens_direct_conversation_for_user() {
    let provider = RecordingProvider::new();

    deliver(
        &provider,
        &pending(Destination::DirectUser("U9".to_string()), "suite1", 0),
    )
    .await
    .unwrap();

    assert_eq!(provider.opened(), vec!["U9".to_string()]);
    assert_eq!(provider.sent()[0].conversation_id, "D-U9");
}

#[tokio::test]
async fn test_deliver_reports_send_failure() {
    let provider = RecordingProvider::new().failing_sends();

    let result = deliver(&provider, &pending(channel(), "suite1", 0)).await;

    assert!(matches!(result, Err(AppError::DeliveryFailed(_))));
    assert_eq!(provider.attempts(), 1);
}

#[tokio::test]
async fn test_deliver_does_not_send_when_direct_conversation_fails() {
    let provider = RecordingProvider::new().failing_open();

    let result = deliver(
        &provider,
        &pending(Destination::DirectUser("U9".to_string()), "suite1", 0),
    )
    .await;

    assert!(matches!(result, Err(AppError::DeliveryFailed(_))));
    assert_eq!(provider.attempts(), 0);
}

// =============================================================================
// Worker Loop
// =============================================================================

#[tokio::test]
async fn test_worker_delivers_in_queue_order() {
    let provider = Arc::new(RecordingProvider::new());
    let (queue, rx) = dispatch::channel();
    let dyn_provider: Arc<dyn MessagingProvider> = provider.clone();
    let handle = DispatchWorker::new(dyn_provider, rx).spawn();

    for suite in ["one", "two", "three"] {
        queue.enqueue(pending(channel(), suite, 0)).unwrap();
    }
    drop(queue);

    // Worker exits once the last producer is gone
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("worker should stop")
        .unwrap();

    let texts: Vec<String> = provider.sent().into_iter().map(|m| m.text).collect();
    assert_eq!(
        texts,
        vec![
            "*Test Results For one*",
            "*Test Results For two*",
            "*Test Results For three*",
        ]
    );
}

#[tokio::test]
async fn test_worker_drops_failed_items_and_keeps_going() {
    let provider = Arc::new(RecordingProvider::new().failing_sends());
    let (queue, rx) = dispatch::channel();
    let dyn_provider: Arc<dyn MessagingProvider> = provider.clone();
    DispatchWorker::new(dyn_provider, rx).spawn();

    queue.enqueue(pending(channel(), "first", 0)).unwrap();
    queue.enqueue(pending(channel(), "second", 0)).unwrap();

    wait_for_attempts(&provider, 2).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    // One attempt each: no retry, no requeue
    assert_eq!(provider.attempts(), 2);
    assert!(provider.sent().is_empty());
    assert!(!queue.is_closed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_never_sends_concurrently() {
    let provider = Arc::new(RecordingProvider::new().with_send_delay(Duration::from_millis(20)));
    let (queue, rx) = dispatch::channel();
    let dyn_provider: Arc<dyn MessagingProvider> = provider.clone();
    DispatchWorker::new(dyn_provider, rx).spawn();

    let producers: Vec<_> = (0..8)
        .map(|i| {
            let queue = queue.clone();
            tokio::spawn(async move {
                queue
                    .enqueue(pending(channel(), &format!("suite{}", i), 0))
                    .unwrap();
            })
        })
        .collect();
    for producer in producers {
        producer.await.unwrap();
    }

    let sent = wait_for_sends(&provider, 8).await;
    assert_eq!(sent.len(), 8);
    assert_eq!(provider.max_in_flight(), 1);
}
