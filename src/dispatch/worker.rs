use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;

use super::QueueReceiver;
use crate::error::{AppError, AppResult};
use crate::models::{Destination, PendingNotification};
use crate::services::notification::{format_notification, MessagingProvider};

/// The single consumer of the pending-notification queue.
///
/// Items are delivered strictly one at a time, so at most one send is in
/// flight against the provider.
pub struct DispatchWorker {
    provider: Arc<dyn MessagingProvider>,
    rx: QueueReceiver,
}

impl DispatchWorker {
    pub fn new(provider: Arc<dyn MessagingProvider>, rx: QueueReceiver) -> Self {
        Self { provider, rx }
    }

    /// Runs the worker on the tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Drains the queue until every producer handle is dropped
    pub async fn run(mut self) {
        log::info!("Dispatch worker started");

        let mut delivered = 0usize;
        let mut dropped = 0usize;

        while let Some(item) = self.rx.recv().await {
            // `deliver` logs the drop reason; the item is not retried
            match deliver(self.provider.as_ref(), &item).await {
                Ok(()) => delivered += 1,
                Err(_) => dropped += 1,
            }
        }

        log::info!(
            "Dispatch worker stopped: queue closed (delivered={} dropped={})",
            delivered,
            dropped
        );
    }
}

/// Formats and sends one pending notification.
///
/// Direct-message destinations are turned into a conversation id here rather
/// than at enqueue time, since those ids can be scoped to a provider session.
pub async fn deliver(provider: &dyn MessagingProvider, item: &PendingNotification) -> AppResult<()> {
    let notification = format_notification(&item.summary, &item.destination);

    let conversation_id = match &notification.destination {
        Destination::Channel(id) => id.clone(),
        Destination::DirectUser(user_id) => {
            match provider.open_direct_channel(user_id).await {
                Ok(id) => id,
                Err(e) => {
                    log::error!(
                        "Dropping notification {}: reason=direct_channel_failed user={} error={}",
                        item.id,
                        user_id,
                        e
                    );
                    return Err(AppError::DeliveryFailed(e.to_string()));
                }
            }
        }
    };

    if let Err(e) = provider
        .send_message(
            &conversation_id,
            &notification.text,
            &notification.attachments(),
        )
        .await
    {
        log::error!(
            "Dropping notification {}: reason=delivery_failed destination={} error={}",
            item.id,
            notification.destination,
            e
        );
        return Err(AppError::DeliveryFailed(e.to_string()));
    }

    let latency_ms = (Utc::now() - item.queued_at).num_milliseconds();
    log::info!(
        "Delivered notification {} for suite '{}' to {} ({}ms after enqueue)",
        item.id,
        item.summary.suite_name,
        notification.destination,
        latency_ms
    );

    Ok(())
}
