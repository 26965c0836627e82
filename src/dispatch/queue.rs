use tokio::sync::mpsc;

use crate::error::{AppError, AppResult};
use crate::models::PendingNotification;

pub type QueueReceiver = mpsc::UnboundedReceiver<PendingNotification>;

/// Producer handle of the pending-notification queue.
///
/// Cheap to clone; one copy lives in every request handler. Pushing never
/// waits on the consumer, and items are delivered in push order.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    tx: mpsc::UnboundedSender<PendingNotification>,
}

/// Creates the queue. The receiver belongs to the dispatch worker.
pub fn channel() -> (NotificationQueue, QueueReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NotificationQueue { tx }, rx)
}

impl NotificationQueue {
    /// Hands a notification to the dispatch worker without blocking.
    ///
    /// Fails only when the worker is gone.
    pub fn enqueue(&self, item: PendingNotification) -> AppResult<()> {
        self.tx.send(item).map_err(|e| {
            AppError::Internal(format!(
                "Dispatch worker is not running, dropped notification {}",
                e.0.id
            ))
        })
    }

    /// True once the dispatch worker has stopped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
