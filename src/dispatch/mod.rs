//! Pending-notification queue and its single consumer.

pub mod queue;
pub mod worker;

pub use queue::{channel, NotificationQueue, QueueReceiver};
pub use worker::{deliver, DispatchWorker};
