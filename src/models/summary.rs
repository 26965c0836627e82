use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::Destination;

/// Counts derived from one report, addressed to a logical destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Logical name as requested, before resolution
    pub destination_name: String,
    pub suite_name: String,
    pub total_tests: i64,
    pub total_failures: i64,
    /// Recounted from `<skipped/>` markers, never taken from the header
    pub skipped_count: i64,
}

impl Summary {
    /// Tests neither failed nor skipped.
    ///
    /// Negative only when the report header is inconsistent with its cases.
    pub fn passed_count(&self) -> i64 {
        self.total_tests - self.total_failures - self.skipped_count
    }

    pub fn has_failures(&self) -> bool {
        self.total_failures > 0
    }
}

/// A summary waiting in the dispatch queue
#[derive(Debug, Clone, Serialize)]
pub struct PendingNotification {
    /// Delivery id, used to correlate enqueue and delivery logs
    pub id: Uuid,
    pub destination: Destination,
    pub summary: Summary,
    pub queued_at: DateTime<Utc>,
}

impl PendingNotification {
    pub fn new(destination: Destination, summary: Summary) -> Self {
        Self {
            id: Uuid::new_v4(),
            destination,
            summary,
            queued_at: Utc::now(),
        }
    }
}
