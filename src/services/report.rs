use uuid::Uuid;

use crate::dispatch::NotificationQueue;
use crate::error::{AppError, AppResult};
use crate::ingest::ReportParser;
use crate::models::{PendingNotification, Summary};
use crate::services::registry::DestinationRegistry;
use crate::services::summary::aggregate;

/// What was queued for an accepted report
#[derive(Debug, Clone)]
pub struct QueuedReport {
    pub id: Uuid,
    pub summary: Summary,
}

pub struct ReportService;

impl ReportService {
    /// Parses a report, resolves its destination and queues the summary.
    ///
    /// `requested` falls back to `default_destination` when absent or blank.
    /// Every rejection is logged with a `reason=` token and returned; in that
    /// case nothing is queued. Returns as soon as the summary is queued.
    pub fn ingest(
        registry: &DestinationRegistry,
        queue: &NotificationQueue,
        default_destination: Option<&str>,
        report_bytes: &[u8],
        requested: Option<&str>,
    ) -> AppResult<QueuedReport> {
        // 1. Parse
        let report = ReportParser::new(report_bytes).parse().map_err(|e| {
            log::warn!("Dropping report upload: reason={} error={}", e.reason(), e);
            e
        })?;

        // 2. Resolve destination
        let destination_name = requested
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or(default_destination)
            .unwrap_or_default()
            .to_string();

        let destination = match registry.resolve(&destination_name) {
            Some(destination) => destination.clone(),
            None => {
                let err = AppError::UnknownDestination(if destination_name.is_empty() {
                    "no destination requested and no default configured".to_string()
                } else {
                    destination_name.clone()
                });
                log::warn!(
                    "Dropping report '{}': reason={} destination='{}'",
                    report.name,
                    err.reason(),
                    destination_name
                );
                return Err(err);
            }
        };

        // 3. Aggregate
        let summary = aggregate(&report, &destination_name);

        // 4. Enqueue
        let pending = PendingNotification::new(destination, summary.clone());
        let id = pending.id;
        queue.enqueue(pending).map_err(|e| {
            log::error!(
                "Dropping report '{}': reason={} error={}",
                summary.suite_name,
                e.reason(),
                e
            );
            e
        })?;

        log::info!(
            "Queued notification {} for suite '{}' -> '{}' (tests={} failures={} skipped={})",
            id,
            summary.suite_name,
            destination_name,
            summary.total_tests,
            summary.total_failures,
            summary.skipped_count
        );

        Ok(QueuedReport { id, summary })
    }
}
