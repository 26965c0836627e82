use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::dispatch::NotificationQueue;
use crate::error::AppResult;
use crate::ingest::read_report_file;
use crate::services::{DestinationRegistry, ReportService};

/// Query parameters of a report upload
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub channel: Option<String>,
}

/// Response for an accepted report
#[derive(Serialize)]
pub struct IngestResponse {
    pub id: String,
    pub suite: String,
    pub destination: String,
}

/// POST /test/{name}
/// Accepts a JUnit report as the `uploadfile` multipart field.
///
/// `{name}` is an opaque label. Answers 202 once the summary is queued;
/// delivery happens later and its outcome is never reported back.
pub async fn upload_report(
    registry: web::Data<DestinationRegistry>,
    queue: web::Data<NotificationQueue>,
    config: web::Data<Config>,
    name: web::Path<String>,
    query: web::Query<ReportQuery>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let report_bytes = read_report_file(payload, config.max_upload_size)
        .await
        .map_err(|e| {
            log::warn!(
                "Dropping report upload '{}': reason={} error={}",
                name.as_str(),
                e.reason(),
                e
            );
            e
        })?;

    let queued = ReportService::ingest(
        registry.get_ref(),
        queue.get_ref(),
        config.default_channel.as_deref(),
        &report_bytes,
        query.channel.as_deref(),
    )?;

    Ok(HttpResponse::Accepted().json(IngestResponse {
        id: queued.id.to_string(),
        suite: queued.summary.suite_name,
        destination: queued.summary.destination_name,
    }))
}

/// Configures the report upload routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/test/{name}", web::post().to(upload_report));
}
