use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;

use crate::dispatch::NotificationQueue;
use crate::services::DestinationRegistry;

#[derive(Serialize)]
pub struct LivenessResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
    checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    /// Number of known destinations
    registry: usize,
    dispatch: &'static str,
}

/// Liveness check - is the process running?
/// Returns 200 if the server is alive.
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(LivenessResponse { status: "ok" })
}

/// Readiness check - can accepted reports still be delivered?
/// Returns 200 while the dispatch worker is running, 503 otherwise.
pub async fn readiness(
    registry: web::Data<DestinationRegistry>,
    queue: web::Data<NotificationQueue>,
) -> HttpResponse {
    let worker_alive = !queue.is_closed();

    let (status, dispatch_status, http_status) = if worker_alive {
        ("ready", "ok", StatusCode::OK)
    } else {
        ("not_ready", "stopped", StatusCode::SERVICE_UNAVAILABLE)
    };

    let response = ReadinessResponse {
        status,
        checks: ReadinessChecks {
            registry: registry.len(),
            dispatch: dispatch_status,
        },
    };

    HttpResponse::build(http_status).json(response)
}

/// Configures the health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(liveness))
            .route("/ready", web::get().to(readiness)),
    );
}
