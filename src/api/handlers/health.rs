//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::application::services::deadline::with_store_timeout;
use crate::error::AppError;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Both stores answer
/// - **503 Service Unavailable**: At least one store is unreachable or did not
///   answer within `STORE_TIMEOUT_MS`
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "worker": 2,
///   "checks": {
///     "mapping_store": { "status": "ok", "message": "Mapping store reachable" },
///     "counter_store": { "status": "ok", "message": "Counter store reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let limit = state.store_timeout;
    let (mapping_healthy, counter_healthy) = tokio::join!(
        with_store_timeout(limit, "mapping_health", async {
            Ok::<_, AppError>(state.mapping_store.health_check().await)
        }),
        with_store_timeout(limit, "counter_health", async {
            Ok::<_, AppError>(state.counter_store.health_check().await)
        })
    );
    let mapping_healthy = mapping_healthy.unwrap_or(false);
    let counter_healthy = counter_healthy.unwrap_or(false);

    let mapping_store = probe_status("Mapping store", mapping_healthy);
    let counter_store = probe_status("Counter store", counter_healthy);
    let all_healthy = mapping_store.is_ok() && counter_store.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        worker: state.worker_id,
        checks: HealthChecks {
            mapping_store,
            counter_store,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        tracing::warn!(worker = ?state.worker_id, "Health check degraded");
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

fn probe_status(component: &str, healthy: bool) -> CheckStatus {
    if healthy {
        CheckStatus::ok(format!("{component} reachable"))
    } else {
        CheckStatus::error(format!("{component} unreachable"))
    }
}
