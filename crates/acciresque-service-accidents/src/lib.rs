//! Acciresque accident report HTTP service.
//!
//! A thin CRUD proxy in front of the accident document store. Every request
//! performs at most one store call through `acciresque-lib`.
//!
//! # Endpoints
//!
//! - `GET /accidents` - List every accident
//! - `POST /accidents` - Create an accident, answering `{accidentId}`
//! - `GET /accidents/{id}` - Fetch one accident
//! - `PUT /accidents/{id}` - Overwrite one accident, answering `{success}`
//! - `DELETE /accidents/{id}` - Delete one accident, answering `{success}`
//! - `GET /metrics` - Prometheus metrics endpoint
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

use std::future::Future;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use acciresque_lib::{
    Accident, CreatedAccident, Error as LibError, Operation, WriteOutcome, create_accident,
    delete_accident, get_accident, list_accidents, update_accident,
};
use acciresque_service_shared::{
    AccidentRequest, AppState, MetricsConfig, MetricsLayer, ProblemDetails, RequestId, Validate,
    from_lib_error, health_live, health_ready, json_rejection_problem, metrics_handler,
    path_rejection_problem, record_accidents_returned, record_store_call,
};

/// Handler result: a JSON body or an RFC 9457 problem.
type HandlerResult<T> = Result<Json<T>, ProblemDetails>;

/// Build the service router around `state`.
pub fn app(state: AppState, metrics: &MetricsConfig) -> Router {
    Router::new()
        .route("/accidents", get(list_handler).post(create_handler))
        .route(
            "/accidents/{id}",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route(&metrics.path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(MetricsLayer)
        .with_state(state)
}

/// Handle GET /accidents.
async fn list_handler(
    State(state): State<AppState>,
    request_id: RequestId,
) -> HandlerResult<Vec<Accident>> {
    let accidents = observe(
        Operation::ListAccidents,
        &request_id,
        list_accidents(state.store()),
    )
    .await?;

    record_accidents_returned(accidents.len());
    info!(request_id = %request_id, count = accidents.len(), "listed accidents");
    Ok(Json(accidents))
}

/// Handle GET /accidents/{id}.
async fn get_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    path: Result<Path<String>, PathRejection>,
) -> HandlerResult<Accident> {
    let id = path_id(path, &request_id)?;
    let accident = observe(
        Operation::GetAccidentById,
        &request_id,
        get_accident(state.store(), &id),
    )
    .await?;

    info!(request_id = %request_id, accident_id = %id, "fetched accident");
    Ok(Json(accident))
}

/// Handle POST /accidents.
async fn create_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<AccidentRequest>, JsonRejection>,
) -> HandlerResult<CreatedAccident> {
    let accident = accident_from_body(payload, &request_id)?;

    let created = observe(
        Operation::CreateAccident,
        &request_id,
        create_accident(state.store(), accident),
    )
    .await?;

    info!(request_id = %request_id, accident_id = %created.accident_id, "created accident");
    Ok(Json(created))
}

/// Handle PUT /accidents/{id}.
async fn update_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<AccidentRequest>, JsonRejection>,
) -> HandlerResult<WriteOutcome> {
    let id = path_id(path, &request_id)?;
    let accident = accident_from_body(payload, &request_id)?;

    let outcome = observe(
        Operation::UpdateAccident,
        &request_id,
        update_accident(state.store(), &id, accident),
    )
    .await?;

    info!(request_id = %request_id, accident_id = %id, success = ?outcome.success, "updated accident");
    Ok(Json(outcome))
}

/// Handle DELETE /accidents/{id}.
async fn delete_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    path: Result<Path<String>, PathRejection>,
) -> HandlerResult<WriteOutcome> {
    let id = path_id(path, &request_id)?;
    let outcome = observe(
        Operation::DeleteAccident,
        &request_id,
        delete_accident(state.store(), &id),
    )
    .await?;

    info!(request_id = %request_id, accident_id = %id, success = ?outcome.success, "deleted accident");
    Ok(Json(outcome))
}

/// Take the accident id from the path, mapping rejections to a problem.
fn path_id(
    path: Result<Path<String>, PathRejection>,
    request_id: &RequestId,
) -> Result<String, ProblemDetails> {
    path.map(|Path(id)| id).map_err(|rejection| {
        warn!(request_id = %request_id, error = %rejection.body_text(), "rejected request path");
        path_rejection_problem(&rejection, request_id.as_str())
    })
}

/// Parse and validate a request body into an [`Accident`].
fn accident_from_body(
    payload: Result<Json<AccidentRequest>, JsonRejection>,
    request_id: &RequestId,
) -> Result<Accident, ProblemDetails> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(request_id = %request_id, error = %rejection.body_text(), "rejected request body");
        json_rejection_problem(&rejection, request_id.as_str())
    })?;

    request.validate(request_id.as_str()).map_err(|problem| {
        warn!(request_id = %request_id, error = %problem.error, "invalid accident");
        *problem
    })
}

/// Run one library operation, recording store metrics and logging failures.
///
/// The full cause is logged here; the caller only sees the problem built by
/// [`from_lib_error`].
async fn observe<T>(
    operation: Operation,
    request_id: &RequestId,
    call: impl Future<Output = acciresque_lib::Result<T>>,
) -> Result<T, ProblemDetails> {
    let start = Instant::now();
    let result = call.await;

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    record_store_call(operation, outcome, start.elapsed());

    result.map_err(|e| {
        match &e {
            LibError::NotFound { .. } | LibError::Validation { .. } => {
                warn!(request_id = %request_id, operation = %operation, error = %e, "request rejected");
            }
            _ => {
                error!(
                    request_id = %request_id,
                    operation = %operation,
                    kind = e.kind(),
                    error = %e,
                    "store call failed"
                );
            }
        }
        from_lib_error(&e, request_id.as_str())
    })
}
