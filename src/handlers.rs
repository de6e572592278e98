use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};

use crate::{
    errors::AppError,
    models::{
        CarInfoRequest, CodeRequest, DiagnoseRequest, PartSearchRequest, RequestKind,
        ResultResponse, StatusResponse,
    },
    state::AppState,
    validate::{self, ValidationError},
};

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => AppError::Internal(format!("metrics render failed: {error}")).into_response(),
    }
}

pub async fn status(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let status = state.service.status().await;
    info!(backend = state.service.backend_name(), ?status, "status requested");

    let response = Json(StatusResponse { status }).into_response();
    state.metrics.observe_request(
        "/status",
        "GET",
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}

pub async fn diagnose(
    State(state): State<AppState>,
    payload: Result<Json<DiagnoseRequest>, JsonRejection>,
) -> Response {
    let kind = read_body(payload)
        .and_then(|request| validate::diagnose(request.problem.as_deref().unwrap_or_default()));
    run_generation(&state, "/diagnose", "Ошибка при диагностике", kind).await
}

pub async fn code(
    State(state): State<AppState>,
    payload: Result<Json<CodeRequest>, JsonRejection>,
) -> Response {
    let kind = read_body(payload)
        .and_then(|request| validate::obd_code(request.code.as_deref().unwrap_or_default()));
    run_generation(&state, "/code", "Ошибка при расшифровке кода", kind).await
}

pub async fn part_search(
    State(state): State<AppState>,
    payload: Result<Json<PartSearchRequest>, JsonRejection>,
) -> Response {
    let kind = read_body(payload).and_then(|request| {
        validate::part_fields(request.part_name.as_deref(), request.car_model.as_deref())
    });
    run_generation(&state, "/part-search", "Ошибка при поиске запчастей", kind).await
}

pub async fn car_info(
    State(state): State<AppState>,
    payload: Result<Json<CarInfoRequest>, JsonRejection>,
) -> Response {
    let kind = read_body(payload)
        .and_then(|request| validate::car_info(request.car_model.as_deref().unwrap_or_default()));
    run_generation(&state, "/car-info", "Ошибка при получении информации", kind).await
}

fn read_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ValidationError> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))
}

async fn run_generation(
    state: &AppState,
    path: &'static str,
    failure_message: &'static str,
    kind: Result<RequestKind, ValidationError>,
) -> Response {
    let started = Instant::now();

    let response = match process_generation(state, path, failure_message, kind).await {
        Ok(response) => response,
        Err(error) => error.into_response(),
    };

    state.metrics.observe_request(
        path,
        "POST",
        response.status().as_u16(),
        started.elapsed(),
    );

    response
}

async fn process_generation(
    state: &AppState,
    path: &'static str,
    failure_message: &'static str,
    kind: Result<RequestKind, ValidationError>,
) -> Result<Response, AppError> {
    let kind = kind.inspect_err(|error| {
        debug!(path, error = %error, "request rejected by validation");
    })?;

    let result = state
        .service
        .handle(&kind)
        .await
        .map_err(|_| AppError::Backend(failure_message.to_owned()))?;

    Ok(Json(ResultResponse { result }).into_response())
}
