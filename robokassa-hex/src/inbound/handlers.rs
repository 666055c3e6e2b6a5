//! HTTP request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use robokassa_types::{
    AppError, GatewayError, HealthResponse, PaymentRequest, PaymentUrlResponse, ResultOutcome,
};

use crate::{GatewayService, ResultRequestOptions};

/// Route the gateway delivers ResultURL callbacks to.
pub const RESULT_URL_PATH: &str = "/robokassa/result";

/// Route that returns a signed payment page URL.
pub const PAYMENT_URL_PATH: &str = "/api/payments/url";

/// Application state shared across handlers.
pub struct AppState {
    pub service: GatewayService,
    pub options: ResultRequestOptions,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
///
/// JSON body, for the merchant-facing API.
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Plain-text error for the gateway-facing ResultURL endpoint.
///
/// Internal failures are not described to the caller.
pub struct GatewayReply(pub AppError);

impl From<GatewayError> for GatewayReply {
    fn from(err: GatewayError) -> Self {
        GatewayReply(err.into())
    }
}

impl IntoResponse for GatewayReply {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::Internal(msg) => {
                tracing::error!("ResultURL processing failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
    })
}

/// Generate a signed payment page URL.
#[tracing::instrument(skip(state, req), fields(out_sum = %req.out_sum))]
pub async fn create_payment_url(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let url = state.service.payment_url(&req)?;
    Ok((StatusCode::CREATED, Json(PaymentUrlResponse { url })))
}

/// ResultURL callback delivered as a query string.
pub async fn result_url_query(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<HashMap<String, String>>,
) -> Result<Response, GatewayReply> {
    process(&state, raw).await
}

/// ResultURL callback delivered as a form body.
pub async fn result_url_form(
    State(state): State<Arc<AppState>>,
    Form(raw): Form<HashMap<String, String>>,
) -> Result<Response, GatewayReply> {
    process(&state, raw).await
}

async fn process(state: &AppState, raw: HashMap<String, String>) -> Result<Response, GatewayReply> {
    let outcome = state.service.process_result(&raw, &state.options).await?;

    Ok(match outcome {
        ResultOutcome::Acknowledged { body, .. } => (StatusCode::OK, body).into_response(),
        ResultOutcome::Suppressed { .. } => StatusCode::OK.into_response(),
    })
}
