use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use site_core::alerts::AlertChannel;
use site_core::webhook::{DispatchOutcome, WebhookError};
use tracing::{error, warn};

use crate::{error::AppError, state::AppState};

pub const SIGNATURE_HEADER: &str = "x-sanity-signature";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/sanity/webhook", post(receive))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct WebhookResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channels: Option<Vec<AlertChannel>>,
}

async fn receive(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = match state.dispatcher.dispatch(&body, signature).await {
        Ok(outcome) => outcome,
        Err(WebhookError::MissingSecret) => {
            error!("webhook received but SANITY_WEBHOOK_SECRET is not set");
            return AppError::Misconfigured("webhook secret not configured".to_string())
                .into_response();
        }
        Err(WebhookError::InvalidSignature) => {
            warn!(signed = signature.is_some(), "webhook signature rejected");
            return (
                StatusCode::UNAUTHORIZED,
                Json(WebhookResponse {
                    success: false,
                    duplicate: None,
                    channels: None,
                }),
            )
                .into_response();
        }
        Err(err @ WebhookError::InvalidPayload(_)) => {
            warn!(error = %err, "webhook payload rejected");
            return AppError::BadRequest(err.to_string()).into_response();
        }
    };

    let dispatched = match outcome {
        DispatchOutcome::Duplicate { .. } => {
            return Json(WebhookResponse {
                success: true,
                duplicate: Some(true),
                channels: None,
            })
            .into_response();
        }
        DispatchOutcome::Dispatched(dispatched) => dispatched,
    };

    // Channels already fired; a lost history row is logged, not surfaced.
    if let Err(err) = site_db::queries::alerts::upsert(&state.db, &dispatched.alert).await {
        error!(alert_id = %dispatched.alert.id, error = %err, "failed to persist alert");
    }

    Json(WebhookResponse {
        success: true,
        duplicate: None,
        channels: Some(dispatched.channels().to_vec()),
    })
    .into_response()
}
