use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use site_core::alerts::{merge_recent, AlertEntry, RECENT_ALERTS_CAPACITY};
use tracing::warn;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/alerts", get(list_alerts))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct AlertListResponse {
    alerts: Vec<AlertEntry>,
}

/// Live alerts from this process first, then durable history.
async fn list_alerts(State(state): State<AppState>) -> Json<AlertListResponse> {
    let memory = state.dispatcher.recent_alerts();

    let durable =
        match site_db::queries::alerts::list_recent(&state.db, RECENT_ALERTS_CAPACITY as i64).await {
            Ok(rows) => rows.into_iter().map(AlertEntry::from).collect(),
            Err(err) => {
                warn!(error = %err, "alert history unavailable, serving in-memory alerts");
                Vec::new()
            }
        };

    Json(AlertListResponse {
        alerts: merge_recent(memory, durable, RECENT_ALERTS_CAPACITY),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use site_core::auth::sign_payload;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_falls_back_to_memory_when_db_down() {
        let state = testing::state(
            testing::settings(&[("SANITY_WEBHOOK_SECRET", "s3cret")]),
            Vec::new(),
        );
        let body = br#"{"_id":"doc1","_type":"page","_updatedAt":"2024-05-05T10:00:00Z","name":"About"}"#;
        let signature = sign_payload("s3cret", body);
        state
            .dispatcher
            .dispatch(body, Some(&signature))
            .await
            .unwrap();

        let resp = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/admin/alerts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let alerts = value["alerts"].as_array().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0]["id"], "doc1:2024-05-05T10:00:00Z");
        assert_eq!(alerts[0]["title"], "About");
        assert_eq!(alerts[0]["type"], "page");
        assert_eq!(alerts[0]["channels"], serde_json::json!([]));
    }
}
