use axum::{extract::State, routing::get, Json, Router};
use tracing::error;

use crate::{cms::DashboardCounts, error::{AppError, ApiResult}, state::AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/dashboard", get(dashboard))
        .with_state(state)
}

async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardCounts>> {
    let counts = state.cms.dashboard_counts().await.map_err(|err| {
        error!(error = %err, "failed to load dashboard counts");
        AppError::Upstream("content service unavailable".to_string())
    })?;
    Ok(Json(counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unconfigured_cms_reports_zeros() {
        let state = testing::state(testing::settings(&[]), Vec::new());
        let resp = router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/admin/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "companyInfo": 0,
                "divisions": 0,
                "newsPosts": 0,
                "pages": 0,
                "lastUpdated": null,
            })
        );
    }
}
