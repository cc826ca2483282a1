pub mod alerts;
pub mod contact;
pub mod dashboard;
pub mod health;
pub mod orders;
pub mod pages;
pub mod products;
pub mod webhook;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use tower::Layer;

use crate::middleware::{admin_auth::require_admin, locale::route_locale, request_id::request_id};
use crate::state::AppState;

/// Everything under `/api/admin`, behind HTTP Basic auth.
pub fn admin_router(state: AppState) -> Router {
    Router::new()
        .merge(alerts::router(state.clone()))
        .merge(dashboard::router(state.clone()))
        .merge(products::admin_router(state.clone()))
        .merge(orders::admin_router(state.clone()))
        .layer(from_fn_with_state(state, require_admin))
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router(state.clone()))
        .merge(webhook::router(state.clone()))
        .merge(products::public_router(state.clone()))
        .merge(orders::public_router(state.clone()))
        .merge(contact::router(state.clone()))
        .merge(admin_router(state.clone()))
        .merge(pages::router(state))
}

/// The served application.
///
/// Locale routing wraps the matched router so a rewrite changes the URI that
/// routes are matched against. The request id sits outside both, so locale
/// redirects carry it too.
pub fn app(state: AppState) -> Router {
    Router::new()
        .fallback_service(from_fn(route_locale).layer(api_router(state)))
        .layer(from_fn(request_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::request_id::REQUEST_ID_HEADER;
    use crate::state::testing;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(testing::state(
            testing::settings(&[("ADMIN_USERNAME", "admin"), ("ADMIN_PASSWORD", "pw")]),
            Vec::new(),
        ))
    }

    #[tokio::test]
    async fn test_health_carries_request_id() {
        let resp = test_app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_admin_routes_require_auth() {
        for uri in [
            "/api/admin/alerts",
            "/api/admin/dashboard",
            "/api/admin/products",
            "/api/admin/orders",
            "/api/admin/orders/ord_1",
        ] {
            let resp = test_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
        }
    }

    #[tokio::test]
    async fn test_locale_redirect_carries_request_id() {
        let resp = test_app()
            .oneshot(
                Request::builder()
                    .uri("/about")
                    .header(header::HOST, "amertrading.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers()[header::LOCATION], "/en/about");
        assert!(resp.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .starts_with("req_"));
    }

    #[tokio::test]
    async fn test_subdomain_rewrite_reaches_division_page() {
        let resp = test_app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::HOST, "food.amertrading.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "locale": "en", "dir": "ltr", "path": "/divisions/food-markets" })
        );
    }

    #[tokio::test]
    async fn test_public_routes_are_open() {
        let resp = test_app()
            .oneshot(Request::builder().uri("/en/about").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
