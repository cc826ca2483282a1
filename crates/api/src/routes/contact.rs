use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use site_core::i18n::Locale;
use site_core::notify::{escape_html, Delivery};
use tracing::{info, warn};

use crate::{
    error::{ApiResult, AppError},
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/contact", post(submit))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ContactRequest {
    name: Option<String>,
    email: Option<String>,
    message: Option<String>,
    locale: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactResponse {
    success: bool,
}

fn email_html(name: &str, email: &str, locale: Locale, message: &str) -> String {
    format!(
        "<h2>New contact message</h2>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Locale:</strong> {}</p>\n\
         <p>{}</p>",
        escape_html(name),
        escape_html(email),
        locale,
        escape_html(message).replace('\n', "<br>"),
    )
}

async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> ApiResult<Json<ContactResponse>> {
    let Json(payload) = payload?;
    let required = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let (Some(name), Some(email), Some(message)) = (
        required(payload.name),
        required(payload.email),
        required(payload.message),
    ) else {
        return Err(AppError::BadRequest("Missing fields".to_string()));
    };
    let locale = payload
        .locale
        .as_deref()
        .and_then(Locale::parse)
        .unwrap_or_default();

    let id = format!("msg_{}", nanoid::nanoid!(12));
    site_db::queries::contact_messages::create(
        &state.db,
        &id,
        &name,
        &email,
        &message,
        locale.as_str(),
    )
    .await?;
    info!(message_id = %id, %locale, "contact message stored");

    let subject = format!("Contact form: {}", name);
    match state
        .email
        .send_mail(subject, email_html(&name, &email, locale, &message))
        .await
    {
        Ok(Delivery::Sent) => info!(message_id = %id, "contact email sent"),
        Ok(Delivery::Skipped) => {}
        Err(err) => warn!(message_id = %id, error = %err, "contact email failed"),
    }

    Ok(Json(ContactResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_email_html_escapes_input() {
        let html = email_html("<b>Ali</b>", "ali@example.com", Locale::Ar, "line one\nline two");
        assert!(html.contains("&lt;b&gt;Ali&lt;/b&gt;"));
        assert!(html.contains("<strong>Locale:</strong> ar"));
        assert!(html.contains("line one<br>line two"));
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_shape() {
        let state = testing::state(testing::settings(&[]), Vec::new());
        let resp = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Ali","#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let state = testing::state(testing::settings(&[]), Vec::new());
        let resp = router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contact")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Ali","email":"ali@example.com","message":"   "}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error"]["message"], "Missing fields");
    }
}
