use axum::{extract::Path, routing::get, Json, Router};
use serde::Serialize;
use site_core::i18n::{Locale, TextDirection};

use crate::{
    error::{ApiResult, AppError},
    state::AppState,
};

/// Locale context for every localized page, consumed by the rendering layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/{locale}", get(page_root))
        .route("/{locale}/{*rest}", get(page))
        .with_state(state)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct PageContext {
    locale: Locale,
    dir: TextDirection,
    path: String,
}

fn context(locale: &str, rest: &str) -> ApiResult<PageContext> {
    let locale =
        Locale::parse(locale).ok_or_else(|| AppError::NotFound("Page not found".to_string()))?;
    Ok(PageContext {
        locale,
        dir: locale.direction(),
        path: format!("/{}", rest),
    })
}

async fn page_root(Path(locale): Path<String>) -> ApiResult<Json<PageContext>> {
    context(&locale, "").map(Json)
}

async fn page(Path((locale, rest)): Path<(String, String)>) -> ApiResult<Json<PageContext>> {
    context(&locale, &rest).map(Json)
}
