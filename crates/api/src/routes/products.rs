use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use site_core::i18n::Locale;
use site_db::models::{NewProduct, Product, ProductChanges, ProductFilter};
use tracing::info;

use crate::{
    error::{ApiResult, AppError},
    state::AppState,
};

/// Storefront catalog: active products only.
pub fn public_router(state: AppState) -> Router {
    Router::new()
        .route("/api/products", get(list_public))
        .route("/api/products/{id}", get(get_public))
        .with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/products", get(list_admin).post(create_product))
        .route(
            "/api/admin/products/{id}",
            get(get_admin).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct PublicListQuery {
    category: Option<String>,
    featured: Option<bool>,
    locale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

fn requested_locale(locale: Option<&str>) -> Locale {
    locale.and_then(Locale::parse).unwrap_or_default()
}

/// Inactive products are hidden from the storefront.
fn storefront_product(product: Option<Product>, locale: Locale) -> Option<Product> {
    product
        .filter(|product| product.active)
        .map(|product| localize(product, locale))
}

/// Replaces the base name and description with the locale's variant when one exists.
fn localize(mut product: Product, locale: Locale) -> Product {
    let name = product.localized_name(locale).to_string();
    let description = product.localized_description(locale).to_string();
    product.name = name;
    product.description = description;
    product
}

#[derive(Debug, Default, Deserialize)]
struct AdminListQuery {
    category: Option<String>,
    active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateProductRequest {
    name: Option<String>,
    name_ar: Option<String>,
    name_fa: Option<String>,
    description: Option<String>,
    description_ar: Option<String>,
    description_fa: Option<String>,
    price_cents: Option<i64>,
    compare_at_price_cents: Option<i64>,
    sku: Option<String>,
    stock: Option<i32>,
    category: Option<String>,
    images: Option<Vec<String>>,
    featured: Option<bool>,
    active: Option<bool>,
}

impl CreateProductRequest {
    fn into_new_product(self) -> ApiResult<NewProduct> {
        let name = self.name.filter(|v| !v.trim().is_empty());
        let description = self.description.filter(|v| !v.trim().is_empty());
        let (Some(name), Some(description), Some(price_cents)) =
            (name, description, self.price_cents)
        else {
            return Err(AppError::BadRequest(
                "Name, description, and price are required".to_string(),
            ));
        };
        if price_cents < 0 {
            return Err(AppError::BadRequest("Price must not be negative".to_string()));
        }

        Ok(NewProduct {
            name,
            name_ar: self.name_ar,
            name_fa: self.name_fa,
            description,
            description_ar: self.description_ar,
            description_fa: self.description_fa,
            price_cents,
            compare_at_price_cents: self.compare_at_price_cents,
            sku: self.sku,
            stock: self.stock.unwrap_or(0),
            category: self.category,
            images: self.images.unwrap_or_default(),
            featured: self.featured.unwrap_or(false),
            active: self.active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Serialize)]
struct ProductListResponse {
    products: Vec<Product>,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    success: bool,
}

async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<PublicListQuery>,
) -> ApiResult<Json<ProductListResponse>> {
    let locale = requested_locale(query.locale.as_deref());
    let filter = ProductFilter {
        category: query.category.filter(|c| !c.is_empty()),
        active: Some(true),
        featured_only: query.featured.unwrap_or(false),
    };
    let products = site_db::queries::products::list(&state.db, &filter)
        .await?
        .into_iter()
        .map(|product| localize(product, locale))
        .collect();
    Ok(Json(ProductListResponse { products }))
}

async fn get_public(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Json<Product>> {
    let locale = requested_locale(query.locale.as_deref());
    let product = site_db::queries::products::find(&state.db, &id).await?;
    storefront_product(product, locale)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

async fn list_admin(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> ApiResult<Json<ProductListResponse>> {
    let filter = ProductFilter {
        category: query.category.filter(|c| !c.is_empty()),
        active: query.active,
        featured_only: false,
    };
    let products = site_db::queries::products::list(&state.db, &filter).await?;
    Ok(Json(ProductListResponse { products }))
}

async fn get_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    site_db::queries::products::get_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(payload) = payload?;
    let product = payload.into_new_product()?;
    let id = format!("prd_{}", nanoid::nanoid!(12));

    let product = site_db::queries::products::create(&state.db, &id, &product).await?;
    info!(product_id = %product.id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    changes: Result<Json<ProductChanges>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(changes) = changes?;
    if changes.price_cents.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("Price must not be negative".to_string()));
    }

    site_db::queries::products::update(&state.db, &id, &changes)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    if !site_db::queries::products::delete(&state.db, &id).await? {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    info!(product_id = %id, "product deleted");
    Ok(Json(DeleteResponse { success: true }))
}
