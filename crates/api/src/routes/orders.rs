use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use site_core::orders::{
    generate_order_number, order_total, price_items, validate_lines, OrderError, OrderLine,
};
use site_db::models::{NewOrder, Order, OrderStatus};
use tracing::info;

use crate::{
    error::{ApiResult, AppError},
    state::AppState,
};

pub fn public_router(state: AppState) -> Router {
    Router::new()
        .route("/api/orders", post(create_order))
        .with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
    Router::new()
        .route("/api/admin/orders", get(list_orders))
        .route("/api/admin/orders/{id}", get(get_order).patch(update_order_status))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest {
    customer_name: Option<String>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    customer_address: Option<String>,
    notes: Option<String>,
    #[serde(default)]
    items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemRequest {
    product_id: Option<String>,
    quantity: Option<i32>,
}

struct Customer {
    name: String,
    email: String,
    phone: String,
    address: String,
    notes: String,
}

impl CreateOrderRequest {
    /// Splits the request into customer details and unpriced lines.
    ///
    /// Client-sent prices are never read; pricing comes from the catalog.
    fn into_parts(self) -> Result<(Customer, Vec<OrderLine>), OrderError> {
        let required = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let (Some(name), Some(email), Some(phone)) = (
            required(self.customer_name),
            required(self.customer_email),
            required(self.customer_phone),
        ) else {
            return Err(OrderError::MissingFields);
        };

        let lines: Vec<OrderLine> = self
            .items
            .into_iter()
            .map(|item| OrderLine {
                product_id: item.product_id.unwrap_or_default(),
                quantity: item.quantity.unwrap_or(0),
            })
            .collect();
        validate_lines(&lines)?;

        Ok((
            Customer {
                name,
                email,
                phone,
                address: self.customer_address.unwrap_or_default(),
                notes: self.notes.unwrap_or_default(),
            },
            lines,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: OrderStatus,
}

#[derive(Debug, Serialize)]
struct OrderListResponse {
    orders: Vec<Order>,
}

async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let Json(payload) = payload?;
    let (customer, lines) = payload.into_parts()?;

    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let product = site_db::queries::products::get_by_id(&state.db, &line.product_id)
            .await?
            .filter(|product| product.active)
            .ok_or_else(|| OrderError::UnavailableProduct(line.product_id.clone()))?;
        priced.push((line, product.price_cents));
    }

    let items = price_items(priced);
    let order = NewOrder {
        order_number: generate_order_number(),
        customer_name: customer.name,
        customer_email: customer.email,
        customer_phone: customer.phone,
        customer_address: customer.address,
        total_cents: order_total(&items),
        notes: customer.notes,
        items,
    };
    let id = format!("ord_{}", nanoid::nanoid!(12));

    let order = site_db::queries::orders::create(&state.db, &id, &order).await?;
    info!(order_id = %order.id, order_number = %order.order_number, total_cents = order.total_cents, "order created");
    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(State(state): State<AppState>) -> ApiResult<Json<OrderListResponse>> {
    let orders = site_db::queries::orders::list(&state.db).await?;
    Ok(Json(OrderListResponse { orders }))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    site_db::queries::orders::get_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Order>> {
    let Json(payload) = payload?;
    let order = site_db::queries::orders::update_status(&state.db, &id, payload.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
    info!(order_id = %order.id, status = ?order.status, "order status updated");
    Ok(Json(order))
}
