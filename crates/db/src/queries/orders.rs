use crate::models::{NewOrder, Order, OrderStatus};
use sqlx::types::Json;
use sqlx::PgPool;

pub async fn create(pool: &PgPool, id: &str, order: &NewOrder) -> Result<Order, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders
            (id, order_number, customer_name, customer_email, customer_phone,
             customer_address, total_cents, notes, items)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, order_number, customer_name, customer_email, customer_phone,
                  customer_address, total_cents, status, notes, items,
                  created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&order.order_number)
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(&order.customer_phone)
    .bind(&order.customer_address)
    .bind(order.total_cents)
    .bind(&order.notes)
    .bind(Json(&order.items))
    .fetch_one(pool)
    .await
}

pub async fn get_by_id(pool: &PgPool, id: &str) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        r#"
        SELECT id, order_number, customer_name, customer_email, customer_phone,
               customer_address, total_cents, status, notes, items,
               created_at, updated_at
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        r#"
        SELECT id, order_number, customer_name, customer_email, customer_phone,
               customer_address, total_cents, status, notes, items,
               created_at, updated_at
        FROM orders
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: &str,
    status: OrderStatus,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders
        SET status = $1, updated_at = now()
        WHERE id = $2
        RETURNING id, order_number, customer_name, customer_email, customer_phone,
                  customer_address, total_cents, status, notes, items,
                  created_at, updated_at
        "#,
    )
    .bind(status)
    .bind(id)
    .fetch_optional(pool)
    .await
}
