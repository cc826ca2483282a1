use crate::models::{NewProduct, Product, ProductChanges, ProductFilter};
use sqlx::{PgPool, QueryBuilder};

const PRODUCT_COLUMNS: &str = "id, name, name_ar, name_fa, description, description_ar, \
     description_fa, price_cents, compare_at_price_cents, sku, stock, category, images, \
     featured, active, created_at, updated_at";

pub async fn create(pool: &PgPool, id: &str, product: &NewProduct) -> Result<Product, sqlx::Error> {
    let mut qb = QueryBuilder::new(
        "INSERT INTO products (id, name, name_ar, name_fa, description, description_ar, \
         description_fa, price_cents, compare_at_price_cents, sku, stock, category, images, \
         featured, active) ",
    );
    qb.push_values(std::iter::once(product), |mut row, p| {
        row.push_bind(id)
            .push_bind(&p.name)
            .push_bind(&p.name_ar)
            .push_bind(&p.name_fa)
            .push_bind(&p.description)
            .push_bind(&p.description_ar)
            .push_bind(&p.description_fa)
            .push_bind(p.price_cents)
            .push_bind(p.compare_at_price_cents)
            .push_bind(&p.sku)
            .push_bind(p.stock)
            .push_bind(&p.category)
            .push_bind(&p.images)
            .push_bind(p.featured)
            .push_bind(p.active);
    });
    qb.push(" RETURNING ").push(PRODUCT_COLUMNS);

    qb.build_query_as::<Product>().fetch_one(pool).await
}

pub async fn get_by_id(pool: &PgPool, id: &str) -> Result<Option<Product>, sqlx::Error> {
    let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
    sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_active_by_sku(pool: &PgPool, sku: &str) -> Result<Option<Product>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM products WHERE sku = $1 AND active = true \
         ORDER BY created_at DESC LIMIT 1",
        PRODUCT_COLUMNS
    );
    sqlx::query_as::<_, Product>(&sql)
        .bind(sku)
        .fetch_optional(pool)
        .await
}

/// Lookup by id first, then by SKU among active products.
pub async fn find(pool: &PgPool, id_or_sku: &str) -> Result<Option<Product>, sqlx::Error> {
    match get_by_id(pool, id_or_sku).await? {
        Some(product) => Ok(Some(product)),
        None => get_active_by_sku(pool, id_or_sku).await,
    }
}

pub async fn list(pool: &PgPool, filter: &ProductFilter) -> Result<Vec<Product>, sqlx::Error> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(PRODUCT_COLUMNS).push(" FROM products WHERE true");

    if let Some(active) = filter.active {
        qb.push(" AND active = ").push_bind(active);
    }
    if let Some(category) = filter.category.as_deref() {
        qb.push(" AND category = ").push_bind(category);
    }
    if filter.featured_only {
        qb.push(" AND featured = true");
    }
    qb.push(" ORDER BY created_at DESC");

    qb.build_query_as::<Product>().fetch_all(pool).await
}

/// Applies the provided changes; returns `None` when the product does not exist.
pub async fn update(
    pool: &PgPool,
    id: &str,
    changes: &ProductChanges,
) -> Result<Option<Product>, sqlx::Error> {
    let mut qb = QueryBuilder::new("UPDATE products SET ");
    let mut set = qb.separated(", ");

    if let Some(value) = &changes.name {
        set.push("name = ").push_bind_unseparated(value);
    }
    if let Some(value) = &changes.name_ar {
        set.push("name_ar = ").push_bind_unseparated(value);
    }
    if let Some(value) = &changes.name_fa {
        set.push("name_fa = ").push_bind_unseparated(value);
    }
    if let Some(value) = &changes.description {
        set.push("description = ").push_bind_unseparated(value);
    }
    if let Some(value) = &changes.description_ar {
        set.push("description_ar = ").push_bind_unseparated(value);
    }
    if let Some(value) = &changes.description_fa {
        set.push("description_fa = ").push_bind_unseparated(value);
    }
    if let Some(value) = changes.price_cents {
        set.push("price_cents = ").push_bind_unseparated(value);
    }
    if let Some(value) = changes.compare_at_price_cents {
        set.push("compare_at_price_cents = ").push_bind_unseparated(value);
    }
    if let Some(value) = &changes.sku {
        set.push("sku = ").push_bind_unseparated(value);
    }
    if let Some(value) = changes.stock {
        set.push("stock = ").push_bind_unseparated(value);
    }
    if let Some(value) = &changes.category {
        set.push("category = ").push_bind_unseparated(value);
    }
    if let Some(value) = &changes.images {
        set.push("images = ").push_bind_unseparated(value);
    }
    if let Some(value) = changes.featured {
        set.push("featured = ").push_bind_unseparated(value);
    }
    if let Some(value) = changes.active {
        set.push("active = ").push_bind_unseparated(value);
    }

    set.push("updated_at = now()");
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING ").push(PRODUCT_COLUMNS);

    qb.build_query_as::<Product>().fetch_optional(pool).await
}

/// Returns `true` if a row was deleted.
pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
