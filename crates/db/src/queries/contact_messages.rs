use crate::models::ContactMessage;
use sqlx::PgPool;

pub async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    email: &str,
    message: &str,
    locale: &str,
) -> Result<ContactMessage, sqlx::Error> {
    sqlx::query_as::<_, ContactMessage>(
        r#"
        INSERT INTO contact_messages (id, name, email, message, locale)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, message, locale, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(message)
    .bind(locale)
    .fetch_one(pool)
    .await
}
