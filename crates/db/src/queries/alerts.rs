use crate::models::AdminAlert;
use site_core::alerts::{AlertChannel, AlertEntry};
use sqlx::PgPool;

/// Insert or refresh the durable row for an alert, keyed by its dedup key.
pub async fn upsert(pool: &PgPool, alert: &AlertEntry) -> Result<AdminAlert, sqlx::Error> {
    sqlx::query_as::<_, AdminAlert>(
        r#"
        INSERT INTO admin_alerts (id, title, doc_type, event, locale, channels, url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE
        SET title = EXCLUDED.title,
            doc_type = EXCLUDED.doc_type,
            event = EXCLUDED.event,
            locale = EXCLUDED.locale,
            channels = EXCLUDED.channels,
            url = EXCLUDED.url,
            updated_at = now()
        RETURNING id, title, doc_type, event, locale, channels, url,
                  created_at, updated_at
        "#,
    )
    .bind(&alert.id)
    .bind(&alert.title)
    .bind(&alert.doc_type)
    .bind(&alert.event)
    .bind(&alert.locale)
    .bind(AlertChannel::join(&alert.channels))
    .bind(alert.url.as_deref())
    .fetch_one(pool)
    .await
}

pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<AdminAlert>, sqlx::Error> {
    sqlx::query_as::<_, AdminAlert>(
        r#"
        SELECT id, title, doc_type, event, locale, channels, url,
               created_at, updated_at
        FROM admin_alerts
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
