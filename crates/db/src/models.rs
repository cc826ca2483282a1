use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use site_core::alerts::{AlertChannel, AlertEntry};
use site_core::i18n::Locale;
use site_core::types::OrderItem;
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminAlert {
    pub id: String,
    pub title: String,
    pub doc_type: String,
    pub event: String,
    pub locale: String,
    pub channels: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdminAlert> for AlertEntry {
    fn from(row: AdminAlert) -> Self {
        AlertEntry {
            id: row.id,
            title: row.title,
            doc_type: row.doc_type,
            event: row.event,
            locale: row.locale,
            channels: AlertChannel::parse_list(&row.channels),
            timestamp: row.created_at.to_rfc3339(),
            url: row.url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub name_ar: Option<String>,
    pub name_fa: Option<String>,
    pub description: String,
    pub description_ar: Option<String>,
    pub description_fa: Option<String>,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub sku: Option<String>,
    pub stock: i32,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub featured: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn localized_name(&self, locale: Locale) -> &str {
        localized(&self.name, &self.name_ar, &self.name_fa, locale)
    }

    pub fn localized_description(&self, locale: Locale) -> &str {
        localized(
            &self.description,
            &self.description_ar,
            &self.description_fa,
            locale,
        )
    }
}

fn localized<'a>(
    base: &'a str,
    ar: &'a Option<String>,
    fa: &'a Option<String>,
    locale: Locale,
) -> &'a str {
    let variant = match locale {
        Locale::En => None,
        Locale::Ar => ar.as_deref(),
        Locale::Fa => fa.as_deref(),
    };
    variant.filter(|text| !text.trim().is_empty()).unwrap_or(base)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub name_ar: Option<String>,
    pub name_fa: Option<String>,
    pub description: String,
    pub description_ar: Option<String>,
    pub description_fa: Option<String>,
    pub price_cents: i64,
    pub compare_at_price_cents: Option<i64>,
    pub sku: Option<String>,
    pub stock: i32,
    pub category: Option<String>,
    pub images: Vec<String>,
    pub featured: bool,
    pub active: bool,
}

/// Partial product update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    pub name: Option<String>,
    pub name_ar: Option<String>,
    pub name_fa: Option<String>,
    pub description: Option<String>,
    pub description_ar: Option<String>,
    pub description_fa: Option<String>,
    pub price_cents: Option<i64>,
    pub compare_at_price_cents: Option<i64>,
    pub sku: Option<String>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub active: Option<bool>,
    pub featured_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub total_cents: i64,
    pub status: OrderStatus,
    pub notes: String,
    pub items: Json<Vec<OrderItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub total_cents: i64,
    pub notes: String,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub locale: String,
    pub created_at: DateTime<Utc>,
}
