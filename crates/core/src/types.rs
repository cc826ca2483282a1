use serde::{Deserialize, Serialize};

/// Change notification posted by the CMS for a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type")]
    pub doc_type: String,
    #[serde(rename = "_createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "_updatedAt")]
    pub updated_at: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(rename = "_eventType", default)]
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slug {
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub quantity: i32,
    pub price_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cms_document_minimal() {
        let body = r#"{"_id":"doc1","_type":"newsPost","_updatedAt":"2024-01-01T00:00:00Z","title":"Hello"}"#;
        let doc: CmsDocument = serde_json::from_str(body).unwrap();

        assert_eq!(doc.id, "doc1");
        assert_eq!(doc.doc_type, "newsPost");
        assert_eq!(doc.updated_at, "2024-01-01T00:00:00Z");
        assert_eq!(doc.title.as_deref(), Some("Hello"));
        assert!(doc.created_at.is_none());
        assert!(doc.event_type.is_none());
    }

    #[test]
    fn test_cms_document_full() {
        let body = r#"{
            "_id": "drafts.div-1",
            "_type": "division",
            "_createdAt": "2024-01-01T00:00:00Z",
            "_updatedAt": "2024-02-01T10:30:00Z",
            "name": "Auto Parts",
            "slug": {"_type": "slug", "current": "auto-parts"},
            "locale": "ar",
            "_eventType": "create"
        }"#;
        let doc: CmsDocument = serde_json::from_str(body).unwrap();

        assert_eq!(doc.slug.unwrap().current, "auto-parts");
        assert_eq!(doc.locale.as_deref(), Some("ar"));
        assert_eq!(doc.event_type.as_deref(), Some("create"));
        assert_eq!(doc.name.as_deref(), Some("Auto Parts"));
    }

    #[test]
    fn test_cms_document_requires_id_and_updated_at() {
        assert!(serde_json::from_str::<CmsDocument>(r#"{"_type":"page","_updatedAt":"x"}"#).is_err());
        assert!(serde_json::from_str::<CmsDocument>(r#"{"_id":"a","_type":"page"}"#).is_err());
    }

    #[test]
    fn test_order_item_camel_case() {
        let item = OrderItem {
            id: "item-0".to_string(),
            product_id: "prd_1".to_string(),
            quantity: 2,
            price_cents: 1500,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], "prd_1");
        assert_eq!(json["priceCents"], 1500);
    }
}
