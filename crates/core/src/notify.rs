//! Outbound notification channels and the settle-all fan-out over them.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::alerts::AlertChannel;
use crate::types::CmsDocument;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rejected with HTTP {status}")]
    Rejected { status: u16 },
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Message(String),
}

/// Result of a channel call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// The channel has no credentials configured; nothing was attempted.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Sent,
    Skipped,
    Failed(String),
}

impl ChannelOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ChannelOutcome::Sent)
    }
}

pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<Delivery, NotifyError>> + Send + 'a>>;

pub trait Notifier: Send + Sync {
    fn channel(&self) -> AlertChannel;

    fn send<'a>(&'a self, notice: &'a CmsNotice) -> NotifyFuture<'a>;
}

/// Normalised view of a CMS change, ready to render for each channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsNotice {
    pub document_id: String,
    pub doc_type: String,
    pub title: String,
    pub event: String,
    pub locale: String,
    pub slug: Option<String>,
    pub updated_at: String,
    pub studio_url: String,
}

impl CmsNotice {
    pub fn from_document(doc: &CmsDocument, public_url: &str) -> Self {
        let title = doc
            .title
            .clone()
            .or_else(|| doc.name.clone())
            .unwrap_or_else(|| doc.doc_type.clone());

        Self {
            document_id: doc.id.clone(),
            doc_type: doc.doc_type.clone(),
            title,
            event: doc.event_type.clone().unwrap_or_else(|| "update".to_string()),
            locale: doc.locale.clone().unwrap_or_else(|| "en".to_string()),
            slug: doc.slug.as_ref().map(|s| s.current.clone()),
            updated_at: doc.updated_at.clone(),
            studio_url: studio_url(public_url, &doc.doc_type, &doc.id),
        }
    }

    pub fn event_label(&self) -> String {
        self.event.to_uppercase()
    }

    pub fn telegram_text(&self) -> String {
        [
            format!("📢 <b>CMS {}</b>", escape_html(&self.event_label())),
            format!("<b>Type:</b> {}", escape_html(&self.doc_type)),
            format!("<b>Title:</b> {}", escape_html(&self.title)),
            format!("<b>Locale:</b> {}", escape_html(&self.locale)),
            format!("<b>Updated:</b> {}", escape_html(&format_timestamp(&self.updated_at))),
            self.studio_url.clone(),
        ]
        .join("\n")
    }

    pub fn email_subject(&self) -> String {
        format!("CMS {}: {}", self.event_label(), self.title)
    }

    pub fn email_html(&self) -> String {
        format!(
            "<h2>Sanity CMS {}</h2>\n\
             <p><strong>Type:</strong> {}</p>\n\
             <p><strong>Title:</strong> {}</p>\n\
             <p><strong>Locale:</strong> {}</p>\n\
             <p><strong>Updated:</strong> {}</p>\n\
             <p><a href=\"{}\">View in Studio</a></p>",
            escape_html(&self.event_label()),
            escape_html(&self.doc_type),
            escape_html(&self.title),
            escape_html(&self.locale),
            escape_html(&format_timestamp(&self.updated_at)),
            escape_html(&self.studio_url),
        )
    }

    pub fn slack_color(&self) -> &'static str {
        match self.event.as_str() {
            "create" => "#2ecc71",
            "update" => "#f1c40f",
            _ => "#e74c3c",
        }
    }

    pub fn slack_payload(&self) -> serde_json::Value {
        json!({
            "attachments": [{
                "color": self.slack_color(),
                "blocks": [
                    {
                        "type": "header",
                        "text": {
                            "type": "plain_text",
                            "text": format!("📢 CMS {} — {}", self.event_label(), self.title),
                        },
                    },
                    {
                        "type": "section",
                        "fields": [
                            { "type": "mrkdwn", "text": format!("*Type:*\n{}", self.doc_type) },
                            { "type": "mrkdwn", "text": format!("*Locale:*\n{}", self.locale) },
                        ],
                    },
                    {
                        "type": "section",
                        "text": {
                            "type": "mrkdwn",
                            "text": format!("<{}|View Document>", self.studio_url),
                        },
                    },
                    { "type": "divider" },
                ],
            }],
        })
    }
}

/// Deep link into the CMS editor for a document.
pub fn studio_url(public_url: &str, doc_type: &str, doc_id: &str) -> String {
    format!(
        "{}/studio/desk/{};{}",
        public_url.trim_end_matches('/'),
        doc_type,
        doc_id
    )
}

/// Human-readable UTC timestamp; input that is not RFC 3339 is returned verbatim.
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed
            .with_timezone(&Utc)
            .format("%B %-d, %Y at %-I:%M:%S %p UTC")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Attempts every channel concurrently and waits for all of them.
///
/// A failing or slow channel never cancels the others; each call is bounded by
/// `timeout` and its outcome is reported in the order of `notifiers`.
pub async fn fan_out(
    notifiers: &[Arc<dyn Notifier>],
    notice: &CmsNotice,
    timeout: Duration,
) -> Vec<(AlertChannel, ChannelOutcome)> {
    let attempts = notifiers.iter().map(|notifier| async move {
        let channel = notifier.channel();
        let outcome = match tokio::time::timeout(timeout, notifier.send(notice)).await {
            Ok(Ok(Delivery::Sent)) => ChannelOutcome::Sent,
            Ok(Ok(Delivery::Skipped)) => ChannelOutcome::Skipped,
            Ok(Err(err)) => ChannelOutcome::Failed(err.to_string()),
            Err(_) => ChannelOutcome::Failed(format!("timed out after {:?}", timeout)),
        };
        (channel, outcome)
    });

    futures_util::future::join_all(attempts).await
}
