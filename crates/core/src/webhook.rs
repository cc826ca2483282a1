//! CMS change webhook: authenticate, deduplicate, fan out, remember.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::alerts::{AlertChannel, AlertEntry, RecentAlerts};
use crate::auth::verify_signature;
use crate::dedup::{dedup_key, RecentEvents};
use crate::notify::{fan_out, ChannelOutcome, CmsNotice, Notifier};
use crate::types::CmsDocument;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook secret is not configured")]
    MissingSecret,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

#[derive(Debug)]
pub enum DispatchOutcome {
    Duplicate { key: String },
    Dispatched(Dispatched),
}

#[derive(Debug)]
pub struct Dispatched {
    pub alert: AlertEntry,
    pub outcomes: Vec<(AlertChannel, ChannelOutcome)>,
}

impl Dispatched {
    /// Channels that accepted the notification.
    pub fn channels(&self) -> &[AlertChannel] {
        &self.alert.channels
    }
}

/// Owns the recent-event cache and the recent-alert buffer for one process.
///
/// Both are in-memory only; with several instances each one deduplicates on
/// its own and the durable alert table is the shared record.
pub struct Dispatcher {
    secret: Option<String>,
    public_url: String,
    notifiers: Vec<Arc<dyn Notifier>>,
    channel_timeout: Duration,
    recent_events: Mutex<RecentEvents>,
    recent_alerts: Mutex<RecentAlerts>,
}

impl Dispatcher {
    pub fn new(
        secret: Option<String>,
        public_url: impl Into<String>,
        notifiers: Vec<Arc<dyn Notifier>>,
        channel_timeout: Duration,
    ) -> Self {
        Self {
            secret,
            public_url: public_url.into(),
            notifiers,
            channel_timeout,
            recent_events: Mutex::new(RecentEvents::default()),
            recent_alerts: Mutex::new(RecentAlerts::default()),
        }
    }

    /// Verifies `signature` over the raw `body` and decodes the document.
    pub fn authenticate(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<CmsDocument, WebhookError> {
        let secret = self.secret.as_deref().ok_or(WebhookError::MissingSecret)?;
        if !verify_signature(secret, body, signature) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(serde_json::from_slice(body)?)
    }

    pub async fn dispatch(
        &self,
        body: &[u8],
        signature: Option<&str>,
    ) -> Result<DispatchOutcome, WebhookError> {
        let doc = self.authenticate(body, signature)?;

        let key = dedup_key(&doc.id, &doc.updated_at);
        let fresh = self.events().insert(&key);
        if !fresh {
            info!(%key, "duplicate cms event");
            return Ok(DispatchOutcome::Duplicate { key });
        }

        let notice = CmsNotice::from_document(&doc, &self.public_url);
        let outcomes = fan_out(&self.notifiers, &notice, self.channel_timeout).await;

        for (channel, outcome) in &outcomes {
            match outcome {
                ChannelOutcome::Sent => info!(%key, %channel, "notification sent"),
                ChannelOutcome::Skipped => debug!(%key, %channel, "channel not configured"),
                ChannelOutcome::Failed(error) => {
                    warn!(%key, %channel, %error, "notification failed")
                }
            }
        }

        let mut channels: Vec<AlertChannel> = outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_sent())
            .map(|(channel, _)| *channel)
            .collect();
        channels.sort();

        let alert = AlertEntry {
            id: key,
            title: notice.title,
            doc_type: notice.doc_type,
            event: notice.event,
            locale: notice.locale,
            channels,
            timestamp: notice.updated_at,
            url: Some(notice.studio_url),
        };
        self.alerts().push(alert.clone());

        Ok(DispatchOutcome::Dispatched(Dispatched { alert, outcomes }))
    }

    pub fn recent_alerts(&self) -> Vec<AlertEntry> {
        self.alerts().snapshot()
    }

    fn events(&self) -> MutexGuard<'_, RecentEvents> {
        self.recent_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn alerts(&self) -> MutexGuard<'_, RecentAlerts> {
        self.recent_alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
