use site_core::alerts::AlertChannel;
use site_core::notify::{CmsNotice, Delivery, Notifier, NotifyFuture};

use super::{check_status, transport_error};

/// Posts alerts to a Slack incoming webhook.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

impl SlackNotifier {
    pub fn new(client: reqwest::Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }
}

impl Notifier for SlackNotifier {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Slack
    }

    fn send<'a>(&'a self, notice: &'a CmsNotice) -> NotifyFuture<'a> {
        Box::pin(async move {
            let Some(url) = self.webhook_url.as_deref() else {
                return Ok(Delivery::Skipped);
            };

            let response = self
                .client
                .post(url)
                .json(&notice.slack_payload())
                .send()
                .await
                .map_err(transport_error)?;

            check_status(&response)
        })
    }
}
