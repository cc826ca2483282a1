use serde_json::json;
use site_core::alerts::AlertChannel;
use site_core::config::TelegramSettings;
use site_core::notify::{CmsNotice, Delivery, Notifier, NotifyFuture};

use super::{check_status, transport_error};

const TELEGRAM_API: &str = "https://api.telegram.org";

/// Posts alerts to a chat through the Telegram Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    settings: Option<TelegramSettings>,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, settings: Option<TelegramSettings>) -> Self {
        Self {
            client,
            settings,
            api_base: TELEGRAM_API.to_string(),
        }
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }
}

impl Notifier for TelegramNotifier {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Telegram
    }

    fn send<'a>(&'a self, notice: &'a CmsNotice) -> NotifyFuture<'a> {
        Box::pin(async move {
            let Some(settings) = &self.settings else {
                return Ok(Delivery::Skipped);
            };

            let url = format!("{}/bot{}/sendMessage", self.api_base, settings.bot_token);
            let response = self
                .client
                .post(&url)
                .json(&json!({
                    "chat_id": settings.chat_id,
                    "text": notice.telegram_text(),
                    "parse_mode": "HTML",
                }))
                .send()
                .await
                .map_err(transport_error)?;

            check_status(&response)
        })
    }
}
