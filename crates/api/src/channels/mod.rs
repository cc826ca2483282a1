//! Concrete notification transports for CMS alerts.

pub mod email;
pub mod slack;
pub mod telegram;

use site_core::config::Settings;
use site_core::notify::{Delivery, NotifyError, Notifier};
use std::sync::Arc;

use self::email::EmailNotifier;
use self::slack::SlackNotifier;
use self::telegram::TelegramNotifier;

/// All alert channels in reporting order, plus the email channel for reuse.
pub fn build(
    settings: &Settings,
    client: &reqwest::Client,
) -> Result<(Vec<Arc<dyn Notifier>>, Arc<EmailNotifier>), NotifyError> {
    let email = Arc::new(EmailNotifier::new(client.clone(), settings.email.clone())?);
    let notifiers: Vec<Arc<dyn Notifier>> = vec![
        Arc::new(TelegramNotifier::new(client.clone(), settings.telegram.clone())),
        email.clone(),
        Arc::new(SlackNotifier::new(
            client.clone(),
            settings.slack_webhook_url.clone(),
        )),
    ];
    Ok((notifiers, email))
}

fn transport_error(err: reqwest::Error) -> NotifyError {
    // The Telegram URL embeds the bot token.
    NotifyError::Transport(err.without_url().to_string())
}

fn check_status(response: &reqwest::Response) -> Result<Delivery, NotifyError> {
    if response.status().is_success() {
        Ok(Delivery::Sent)
    } else {
        Err(NotifyError::Rejected {
            status: response.status().as_u16(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use axum::http::{HeaderMap, StatusCode, Uri};
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    pub struct Captured {
        pub path: String,
        pub headers: HeaderMap,
        pub body: serde_json::Value,
    }

    pub type Requests = Arc<Mutex<Vec<Captured>>>;

    /// Local HTTP endpoint recording every JSON request and answering `status`.
    pub async fn capture_server(status: StatusCode) -> (String, Requests) {
        let requests: Requests = Arc::default();
        let seen = requests.clone();
        let app = Router::new().fallback(
            move |uri: Uri, headers: HeaderMap, Json(body): Json<serde_json::Value>| {
                let seen = seen.clone();
                async move {
                    seen.lock().unwrap().push(Captured {
                        path: uri.path().to_string(),
                        headers,
                        body,
                    });
                    status
                }
            },
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_core::alerts::AlertChannel;
    use std::collections::HashMap;

    #[test]
    fn test_build_orders_channels() {
        let map: HashMap<String, String> =
            HashMap::from([("DATABASE_URL".to_string(), "postgres://x/y".to_string())]);
        let settings = Settings::from_lookup(|k| map.get(k).cloned()).unwrap();

        let (notifiers, _email) = build(&settings, &reqwest::Client::new()).unwrap();
        let channels: Vec<_> = notifiers.iter().map(|n| n.channel()).collect();

        assert_eq!(
            channels,
            vec![AlertChannel::Telegram, AlertChannel::Email, AlertChannel::Slack]
        );
    }
}
