use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;
use site_core::alerts::AlertChannel;
use site_core::config::{EmailSettings, EmailTransport};
use site_core::notify::{CmsNotice, Delivery, Notifier, NotifyError, NotifyFuture};

use super::{check_status, transport_error};

const RESEND_API: &str = "https://api.resend.com";

enum Sender {
    Resend { api_key: String, base: String },
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
}

struct Configured {
    from: String,
    to: String,
    sender: Sender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SmtpSecurity {
    /// TLS from the first byte (usually port 465).
    Implicit,
    /// Plain connect, then a mandatory STARTTLS upgrade before AUTH.
    StartTls,
    Plain,
}

/// Credentials never travel over an unencrypted connection.
fn smtp_security(secure: bool, has_credentials: bool) -> SmtpSecurity {
    match (secure, has_credentials) {
        (true, _) => SmtpSecurity::Implicit,
        (false, true) => SmtpSecurity::StartTls,
        (false, false) => SmtpSecurity::Plain,
    }
}

/// Delivers HTML mail to the site operators, over Resend or plain SMTP.
pub struct EmailNotifier {
    client: reqwest::Client,
    configured: Option<Configured>,
}

impl EmailNotifier {
    pub fn new(client: reqwest::Client, settings: Option<EmailSettings>) -> Result<Self, NotifyError> {
        let configured = match settings {
            None => None,
            Some(settings) => {
                let sender = match settings.transport {
                    EmailTransport::Resend { api_key } => Sender::Resend {
                        api_key,
                        base: RESEND_API.to_string(),
                    },
                    EmailTransport::Smtp {
                        host,
                        port,
                        secure,
                        username,
                        password,
                    } => {
                        let credentials = match (username, password) {
                            (Some(user), Some(pass)) => Some(Credentials::new(user, pass)),
                            _ => None,
                        };

                        let relay_error =
                            |e: lettre::transport::smtp::Error| NotifyError::Transport(format!("SMTP relay error: {e}"));
                        let mut builder = match smtp_security(secure, credentials.is_some()) {
                            SmtpSecurity::Implicit => {
                                AsyncSmtpTransport::<Tokio1Executor>::relay(&host).map_err(relay_error)?
                            }
                            SmtpSecurity::StartTls => {
                                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
                                    .map_err(relay_error)?
                            }
                            SmtpSecurity::Plain => {
                                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host)
                            }
                        }
                        .port(port);

                        if let Some(credentials) = credentials {
                            builder = builder.credentials(credentials);
                        }

                        Sender::Smtp(builder.build())
                    }
                };
                Some(Configured {
                    from: settings.from,
                    to: settings.to,
                    sender,
                })
            }
        };

        Ok(Self { client, configured })
    }

    #[cfg(test)]
    fn with_resend_base(mut self, url: &str) -> Self {
        if let Some(Configured {
            sender: Sender::Resend { base, .. },
            ..
        }) = &mut self.configured
        {
            *base = url.to_string();
        }
        self
    }

    pub fn is_configured(&self) -> bool {
        self.configured.is_some()
    }

    /// Sends one HTML message to the configured recipient.
    pub async fn send_mail(&self, subject: String, html: String) -> Result<Delivery, NotifyError> {
        let Some(configured) = &self.configured else {
            return Ok(Delivery::Skipped);
        };

        match &configured.sender {
            Sender::Resend { api_key, base } => {
                let response = self
                    .client
                    .post(format!("{base}/emails"))
                    .bearer_auth(api_key)
                    .json(&json!({
                        "from": configured.from,
                        "to": [configured.to],
                        "subject": subject,
                        "html": html,
                    }))
                    .send()
                    .await
                    .map_err(transport_error)?;

                check_status(&response)
            }
            Sender::Smtp(transport) => {
                let email = Message::builder()
                    .from(configured.from.parse().map_err(|e| {
                        NotifyError::InvalidAddress(format!("from {}: {e}", configured.from))
                    })?)
                    .to(configured.to.parse().map_err(|e| {
                        NotifyError::InvalidAddress(format!("to {}: {e}", configured.to))
                    })?)
                    .subject(subject)
                    .header(ContentType::TEXT_HTML)
                    .body(html)
                    .map_err(|e| NotifyError::Message(e.to_string()))?;

                transport
                    .send(email)
                    .await
                    .map_err(|e| NotifyError::Transport(format!("SMTP send failed: {e}")))?;
                Ok(Delivery::Sent)
            }
        }
    }
}

impl Notifier for EmailNotifier {
    fn channel(&self) -> AlertChannel {
        AlertChannel::Email
    }

    fn send<'a>(&'a self, notice: &'a CmsNotice) -> NotifyFuture<'a> {
        Box::pin(self.send_mail(notice.email_subject(), notice.email_html()))
    }
}
