use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub site_env: String,
    pub api_bind: String,
    pub public_url: String,
    pub channel_timeout_secs: u64,
    pub webhook_secret: Option<String>,
    pub telegram: Option<TelegramSettings>,
    pub slack_webhook_url: Option<String>,
    pub email: Option<EmailSettings>,
    pub admin: Option<AdminCredentials>,
    pub sanity: Option<SanitySettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub from: String,
    pub to: String,
    pub transport: EmailTransport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailTransport {
    Resend {
        api_key: String,
    },
    Smtp {
        host: String,
        port: u16,
        secure: bool,
        username: Option<String>,
        password: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitySettings {
    pub project_id: String,
    pub dataset: String,
    pub api_token: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("SITE_DATABASE_URL")
            .or_else(|| var("DATABASE_URL"))
            .ok_or(ConfigError::Missing("DATABASE_URL or SITE_DATABASE_URL"))?;
        let site_env = var("SITE_ENV").unwrap_or_else(|| "development".to_string());
        let api_bind = var("SITE_API_BIND").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let public_url = var("SITE_PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "http://localhost:3000".to_string());
        let channel_timeout_secs = match var("SITE_CHANNEL_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .ok()
                .filter(|secs: &u64| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "SITE_CHANNEL_TIMEOUT_SECS",
                    value,
                })?,
            None => 10,
        };

        let telegram = match (var("TELEGRAM_BOT_TOKEN"), var("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramSettings { bot_token, chat_id }),
            _ => None,
        };

        let email = match (var("ALERTS_FROM_EMAIL"), var("ALERTS_TO_EMAIL")) {
            (Some(from), Some(to)) => {
                let transport = match var("RESEND_API_KEY") {
                    Some(api_key) => EmailTransport::Resend { api_key },
                    None => {
                        let port = match var("SMTP_PORT") {
                            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                                key: "SMTP_PORT",
                                value,
                            })?,
                            None => 587,
                        };
                        EmailTransport::Smtp {
                            host: var("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
                            port,
                            secure: var("SMTP_SECURE").as_deref() == Some("true"),
                            username: var("SMTP_USER"),
                            password: var("SMTP_PASS"),
                        }
                    }
                };
                Some(EmailSettings { from, to, transport })
            }
            _ => None,
        };

        let admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            _ => None,
        };

        let sanity = match (var("SANITY_PROJECT_ID"), var("SANITY_DATASET")) {
            (Some(project_id), Some(dataset)) if is_valid_project_id(&project_id) => {
                Some(SanitySettings {
                    project_id,
                    dataset,
                    api_token: var("SANITY_API_TOKEN"),
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            site_env,
            api_bind,
            public_url,
            channel_timeout_secs,
            webhook_secret: var("SANITY_WEBHOOK_SECRET"),
            telegram,
            slack_webhook_url: var("SLACK_WEBHOOK_URL"),
            email,
            admin,
            sanity,
        })
    }

    pub fn channel_timeout(&self) -> Duration {
        Duration::from_secs(self.channel_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.site_env == "production"
    }
}

fn is_valid_project_id(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_database_url_required() {
        let err = settings(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[("DATABASE_URL", "postgres://localhost/site")]).unwrap();
        assert_eq!(s.site_env, "development");
        assert_eq!(s.api_bind, "0.0.0.0:3000");
        assert_eq!(s.public_url, "http://localhost:3000");
        assert_eq!(s.channel_timeout(), Duration::from_secs(10));
        assert!(s.webhook_secret.is_none());
        assert!(s.telegram.is_none());
        assert!(s.slack_webhook_url.is_none());
        assert!(s.email.is_none());
        assert!(s.admin.is_none());
        assert!(s.sanity.is_none());
    }

    #[test]
    fn test_site_database_url_preferred() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://a/db"),
            ("SITE_DATABASE_URL", "postgres://b/db"),
        ])
        .unwrap();
        assert_eq!(s.database_url, "postgres://b/db");
    }

    #[test]
    fn test_blank_values_are_unset() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/site"),
            ("SANITY_WEBHOOK_SECRET", "  "),
        ])
        .unwrap();
        assert!(s.webhook_secret.is_none());
    }

    #[test]
    fn test_telegram_needs_token_and_chat() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/site"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ])
        .unwrap();
        assert!(s.telegram.is_none());
    }

    #[test]
    fn test_resend_preferred_over_smtp() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/site"),
            ("ALERTS_FROM_EMAIL", "alerts@amertrading.com"),
            ("ALERTS_TO_EMAIL", "ops@amertrading.com"),
            ("RESEND_API_KEY", "re_123"),
            ("SMTP_HOST", "smtp.example.com"),
        ])
        .unwrap();
        let email = s.email.unwrap();
        assert_eq!(
            email.transport,
            EmailTransport::Resend {
                api_key: "re_123".to_string()
            }
        );
    }

    #[test]
    fn test_smtp_settings() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/site"),
            ("ALERTS_FROM_EMAIL", "alerts@amertrading.com"),
            ("ALERTS_TO_EMAIL", "ops@amertrading.com"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_SECURE", "true"),
            ("SMTP_USER", "mailer"),
        ])
        .unwrap();
        assert_eq!(
            s.email.unwrap().transport,
            EmailTransport::Smtp {
                host: "smtp.example.com".to_string(),
                port: 465,
                secure: true,
                username: Some("mailer".to_string()),
                password: None,
            }
        );
    }

    #[test]
    fn test_invalid_smtp_port() {
        let err = settings(&[
            ("DATABASE_URL", "postgres://localhost/site"),
            ("ALERTS_FROM_EMAIL", "a@b.c"),
            ("ALERTS_TO_EMAIL", "d@e.f"),
            ("SMTP_PORT", "smtp"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "SMTP_PORT", .. }));
    }

    #[test]
    fn test_invalid_channel_timeout() {
        for value in ["0", "soon"] {
            let err = settings(&[
                ("DATABASE_URL", "postgres://localhost/site"),
                ("SITE_CHANNEL_TIMEOUT_SECS", value),
            ])
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { .. }));
        }
    }

    #[test]
    fn test_public_url_trailing_slash_trimmed() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/site"),
            ("SITE_PUBLIC_URL", "https://amertrading.com/"),
        ])
        .unwrap();
        assert_eq!(s.public_url, "https://amertrading.com");
    }

    #[test]
    fn test_sanity_project_id_validated() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/site"),
            ("SANITY_PROJECT_ID", "Bad_Project"),
            ("SANITY_DATASET", "production"),
        ])
        .unwrap();
        assert!(s.sanity.is_none());

        let s = settings(&[
            ("DATABASE_URL", "postgres://localhost/site"),
            ("SANITY_PROJECT_ID", "abc123-x"),
            ("SANITY_DATASET", "production"),
        ])
        .unwrap();
        assert_eq!(s.sanity.unwrap().project_id, "abc123-x");
    }
}
