use site_core::config::Settings;
use site_core::webhook::Dispatcher;
use sqlx::PgPool;
use std::sync::Arc;

use crate::channels::email::EmailNotifier;
use crate::cms::CmsClient;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub settings: Arc<Settings>,
    pub dispatcher: Arc<Dispatcher>,
    pub email: Arc<EmailNotifier>,
    pub cms: CmsClient,
}

#[derive(Debug, Clone)]
pub struct RequestId(pub String);
