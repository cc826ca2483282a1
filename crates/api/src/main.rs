use site_core::config::Settings;
use site_core::webhook::Dispatcher;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

mod channels;
mod cms;
mod error;
mod middleware;
mod routes;
mod state;

use crate::cms::CmsClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let settings = Settings::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&settings.database_url)
        .await?;
    site_db::MIGRATOR.run(&db).await?;

    let client = reqwest::Client::builder()
        .timeout(settings.channel_timeout() + Duration::from_secs(1))
        .build()?;

    let (notifiers, email) = channels::build(&settings, &client)?;
    let dispatcher = Dispatcher::new(
        settings.webhook_secret.clone(),
        settings.public_url.clone(),
        notifiers,
        settings.channel_timeout(),
    );
    let cms = CmsClient::new(client, settings.sanity.clone(), settings.is_production());

    info!(
        env = %settings.site_env,
        webhook_secret = settings.webhook_secret.is_some(),
        telegram = settings.telegram.is_some(),
        email = email.is_configured(),
        slack = settings.slack_webhook_url.is_some(),
        admin = settings.admin.is_some(),
        cms = cms.is_configured(),
        "configuration loaded"
    );

    let addr: SocketAddr = settings.api_bind.parse()?;
    let state = AppState {
        db,
        settings: Arc::new(settings),
        dispatcher: Arc::new(dispatcher),
        email,
        cms,
    };

    let app = routes::app(state);

    info!(%addr, "starting api");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
