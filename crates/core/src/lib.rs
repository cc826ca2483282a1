pub mod alerts;
pub mod auth;
pub mod config;
pub mod dedup;
pub mod i18n;
pub mod notify;
pub mod orders;
pub mod routing;
pub mod types;
pub mod webhook;
