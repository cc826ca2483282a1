pub mod admin_auth;
pub mod locale;
pub mod request_id;
