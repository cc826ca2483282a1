pub mod alerts;
pub mod contact_messages;
pub mod orders;
pub mod products;
