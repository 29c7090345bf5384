pub mod auth;
pub mod extract;
pub mod health;
pub mod record;
pub mod user;
