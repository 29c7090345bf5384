pub mod auth;
pub mod record;
pub mod user;

#[cfg(test)]
pub(crate) mod mock;
