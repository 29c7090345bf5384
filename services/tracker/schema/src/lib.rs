//! SeaORM entities for the tracker service.

pub mod records;
pub mod users;
