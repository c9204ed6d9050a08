pub mod database;
pub mod message;
pub mod signal;
