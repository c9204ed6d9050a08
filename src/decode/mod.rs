//! # decode
//!
//! Payload → physical values: bit extraction, sign extension, multiplexer
//! resolution and annotation against a [`Database`](crate::Database).

pub mod bits;
pub mod frame;
pub mod value;
