//! # types
//!
//! Crate-wide types shared by the `dbc` and `candump` modules.

pub mod errors;
