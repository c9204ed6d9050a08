//! # dbc
//!
//! `dbc` is the module to work with .dbc files.
//! Use `dbc::parse::from_str(...)` or `dbc::parse::from_file(...)` to build a `Database`.
//! Record decoders (`BO_`, `SG_`, `CM_ SG_`, `VAL_`) live in `dbc::core`.

pub(crate) mod core;
pub mod parse;
pub mod types;
