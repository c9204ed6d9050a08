//! # candump
//!
//! Reading Linux `can-utils` candump logs (`(ts) iface id#data`).
//! Use `candump::parse::decode_log(...)` or `candump::parse::from_file(...)`
//! to decode a whole log, or [`DecodedFrame::from_line`](crate::DecodedFrame::from_line)
//! for a single line.

pub mod line;
pub mod parse;
pub mod types;
