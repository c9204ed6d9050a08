//! Record decoders, one per DBC keyword.
//!
//! Each decoder turns one (trimmed) record into a typed value or returns
//! `None`, in which case the dispatcher in [`crate::dbc::parse`] skips the line.

pub(crate) mod bo_;
pub(crate) mod comments;
pub(crate) mod sg_;
pub(crate) mod strings;
pub(crate) mod val_;
