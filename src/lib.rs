//! # can_decode
//!
//! Rust utilities for turning raw **CAN** frames into named, scaled, annotated
//! signal values using a DBC database.
//!
//! ## Highlights
//! - **DBC parser**: [`dbc::parse::from_str`] / [`dbc::parse::from_file`] build an
//!   immutable [`Database`] from `BO_`, `SG_`, `CM_ SG_` and `VAL_` records.
//!   Unknown or malformed lines are skipped.
//! - **Bit extraction**: [`extract_bits`] and [`to_signed`] for Intel and Motorola layouts;
//!   missing payload bytes read as zero.
//! - **Frame decoding**: [`decode_frame`] resolves the multiplexer switch by its raw value and
//!   annotates each signal as a [`SignalValue`] (label, comment, unit or bare number).
//! - **candump logs**: [`CandumpLine`], [`DecodedFrame`] and [`candump::parse::decode_log`]
//!   (optionally parallel, cancellable per batch).
//!
//! ## Example
//! ```
//! use can_decode::{dbc, decode_frame, SignalValue};
//!
//! let db = dbc::parse::from_str(r#"
//! BO_ 256 EngineData: 8 ECU
//!  SG_ RPM : 0|16@1+ (0.25,0) [0|16000] "rpm" Dash
//! "#);
//!
//! let decoded = decode_frame(&db, 256, &[0x10, 0x27]).expect("known message");
//! assert_eq!(
//!     decoded.get("RPM"),
//!     Some(&SignalValue::Unitful { value: 2500.0, unit: "rpm".to_string() })
//! );
//! assert!(decode_frame(&db, 0xFFFF, &[]).is_none());
//! ```

#[cfg(feature = "candump")]
pub mod candump;
#[cfg(feature = "dbc")]
pub mod dbc;
#[cfg(feature = "dbc")]
pub mod decode;
#[doc(hidden)]
pub mod types;

// Top-level re-exports (appear under Crate Items → Structs)
#[cfg(feature = "dbc")]
#[doc(inline)]
pub use crate::{
    dbc::types::{
        database::{Database, SignalRef, ValueTable},
        message::{IdFormat, Message, format_id_hex},
        signal::{ByteOrder, MuxRole, Signal},
    },
    decode::{
        bits::{BitLayout, extract_bits, to_signed},
        frame::decode_frame,
        value::{DecodedSignals, SignalValue},
    },
};

#[cfg(feature = "candump")]
#[doc(inline)]
pub use crate::candump::{
    line::CandumpLine,
    parse::{LogDecode, decode_log},
    types::{decoded_frame::DecodedFrame, options::LogOptions},
};

#[doc(inline)]
pub use crate::types::errors::{CandumpError, DbcParseError};
