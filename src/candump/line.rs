use chrono::{DateTime, Utc};
use std::fmt;

use crate::dbc::types::message::format_id_hex;

/// One raw frame as logged by `candump -l` / `candump -L`.
///
/// Example:
/// (1700000000.123456) can0 123#DEADBEEF
/// (1700000000.123456) can0 18FF50E5#
#[derive(Clone, Debug, PartialEq)]
pub struct CandumpLine {
    /// Unix timestamp in seconds.
    pub timestamp: f64,
    /// Interface name, e.g. `can0` or `vcan1`.
    pub interface: String,
    /// Numeric CAN id.
    pub id: u32,
    /// Payload bytes (possibly empty).
    pub data: Vec<u8>,
}

impl CandumpLine {
    /// Parses `(<ts>) <iface> <hexid>#<hexdata>`.
    ///
    /// Runs of whitespace are treated as a single space. The timestamp must be
    /// `<digits>.<digits>`, the id at least one hex digit, the data zero or more
    /// hex digits taken two at a time (a trailing odd digit becomes its own byte).
    /// Returns `None` for anything else.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let ts_tok: &str = parts.next()?;
        let interface: &str = parts.next()?;
        let frame_tok: &str = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        // check timestamp is "(digits.digits)"
        let ts: &str = ts_tok.strip_prefix('(')?.strip_suffix(')')?;
        let (secs, frac) = ts.split_once('.')?;
        if !is_digits(secs) || !is_digits(frac) {
            return None;
        }
        let timestamp: f64 = ts.parse().ok()?;

        let (id_hex, data_hex) = frame_tok.split_once('#')?;
        if id_hex.is_empty() || !id_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let id: u32 = u32::from_str_radix(id_hex, 16).ok()?;
        let data: Vec<u8> = parse_hex_bytes(data_hex)?;

        Some(CandumpLine {
            timestamp,
            interface: interface.to_string(),
            id,
            data,
        })
    }

    /// Timestamp as a UTC date-time, `None` if out of chrono's range.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let secs: i64 = self.timestamp.trunc() as i64;
        let nanos: u32 = ((self.timestamp.fract() * 1e9).round() as u32).min(999_999_999);
        DateTime::from_timestamp(secs, nanos)
    }

    /// Absolute time formatted as `%Y-%m-%d %H:%M:%S%.3f`.
    pub fn absolute_time(&self) -> Option<String> {
        self.timestamp_utc()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
    }

    /// Uppercase, space-free payload hex.
    pub fn data_hex(&self) -> String {
        self.data.iter().map(|b| format!("{:02X}", b)).collect()
    }

    /// Canonical id, see [`format_id_hex`].
    pub fn id_hex(&self) -> String {
        format_id_hex(self.id)
    }

    /// Formats the frame back into a candump line.
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CandumpLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}) {} {}#{}",
            self.timestamp,
            self.interface,
            self.id_hex(),
            self.data_hex()
        )
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn parse_hex_bytes(s: &str) -> Option<Vec<u8>> {
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| {
            let pair: &str = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}
