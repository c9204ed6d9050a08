use serde::Serialize;

use crate::candump::line::CandumpLine;
use crate::dbc::types::{database::Database, message::Message};
use crate::decode::{frame::decode_frame, value::DecodedSignals};

/// A candump frame enriched with everything a log view needs.
///
/// `message`, `transmitter` and `decoded` are `None` when no database is
/// given or the id is unknown to it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedFrame {
    /// Unix timestamp in seconds.
    pub time: f64,
    /// `%Y-%m-%d %H:%M:%S%.3f` in UTC, empty if the timestamp is out of range.
    pub absolute_time: String,
    pub interface: String,
    pub id: u32,
    /// Uppercase id, zero-padded to 3 (standard) or 8 (extended) digits.
    pub id_hex: String,
    /// Message name from the database.
    pub message: Option<String>,
    /// Transmitter node from the database.
    pub transmitter: Option<String>,
    pub data: Vec<u8>,
    /// Uppercase, space-free payload hex.
    pub data_hex: String,
    /// Payload byte count.
    pub length: usize,
    pub decoded: Option<DecodedSignals>,
    /// `name: value | name: value`, empty when nothing was decoded.
    pub summary: String,
}

impl DecodedFrame {
    /// Parses one candump line and decodes it. `None` if the line is not a frame.
    pub fn from_line(db: Option<&Database>, line: &str) -> Option<Self> {
        CandumpLine::parse(line).map(|frame| Self::from_candump(db, frame))
    }

    /// Decodes an already parsed frame.
    pub fn from_candump(db: Option<&Database>, frame: CandumpLine) -> Self {
        let message: Option<&Message> = db.and_then(|db| db.message_by_id(frame.id));
        let decoded: Option<DecodedSignals> =
            db.and_then(|db| decode_frame(db, frame.id, &frame.data));
        let summary: String = decoded
            .as_ref()
            .map(DecodedSignals::summary)
            .unwrap_or_default();

        DecodedFrame {
            time: frame.timestamp,
            absolute_time: frame.absolute_time().unwrap_or_default(),
            id_hex: frame.id_hex(),
            data_hex: frame.data_hex(),
            length: frame.data.len(),
            message: message.map(|m| m.name.clone()),
            transmitter: message.map(|m| m.transmitter.clone()),
            interface: frame.interface,
            id: frame.id,
            data: frame.data,
            decoded,
            summary,
        }
    }

    /// The raw frame this record was built from, formatted as a candump line.
    pub fn to_line(&self) -> String {
        CandumpLine {
            timestamp: self.time,
            interface: self.interface.clone(),
            id: self.id,
            data: self.data.clone(),
        }
        .to_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::parse::from_str;

    const DBC: &str = r#"
BO_ 256 EngineData: 8 ECU
 SG_ RPM : 0|16@1+ (0.25,0) [0|16000] "rpm" Dash
 SG_ Gear : 16|4@1+ (1,0) [0|15] "" Dash
VAL_ 256 Gear 0 "Park" 1 "Drive" ;
"#;

    #[test]
    fn builds_full_record_with_database() {
        let db = from_str(DBC);
        let f = DecodedFrame::from_line(Some(&db), "(1700000000.000000) can0 100#1027010000000000")
            .expect("valid line");
        assert_eq!(f.id, 256);
        assert_eq!(f.id_hex, "100");
        assert_eq!(f.message.as_deref(), Some("EngineData"));
        assert_eq!(f.transmitter.as_deref(), Some("ECU"));
        assert_eq!(f.data_hex, "1027010000000000");
        assert_eq!(f.length, 8);
        assert_eq!(f.absolute_time, "2023-11-14 22:13:20.000");
        let decoded = f.decoded.as_ref().expect("decoded");
        let gear = decoded.get("Gear").expect("Gear");
        assert_eq!(gear.label(), Some("Drive"));
        assert_eq!(f.summary, "RPM: 2500 rpm | Gear: Drive");
    }

    #[test]
    fn unknown_id_keeps_raw_fields() {
        let db = from_str(DBC);
        let f = DecodedFrame::from_line(Some(&db), "(1.0) can1 7FF#").expect("valid line");
        assert_eq!(f.message, None);
        assert_eq!(f.transmitter, None);
        assert_eq!(f.decoded, None);
        assert_eq!(f.summary, "");
        assert_eq!(f.length, 0);
        assert_eq!(f.data_hex, "");
    }

    #[test]
    fn works_without_database() {
        let f = DecodedFrame::from_line(None, "(1.0) can0 100#10").expect("valid line");
        assert_eq!(f.decoded, None);
        assert_eq!(f.to_line(), "(1.000000) can0 100#10");
        assert!(DecodedFrame::from_line(None, "garbage").is_none());
    }
}
