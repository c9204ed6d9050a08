use crate::dbc::core::strings::{is_identifier, take_token};
use crate::dbc::types::message::Message;

/// Decode a `BO_` line using `:` as separator between name and length.
/// Accepts both: `BO_ 123 NAME: 8 Node` and `BO_ 123 NAME : 8 Node`.
///
/// Returns `None` when any of id, name, length or transmitter is missing or malformed.
pub(crate) fn decode(line: &str) -> Option<Message> {
    let after: &str = line.trim().strip_prefix("BO_")?;

    // 1) ID
    let (id_str, rest) = take_token(after)?;
    let id: u32 = id_str.parse::<u32>().ok()?;

    // 2) NAME (everything up to the first ':')
    let colon_pos: usize = rest.find(':')?;
    let name: &str = rest[..colon_pos].trim();
    if !is_identifier(name) {
        return None;
    }

    // 3) After ':' → <len> <transmitter>
    let (dlc_str, rest) = take_token(&rest[colon_pos + 1..])?;
    let dlc: u16 = dlc_str.parse::<u16>().ok()?;
    let (transmitter, _) = take_token(rest)?;
    let transmitter: &str = transmitter.trim_end_matches(';');
    if !is_identifier(transmitter) {
        return None;
    }

    Some(Message {
        id,
        name: name.to_string(),
        dlc,
        transmitter: transmitter.to_string(),
        signals: Vec::new(),
    })
}
