use crate::dbc::core::strings::{is_identifier, take_quoted, take_token};
use crate::dbc::types::database::SignalRef;

/// Parse a signal-level comment:
/// `CM_ SG_ <MessageID> <SignalName> "Comment...";`
///
/// `text` may span several lines (already joined by the caller). Empty
/// comments are dropped.
pub(crate) fn decode(text: &str) -> Option<(SignalRef, String)> {
    let (cm, rest) = take_token(text)?;
    let (sg, rest) = take_token(rest)?;
    if cm != "CM_" || sg != "SG_" {
        return None;
    }

    let (id_str, rest) = take_token(rest)?;
    let message_id: u32 = id_str.parse::<u32>().ok()?;
    let (signal_name, rest) = take_token(rest)?;
    if !is_identifier(signal_name) {
        return None;
    }

    let (comment, _) = take_quoted(rest.trim_start())?;
    if comment.is_empty() {
        return None;
    }

    let key: SignalRef = SignalRef::new(message_id, signal_name);
    Some((key, comment.to_string()))
}
