use crate::dbc::core::strings::{is_identifier, take_quoted, take_token};
use crate::dbc::types::database::{SignalRef, ValueTable};

/// Parse a VAL_ line that defines a value table for a specific signal:
/// `VAL_ <MessageID> <SignalName> <value> "<desc>" ... ;`
///
/// Pairs are read until `;`, the end of the line, or the first pair that does
/// not parse. Entries with an empty description are skipped.
pub(crate) fn decode(line: &str) -> Option<(SignalRef, ValueTable)> {
    let (val, rest) = take_token(line)?;
    if val != "VAL_" {
        return None;
    }
    let (id_str, rest) = take_token(rest)?;
    let message_id: u32 = id_str.parse::<u32>().ok()?;
    let (signal_name, mut rest) = take_token(rest)?;
    if !is_identifier(signal_name) {
        return None;
    }

    // Collect pairs: numeric value followed by quoted description
    let mut table: ValueTable = ValueTable::new();
    loop {
        let trimmed: &str = rest.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(';') {
            break;
        }
        let Some((val_tok, after_val)) = take_token(trimmed) else {
            break;
        };
        let Ok(value) = val_tok.parse::<i64>() else {
            break;
        };
        let Some((desc, after_desc)) = take_quoted(after_val.trim_start()) else {
            break;
        };
        if !desc.is_empty() {
            table.insert(value, desc.to_string());
        }
        rest = after_desc;
    }

    Some((SignalRef::new(message_id, signal_name), table))
}
