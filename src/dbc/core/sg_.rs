use crate::dbc::core::strings::{is_identifier, take_quoted, take_token};
use crate::dbc::types::signal::{ByteOrder, MuxRole, Signal};

/// Decode a `SG_` line. The caller attaches it to the **current message**.
/// Format:
/// SG_ <name> [M|mX] : <bit_start>|<bit_length>@<endian><sign>
///     (<factor>,<offset>) [<min>|<max>] "<unit>" <receivers...>
///
/// Every section up to the unit is mandatory; receivers may be absent.
pub(crate) fn decode(line: &str) -> Option<Signal> {
    let line: &str = line.trim().trim_end_matches(';');
    let (left, right) = line.split_once(':')?;

    // Left part: SG_ NAME [M|mX]
    let mut left_it = left.split_ascii_whitespace();
    if left_it.next()? != "SG_" {
        return None;
    }
    let name: &str = left_it.next()?;
    if !is_identifier(name) {
        return None;
    }
    let mux: MuxRole = match left_it.next() {
        None => MuxRole::None,
        Some(tag) => decode_mux_tag(tag)?,
    };
    if left_it.next().is_some() {
        return None;
    }

    // 1) bit info: "63|1@1+"
    let (bit_info, rest) = take_token(right)?;
    let (pos_len, es) = bit_info.split_once('@')?;
    let (start, len) = pos_len.split_once('|')?;
    let start_bit: u16 = start.parse().ok()?;
    let length: u16 = len.parse().ok()?;
    let mut es_chars = es.chars();
    let byte_order: ByteOrder = ByteOrder::from_digit(es_chars.next()?)?;
    let signed: bool = match es_chars.next()? {
        '-' => true,
        '+' => false,
        _ => return None,
    };
    if es_chars.next().is_some() {
        return None;
    }

    // 2) "(factor,offset)"
    let (inner, rest) = take_delimited(rest, '(', ')')?;
    let (factor, offset) = inner.split_once(',')?;
    let factor: f64 = factor.trim().parse().ok()?;
    let offset: f64 = offset.trim().parse().ok()?;

    // 3) "[min|max]"
    let (inner, rest) = take_delimited(rest, '[', ']')?;
    let (min, max) = inner.split_once('|')?;
    let min: f64 = min.trim().parse().ok()?;
    let max: f64 = max.trim().parse().ok()?;

    // 4) "unit"
    let (unit, rest) = take_quoted(rest.trim_start())?;
    let unit: Option<String> = (!unit.is_empty()).then(|| unit.to_string());

    // 5) receivers (comma or space separated)
    let receivers: Vec<String> = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();

    Some(Signal {
        name: name.to_string(),
        start_bit,
        length,
        byte_order,
        signed,
        factor,
        offset,
        min,
        max,
        unit,
        receivers,
        mux,
    })
}

/// `M` → switch, `m<N>` → group N. Anything else (including extended `m1M`) is rejected.
fn decode_mux_tag(tag: &str) -> Option<MuxRole> {
    if tag == "M" {
        return Some(MuxRole::Multiplexor);
    }
    let group: &str = tag.strip_prefix('m')?;
    if group.is_empty() || !group.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    group.parse::<u64>().ok().map(MuxRole::Multiplexed)
}

/// Takes `<open>...<close>` off the front of `s` (leading whitespace skipped).
fn take_delimited(s: &str, open: char, close: char) -> Option<(&str, &str)> {
    let body: &str = s.trim_start().strip_prefix(open)?;
    let end: usize = body.find(close)?;
    Some((&body[..end], &body[end + close.len_utf8()..]))
}
