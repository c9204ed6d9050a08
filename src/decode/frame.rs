use crate::dbc::types::{
    database::{Database, SignalRef},
    message::Message,
    signal::{MuxRole, Signal},
};
use crate::decode::value::{DecodedSignals, SignalValue};

/// Decodes one frame against `db`.
///
/// Returns `None` when `message_id` is not defined or its message has no
/// signals. Otherwise:
/// 1. the multiplexer switch (if any) is decoded first and always included;
///    its **raw** value selects the active group;
/// 2. every other signal is included unless it is `mN` with `N` different
///    from the switch raw value (or the message has no switch);
/// 3. each value is `raw * factor + offset`, with `raw` sign-extended for
///    signed signals;
/// 4. the value is annotated with label / comment / unit, see [`SignalValue`].
///
/// Bytes missing from `payload` read as zero. The function is pure.
pub fn decode_frame(db: &Database, message_id: u32, payload: &[u8]) -> Option<DecodedSignals> {
    let message: &Message = db.message_by_id(message_id)?;
    if message.signals.is_empty() {
        return None;
    }

    let mut out: DecodedSignals = DecodedSignals::with_capacity(message.signals.len());

    let switch: Option<&Signal> = message.multiplexer();
    let selector: Option<i64> = switch.map(|sw| {
        let raw: i64 = sw.raw_value(payload);
        out.insert(&sw.name, annotate(db, message_id, sw, raw));
        raw
    });

    for signal in &message.signals {
        if switch.is_some_and(|sw| std::ptr::eq(sw, signal)) {
            continue;
        }
        if let MuxRole::Multiplexed(group) = signal.mux
            && !selector.is_some_and(|raw| u64::try_from(raw).is_ok_and(|r| r == group))
        {
            continue;
        }
        let raw: i64 = signal.raw_value(payload);
        out.insert(&signal.name, annotate(db, message_id, signal, raw));
    }

    Some(out)
}

/// Applies the annotation precedence: label, then comment, then unit.
/// Labels are looked up by the raw (unscaled) value.
fn annotate(db: &Database, message_id: u32, signal: &Signal, raw: i64) -> SignalValue {
    let value: f64 = signal.physical(raw);
    let key: SignalRef = SignalRef::new(message_id, &signal.name);
    let label: Option<&String> = db.value_table_by_ref(&key).and_then(|t| t.get(&raw));
    let comment: Option<&str> = db.signal_comment_by_ref(&key);

    match (label, comment, signal.unit.as_deref()) {
        (Some(label), comment, _) => SignalValue::Labeled {
            value,
            label: label.clone(),
            comment: comment.map(str::to_string),
        },
        (None, Some(comment), _) => SignalValue::Commented {
            value,
            comment: comment.to_string(),
        },
        (None, None, Some(unit)) => SignalValue::Unitful {
            value,
            unit: unit.to_string(),
        },
        (None, None, None) => SignalValue::Bare(value),
    }
}

impl Database {
    /// Same as [`decode_frame`] with `self` as the database.
    pub fn decode(&self, message_id: u32, payload: &[u8]) -> Option<DecodedSignals> {
        decode_frame(self, message_id, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbc::parse::from_str;

    const ENGINE: &str = r#"
BO_ 256 EngineData: 8 ECU
 SG_ RPM : 0|16@1+ (0.25,0) [0|16000] "rpm" Dash
 SG_ Gear : 16|4@1+ (1,0) [0|15] "" Dash
 SG_ Coolant : 24|8@1- (1,0) [-128|127] "" Dash
 SG_ Load : 32|8@1+ (0.5,0) [0|100] "" Dash

BO_ 512 Empty: 8 ECU

CM_ SG_ 256 Gear "Selected gear";
CM_ SG_ 256 Coolant "Coolant temperature";
VAL_ 256 Gear 0 "Park" 1 "Drive" ;
"#;

    const MUXED: &str = r#"
BO_ 768 Muxed: 8 ECU
 SG_ Counter : 56|8@1+ (1,0) [0|255] "" Dash
 SG_ Page M : 0|8@1+ (2,10) [0|255] "" Dash
 SG_ P0_A m0 : 8|8@1+ (1,0) [0|255] "" Dash
 SG_ P0_B m0 : 16|8@1+ (1,0) [0|255] "" Dash
 SG_ P1_A m1 : 8|16@1+ (1,0) [0|65535] "" Dash
 SG_ P2_A m2 : 8|8@1- (1,0) [-128|127] "V" Dash
"#;

    #[test]
    fn end_to_end_rpm() {
        let db = from_str(ENGINE);
        let out = decode_frame(&db, 256, &[0x10, 0x27, 0, 0, 0, 0, 0, 0]).expect("known id");
        assert_eq!(
            out.get("RPM"),
            Some(&SignalValue::Unitful {
                value: 2500.0,
                unit: "rpm".into(),
            })
        );
    }

    #[test]
    fn label_wins_and_keeps_comment() {
        let db = from_str(ENGINE);
        let out = decode_frame(&db, 256, &[0, 0, 0x01, 0, 0, 0, 0, 0]).expect("known id");
        assert_eq!(
            out.get("Gear"),
            Some(&SignalValue::Labeled {
                value: 1.0,
                label: "Drive".into(),
                comment: Some("Selected gear".into()),
            })
        );
    }

    #[test]
    fn comment_used_when_no_label_matches() {
        let db = from_str(ENGINE);
        let out = decode_frame(&db, 256, &[0, 0, 0x07, 0xFE, 0, 0, 0, 0]).expect("known id");
        assert_eq!(
            out.get("Gear"),
            Some(&SignalValue::Commented {
                value: 7.0,
                comment: "Selected gear".into(),
            })
        );
        // signed 8-bit 0xFE = -2
        assert_eq!(
            out.get("Coolant"),
            Some(&SignalValue::Commented {
                value: -2.0,
                comment: "Coolant temperature".into(),
            })
        );
        assert_eq!(out.get("Load"), Some(&SignalValue::Bare(0.0)));
    }

    #[test]
    fn unknown_or_empty_message_is_none() {
        let db = from_str(ENGINE);
        assert_eq!(decode_frame(&db, 0xFFFF, &[1, 2, 3]), None);
        assert_eq!(decode_frame(&db, 512, &[1, 2, 3]), None);
    }

    #[test]
    fn truncated_payload_zero_fills() {
        let db = from_str(ENGINE);
        let out = decode_frame(&db, 256, &[0x10]).expect("known id");
        assert_eq!(out.get("RPM").map(SignalValue::value), Some(4.0));
        assert_eq!(out.get("Load"), Some(&SignalValue::Bare(0.0)));
        let empty = decode_frame(&db, 256, &[]).expect("known id");
        assert_eq!(empty.len(), 4);
    }

    #[test]
    fn mux_selects_exactly_one_group_by_raw_value() {
        let db = from_str(MUXED);

        // raw switch 1 (scaled 12): only page 1 present
        let out = decode_frame(&db, 768, &[1, 0x34, 0x12, 0, 0, 0, 0, 9]).expect("known id");
        let names: Vec<&str> = out.names().collect();
        assert_eq!(names, vec!["Page", "Counter", "P1_A"]);
        assert_eq!(out.get("Page"), Some(&SignalValue::Bare(12.0)));
        assert_eq!(out.get("P1_A"), Some(&SignalValue::Bare(f64::from(0x1234))));
        assert_eq!(out.get("Counter"), Some(&SignalValue::Bare(9.0)));

        let out = decode_frame(&db, 768, &[0, 5, 6, 0, 0, 0, 0, 0]).expect("known id");
        let names: Vec<&str> = out.names().collect();
        assert_eq!(names, vec!["Page", "Counter", "P0_A", "P0_B"]);

        let out = decode_frame(&db, 768, &[2, 0xFF, 0, 0, 0, 0, 0, 0]).expect("known id");
        assert_eq!(
            out.get("P2_A"),
            Some(&SignalValue::Unitful {
                value: -1.0,
                unit: "V".into(),
            })
        );
        assert!(!out.contains("P0_A") && !out.contains("P1_A"));
    }

    #[test]
    fn unmatched_switch_value_keeps_only_unconditional_signals() {
        let db = from_str(MUXED);
        let out = decode_frame(&db, 768, &[9, 0, 0, 0, 0, 0, 0, 0]).expect("known id");
        assert_eq!(out.names().collect::<Vec<_>>(), vec!["Page", "Counter"]);
    }

    #[test]
    fn group_signals_without_switch_are_dropped() {
        let db = from_str(
            "BO_ 1 A: 8 ECU\n\
             \x20SG_ Plain : 0|8@1+ (1,0) [0|255] \"\" X\n\
             \x20SG_ Grouped m0 : 8|8@1+ (1,0) [0|255] \"\" X\n",
        );
        let out = decode_frame(&db, 1, &[0; 8]).expect("known id");
        assert_eq!(out.names().collect::<Vec<_>>(), vec!["Plain"]);
    }

    #[test]
    fn signed_switch_never_matches_a_group() {
        let db = from_str(
            "BO_ 1 A: 8 ECU\n\
             \x20SG_ Sw M : 0|4@1- (1,0) [-8|7] \"\" X\n\
             \x20SG_ G15 m15 : 8|8@1+ (1,0) [0|255] \"\" X\n",
        );
        // raw bits 1111 sign-extend to -1, which is not group 15
        let out = decode_frame(&db, 1, &[0x0F, 0xAA]).expect("known id");
        assert_eq!(out.get("Sw"), Some(&SignalValue::Bare(-1.0)));
        assert!(!out.contains("G15"));
    }

    #[test]
    fn repeated_signal_name_keeps_first_position_and_last_value() {
        let db = from_str(
            "BO_ 1 A: 8 ECU\n\
             \x20SG_ Dup : 0|8@1+ (1,0) [0|255] \"\" X\n\
             \x20SG_ Other : 8|8@1+ (1,0) [0|255] \"\" X\n\
             \x20SG_ Dup : 16|8@1+ (1,0) [0|255] \"\" X\n",
        );
        let out = decode_frame(&db, 1, &[1, 2, 3]).expect("known id");
        assert_eq!(out.names().collect::<Vec<_>>(), vec!["Dup", "Other"]);
        assert_eq!(out.get("Dup"), Some(&SignalValue::Bare(3.0)));
    }

    #[test]
    fn decoding_is_deterministic() {
        let db = from_str(MUXED);
        let payload = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(db.decode(768, &payload), db.decode(768, &payload));
    }
}
