use std::sync::Arc;
use std::thread;

use can_decode::{
    ByteOrder, Database, DecodedFrame, LogOptions, SignalValue, dbc, decode_frame, decode_log,
    extract_bits, to_signed,
};

const VEHICLE_DBC: &str = r#"
VERSION ""

NS_ :
	CM_
	VAL_

BU_: ECU Dash Gateway

BO_ 256 EngineData: 8 ECU
 SG_ RPM : 0|16@1+ (0.25,0) [0|16000] "rpm" Dash
 SG_ Gear : 16|4@1+ (1,0) [0|15] "" Dash,Gateway
 SG_ OilTemp : 31|8@0- (1,40) [-88|167] "" Dash

BO_ 640 Diagnostics: 8 Gateway
 SG_ Page M : 0|8@1+ (1,0) [0|255] "" Dash
 SG_ Alive : 56|8@1+ (1,0) [0|255] "" Dash
 SG_ Voltage m0 : 8|16@1+ (0.001,0) [0|65.535] "V" Dash
 SG_ Current m1 : 8|16@1- (0.01,0) [-327.68|327.67] "A" Dash
 SG_ Fault m1 : 24|8@1+ (1,0) [0|255] "" Dash

CM_ SG_ 256 Gear "Currently engaged gear";
CM_ SG_ 256 OilTemp "Engine oil temperature";
CM_ SG_ 640 Fault "Active fault code";
VAL_ 256 Gear 0 "Park" 1 "Drive" ;
VAL_ 640 Fault 0 "No fault" 17 "Overcurrent" ;
"#;

fn db() -> Database {
    dbc::parse::from_str(VEHICLE_DBC)
}

#[test]
fn parsed_database_shape() {
    let db = db();
    assert_eq!(db.message_count(), 2);
    assert_eq!(db.signal_count(), 8);
    let transmitters: Vec<&str> = db.transmitters().collect();
    assert_eq!(transmitters, vec!["ECU", "Gateway"]);
    let diag = db.message_by_id(640).expect("Diagnostics");
    assert_eq!(diag.multiplexer().map(|s| s.name.as_str()), Some("Page"));
}

#[test]
fn byte_order_vectors_and_sign_extension() {
    assert_eq!(extract_bits(&[0xC3], 7, 8, ByteOrder::BigEndian), 0xC3);
    assert_eq!(extract_bits(&[0xC3], 0, 8, ByteOrder::LittleEndian), 0xC3);
    assert_eq!(to_signed(0b1111, 4), -1);
}

#[test]
fn engine_frame_end_to_end() {
    let db = db();
    // RPM 0x2710, Gear 1, OilTemp raw 0xFB (-5) → 35
    let out = decode_frame(&db, 256, &[0x10, 0x27, 0x01, 0xFB, 0, 0, 0, 0]).expect("known id");

    assert_eq!(
        out.get("RPM"),
        Some(&SignalValue::Unitful {
            value: 2500.0,
            unit: "rpm".into(),
        })
    );
    assert_eq!(
        out.get("Gear"),
        Some(&SignalValue::Labeled {
            value: 1.0,
            label: "Drive".into(),
            comment: Some("Currently engaged gear".into()),
        })
    );
    assert_eq!(
        out.get("OilTemp"),
        Some(&SignalValue::Commented {
            value: 35.0,
            comment: "Engine oil temperature".into(),
        })
    );
}

#[test]
fn multiplexed_groups_are_exclusive() {
    let db = db();

    let page0 = decode_frame(&db, 640, &[0, 0x88, 0x13, 0x11, 0, 0, 0, 1]).expect("known id");
    let names: Vec<&str> = page0.names().collect();
    assert_eq!(names, vec!["Page", "Alive", "Voltage"]);
    let voltage = page0.get("Voltage").map(SignalValue::value).expect("Voltage");
    assert!((voltage - 5.0).abs() < 1e-9);

    let page1 = decode_frame(&db, 640, &[1, 0x9C, 0xFF, 0x11, 0, 0, 0, 2]).expect("known id");
    let names: Vec<&str> = page1.names().collect();
    assert_eq!(names, vec!["Page", "Alive", "Current", "Fault"]);
    // 0xFF9C = -100 → -1.0 A
    let current = page1.get("Current").map(SignalValue::value).expect("Current");
    assert!((current + 1.0).abs() < 1e-9);
    let fault = page1.get("Fault").expect("Fault");
    assert_eq!(fault.label(), Some("Overcurrent"));
    assert_eq!(fault.comment(), Some("Active fault code"));
}

#[test]
fn unknown_id_is_none_not_an_error() {
    let db = db();
    assert!(decode_frame(&db, 0xFFFF, &[0xDE, 0xAD]).is_none());
}

#[test]
fn shared_database_decodes_concurrently() {
    let db: Arc<Database> = Arc::new(db());
    let expected = db.decode(256, &[0x10, 0x27, 0x01, 0xFB]);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = Arc::clone(&db);
            thread::spawn(move || db.decode(256, &[0x10, 0x27, 0x01, 0xFB]))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("worker"), expected);
    }
}

#[test]
fn candump_log_end_to_end() {
    let db = db();
    let text = "\
(1700000000.000000) can0 100#102701FB00000000
(1700000000.010000) can0 280#01
(1700000000.020000) can0 123#
garbage line
";
    let log = decode_log(&db, text, &LogOptions::new().with_parallel(true), None);
    assert_eq!(log.frames.len(), 3);
    assert_eq!(log.skipped, 1);

    let engine: &DecodedFrame = &log.frames[0];
    assert_eq!(engine.message.as_deref(), Some("EngineData"));
    assert_eq!(
        engine.summary,
        "RPM: 2500 rpm | Gear: Currently engaged gear Drive | OilTemp: Engine oil temperature 35"
    );

    // truncated diagnostics frame: only the switch byte is present
    let diag = &log.frames[1];
    let decoded = diag.decoded.as_ref().expect("decoded");
    let names: Vec<&str> = decoded.names().collect();
    assert_eq!(names, vec!["Page", "Alive", "Current", "Fault"]);
    let fault = decoded.get("Fault").expect("Fault");
    assert_eq!(fault.label(), Some("No fault"));

    let unknown = &log.frames[2];
    assert_eq!(unknown.id_hex, "123");
    assert_eq!(unknown.length, 0);
    assert!(unknown.decoded.is_none());
}
