use pretty_assertions::assert_eq;
use sus_rs::sus::prelude::*;

#[test]
fn test_output_round_trip() {
    let source = include_str!("files/warnings.sus");
    let output = parse_sus(source).unwrap();

    let json = serde_json::to_string(&output).unwrap();
    let restored: SusOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, output);
}

#[test]
fn test_note_is_tagged() {
    let note = Note::Tap(TapNote {
        left_lane: 2,
        width: 4,
        pos_beat: 4.0,
        pos_sec: 2.0,
    });
    let value = serde_json::to_value(note).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "type": "tap",
            "left_lane": 2,
            "width": 4,
            "pos_beat": 4.0,
            "pos_sec": 2.0,
        })
    );
}

#[test]
fn test_error_serializes() {
    let err = parse_sus("#00002: 4\n#00008: 01").unwrap_err();
    let value = serde_json::to_value(err.content()).unwrap();
    assert_eq!(value, serde_json::json!({ "UndefinedTempoIndex": 1 }));
}
