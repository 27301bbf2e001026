use pretty_assertions::assert_eq;
use sus_rs::sus::prelude::*;

use super::assert_time_close;

fn first_tap(source: &str) -> TapNote {
    let SusOutput { timeline, .. } = parse_sus(source).unwrap();
    *timeline.taps().next().unwrap()
}

#[test]
fn test_wave_offset_moves_the_origin() {
    let tap = first_tap("#WAVEOFFSET 1.0\n#BPM01: 120\n#00002: 4\n#00008: 01\n#00110: 14");
    assert_eq!(tap.pos_beat, 4.0);
    assert_eq!(tap.pos_sec, 1.0);
}

#[test]
fn test_tap_in_the_middle_of_measure() {
    let tap = first_tap("#BPM01: 120\n#00002: 4\n#00008: 01\n#00210: 0014");
    assert_eq!(tap.pos_beat, 10.0);
    assert_eq!(tap.pos_sec, 5.0);
}

#[test]
fn test_tempo_change_in_the_middle_of_measure() {
    let SusOutput { timeline, .. } =
        parse_sus("#BPM01: 120\n#BPM02: 60\n#00002: 4\n#00008: 01\n#00108: 0002\n#00210: 14")
            .unwrap();
    assert_eq!(timeline.bpm_changes()[1].pos_beat, 6.0);
    assert_eq!(timeline.bpm_changes()[1].pos_sec, 3.0);
    assert_eq!(timeline.taps().next().unwrap().pos_sec, 5.0);
}

#[test]
fn test_time_signature_change() {
    let tap = first_tap("#BPM01: 120\n#00002: 4\n#00202: 3\n#00008: 01\n#00310: 14");
    assert_eq!(tap.pos_beat, 11.0);
    assert_eq!(tap.pos_sec, 5.5);
}

#[test]
fn test_tempo_defined_after_reference() {
    let tap = first_tap("#00008: 01\n#00110: 14\n#00002: 4\n#BPM01: 240");
    assert_time_close(1.0, tap.pos_sec, "tap");
}

#[test]
fn test_first_tempo_after_origin() {
    // The first tempo also rules before itself.
    let SusOutput { timeline, .. } =
        parse_sus("#BPM01: 60\n#00002: 4\n#00108: 01\n#00010: 14\n#00210: 14").unwrap();
    let secs: Vec<_> = timeline.taps().map(|tap| tap.pos_sec).collect();
    assert_eq!(secs, vec![0.0, 8.0]);
    assert_eq!(timeline.bpm_changes()[0].pos_sec, 4.0);
}

#[test]
fn test_undefined_tempo_index() {
    let err = parse_sus("#BPM01: 120\n#00002: 4\n#00008: 02").unwrap_err();
    assert_eq!(err.content(), &SusError::UndefinedTempoIndex(2));
    assert_eq!(err.line(), 3);
}

#[test]
fn test_duplicate_tempo_change() {
    let SusOutput { timeline, warnings } =
        parse_sus("#BPM01: 120\n#BPM02: 60\n#00002: 4\n#00008: 01\n#00008: 02").unwrap();
    assert_eq!(
        warnings
            .into_iter()
            .map(SourceRangeMixin::into_content)
            .collect::<Vec<_>>(),
        vec![SusWarning::DuplicateTempoChange(MeasurePosition::head_of(
            Measure(0)
        ))]
    );
    assert_eq!(timeline.bpm_changes().len(), 1);
    assert_eq!(timeline.bpm_changes()[0].bpm, 60.0);
}

#[test]
fn test_malformed_line_position() {
    let source = "#TITLE test\n#BPM01: fast\n";
    let err = parse_sus(source).unwrap_err();
    assert!(matches!(err.content(), SusError::MalformedLine { .. }));
    assert_eq!(err.line(), 2);
    assert_eq!(err.range(), 12..24);
}

#[test]
fn test_measure_radix() {
    let source = "#BPM01: 120\n#00002: 4\n#00008: 01\n#00z10: 14\n#01010: 14";
    let SusOutput { timeline, .. } = parse_sus(source).unwrap();
    let beats: Vec<_> = timeline.taps().map(|tap| tap.pos_beat).collect();
    assert_eq!(beats, vec![40.0]);

    let config = default_config().with_measure_radix(Radix::Base36);
    let SusOutput { timeline, .. } = parse_sus_with_config(source, config).unwrap();
    let beats: Vec<_> = timeline.taps().map(|tap| tap.pos_beat).collect();
    assert_eq!(beats, vec![140.0, 144.0]);
}

#[test]
fn test_mappings_are_monotonic() {
    let source = include_str!("files/long_slides.sus");
    let LexOutput { directives } = parse_lex(source, Radix::Base10).unwrap();
    let mut warnings = vec![];
    let measure_to_beat = MeasureToBeat::from_directives(&directives, &mut warnings).unwrap();
    let mut tempo_table = TempoTable::from_directives(&directives, &mut warnings);
    let bpm_changes = tempo_table
        .place_changes(&directives, &measure_to_beat, &mut warnings)
        .unwrap();
    let beat_to_sec = BeatToSec::from_bpm_changes(bpm_changes, 0.5).unwrap();
    assert_eq!(warnings, vec![]);

    let mut last = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for measure in 0..8 {
        for numerator in 0..12 {
            let position = MeasurePosition::new(Measure(measure), numerator, 12).unwrap();
            let beat = measure_to_beat.beat_at(position);
            let sec = beat_to_sec.sec_at(beat);
            assert!(last.0 <= beat && last.1 <= sec, "{position}: {beat}, {sec}");
            last = (beat, sec);
        }
    }
    for anchor in measure_to_beat.anchors() {
        assert_eq!(measure_to_beat.beat_at(anchor.pos_measure), anchor.pos_beat);
    }
    for anchor in beat_to_sec.anchors() {
        assert_eq!(beat_to_sec.sec_at(anchor.pos_beat), anchor.pos_sec);
    }
}
