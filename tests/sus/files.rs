use pretty_assertions::assert_eq;
use sus_rs::sus::prelude::*;

use super::assert_time_close;

fn lanes_and_secs(timeline: &Timeline) -> Vec<(u32, f64)> {
    timeline
        .notes()
        .iter()
        .map(|note| match note {
            Note::Tap(tap) => (tap.left_lane, tap.pos_sec),
            Note::Slide(slide) => (slide.start_left_lane, slide.start_pos_sec),
            _ => unreachable!(),
        })
        .collect()
}

#[test]
fn test_simple() {
    let source = include_str!("files/simple.sus");
    let SusOutput { timeline, warnings } = parse_sus(source).unwrap();
    assert_eq!(warnings, vec![]);

    assert_eq!(timeline.info().title.as_deref(), Some("Simple Song"));
    assert_eq!(timeline.info().artist.as_deref(), Some("Someone"));
    assert_eq!(timeline.info().designer.as_deref(), Some("Chart Maker"));
    assert_eq!(timeline.info().wave_offset_sec, 0.0);

    let bpm_changes: Vec<_> = timeline
        .bpm_changes()
        .iter()
        .map(|change| (change.bpm, change.pos_beat, change.pos_sec))
        .collect();
    assert_eq!(bpm_changes, vec![(120.0, 0.0, 0.0), (240.0, 16.0, 8.0)]);

    assert_eq!(
        timeline.slides().copied().collect::<Vec<_>>(),
        vec![SlideSegment {
            start_left_lane: 3,
            start_width: 4,
            start_pos_beat: 4.0,
            start_pos_sec: 2.0,
            end_left_lane: 3,
            end_width: 4,
            end_pos_beat: 8.0,
            end_pos_sec: 4.0,
        }]
    );
    assert_eq!(
        lanes_and_secs(&timeline),
        vec![
            (3, 2.0),
            (0, 4.0),
            (0, 5.0),
            (2, 6.0),
            (3, 8.0),
            (3, 8.25),
            (3, 8.5),
            (3, 8.75),
        ]
    );
    assert!(timeline.taps().skip(3).all(|tap| tap.width == 3));
    assert_eq!(timeline.last_note_sec(), Some(8.75));
}

#[test]
fn test_warnings() {
    let source = include_str!("files/warnings.sus");
    let SusOutput { timeline, warnings } = parse_sus(source).unwrap();

    let warnings: Vec<_> = warnings
        .into_iter()
        .map(|warning| (warning.line(), warning.into_content()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            (3, SusWarning::DuplicateTempoDefinition(1)),
            (4, SusWarning::UnusedTempoDefinition(3)),
            (6, SusWarning::DuplicateTimeSignature(Measure(0))),
            (8, SusWarning::UnsupportedNoteFamily(NoteFamily::Hold)),
        ]
    );

    assert_eq!(timeline.bpm_changes()[0].bpm, 180.0);
    assert_eq!(timeline.beat_per_measure_changes()[0].beats_per_measure, 3.0);
    let tap = timeline.taps().next().unwrap();
    assert_eq!(tap.pos_beat, 3.0);
    assert_time_close(1.0, tap.pos_sec, "tap");
    assert_eq!(timeline.notes().len(), 1);
}

#[test]
fn test_long_slides() {
    let source = include_str!("files/long_slides.sus");
    let SusOutput { timeline, warnings } = parse_sus(source).unwrap();
    assert_eq!(warnings, vec![]);
    assert_eq!(timeline.info().wave_offset_sec, 0.5);

    let signatures: Vec<_> = timeline
        .beat_per_measure_changes()
        .iter()
        .map(|change| (change.pos_measure, change.pos_beat))
        .collect();
    assert_eq!(
        signatures,
        vec![
            (MeasurePosition::head_of(Measure(0)), 0.0),
            (MeasurePosition::head_of(Measure(4)), 16.0),
        ]
    );
    assert_time_close(-0.5, timeline.beat_per_measure_changes()[0].pos_sec, "signature 0");
    assert_time_close(6.7, timeline.beat_per_measure_changes()[1].pos_sec, "signature 1");

    let tempo: Vec<_> = timeline
        .bpm_changes()
        .iter()
        .map(|change| (change.bpm, change.pos_beat))
        .collect();
    assert_eq!(tempo, vec![(150.0, 0.0), (75.0, 14.0), (150.0, 19.0)]);
    for (change, expected) in timeline.bpm_changes().iter().zip([-0.5, 5.1, 9.1]) {
        assert_time_close(expected, change.pos_sec, "tempo change");
    }

    let slides: Vec<_> = timeline
        .slides()
        .map(|slide| {
            (
                (slide.start_left_lane, slide.start_width),
                (slide.end_left_lane, slide.end_width),
            )
        })
        .collect();
    assert_eq!(
        slides,
        vec![((5, 4), (5, 4)), ((5, 4), (5, 4)), ((5, 4), (5, 3)), ((9, 4), (10, 4))]
    );
    let slide_beats = [(2.0, 5.5), (7.0, 32.0 / 3.0), (7.0, 12.0), (19.0, 19.75)];
    let slide_secs = [(0.3, 1.7), (2.3, -0.5 + 0.4 * 32.0 / 3.0), (2.3, 4.3), (9.1, 9.4)];
    for ((slide, (start_beat, end_beat)), (start_sec, end_sec)) in
        timeline.slides().zip(slide_beats).zip(slide_secs)
    {
        assert_time_close(start_beat, slide.start_pos_beat, "slide start beat");
        assert_time_close(end_beat, slide.end_pos_beat, "slide end beat");
        assert_time_close(start_sec, slide.start_pos_sec, "slide start");
        assert_time_close(end_sec, slide.end_pos_sec, "slide end");
        assert!(slide.start_pos_beat < slide.end_pos_beat);
    }

    let expected = [
        (5, 0.3),
        (5, 2.3),
        (5, 2.3),
        (4, 2.7),
        (4, 3.1),
        (4, 3.5),
        (4, 3.9),
        (0, 5.1),
        (0, 9.1),
        (9, 9.1),
        (0, 9.7),
    ];
    let notes = lanes_and_secs(&timeline);
    assert_eq!(notes.len(), expected.len());
    for (&(lane, sec), (expected_lane, expected_sec)) in notes.iter().zip(expected) {
        assert_eq!(lane, expected_lane);
        assert_time_close(expected_sec, sec, "note");
    }
    assert_time_close(9.7, timeline.last_note_sec().unwrap(), "last note");
}

#[test]
fn test_idempotent() {
    for source in [
        include_str!("files/simple.sus"),
        include_str!("files/warnings.sus"),
        include_str!("files/long_slides.sus"),
    ] {
        assert_eq!(parse_sus(source), parse_sus(source));
    }
}

#[test]
fn test_lines_and_crlf() {
    let source = include_str!("files/simple.sus");
    let from_lines = parse_sus_lines(source.lines(), default_config()).unwrap();
    let crlf = source.replace('\n', "\r\n");
    let from_crlf = parse_sus(&crlf).unwrap();
    let expected = parse_sus(source).unwrap();
    assert_eq!(from_lines.timeline, expected.timeline);
    assert_eq!(from_crlf.timeline, expected.timeline);
}
