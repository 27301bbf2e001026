use pretty_assertions::assert_eq;
use sus_rs::sus::prelude::*;

const HEADER: &str = "#BPM01: 120\n#00002: 4\n#00008: 01\n";

fn parse_body(body: &str, config: ParseConfig) -> Result<SusOutput> {
    parse_sus_with_config(&format!("{HEADER}{body}"), config)
}

fn unpaired(err: &SusErrorWithRange) -> Option<(u32, SlideFault)> {
    match err.content() {
        &SusError::UnpairedSlideFragment { channel, reason } => Some((channel, reason)),
        _ => None,
    }
}

#[test]
fn test_slide_across_measures() {
    let SusOutput { timeline, .. } =
        parse_body("#001333: 0014\n#002333: 0000002a", default_config()).unwrap();
    let slides: Vec<_> = timeline.slides().copied().collect();
    assert_eq!(
        slides,
        vec![SlideSegment {
            start_left_lane: 3,
            start_width: 4,
            start_pos_beat: 6.0,
            start_pos_sec: 3.0,
            end_left_lane: 3,
            end_width: 10,
            end_pos_beat: 11.0,
            end_pos_sec: 5.5,
        }]
    );
}

#[test]
fn test_close_without_open() {
    let err = parse_body("#001333: 0024", default_config()).unwrap_err();
    assert_eq!(unpaired(&err), Some((3, SlideFault::NotOpened)));
    assert_eq!(err.line(), 4);
}

#[test]
fn test_unclosed_at_the_end() {
    let err = parse_body("#001333: 1400\n#002333: 2400\n#003335: 14", default_config())
        .unwrap_err();
    assert_eq!(unpaired(&err), Some((5, SlideFault::NeverClosed)));
    assert_eq!(err.line(), 6);
}

#[test]
fn test_open_overwritten() {
    let err = parse_body("#001333: 1400\n#001343: 0014", default_config()).unwrap_err();
    assert_eq!(unpaired(&err), Some((3, SlideFault::OverwrittenOpen)));
    assert_eq!(err.line(), 5);
}

#[test]
fn test_end_line_comes_first() {
    let SusOutput { timeline, .. } =
        parse_body("#002351: 0024\n#001331: 1400", default_config()).unwrap();
    let slides: Vec<_> = timeline.slides().copied().collect();
    assert_eq!(
        slides,
        vec![SlideSegment {
            start_left_lane: 3,
            start_width: 4,
            start_pos_beat: 4.0,
            start_pos_sec: 2.0,
            end_left_lane: 5,
            end_width: 4,
            end_pos_beat: 10.0,
            end_pos_sec: 5.0,
        }]
    );
}

#[test]
fn test_end_lane_listed_first_in_measure() {
    let SusOutput { timeline, .. } = parse_body(
        "#001351: 0024\n#00115: 0014\n#001331: 1400",
        default_config(),
    )
    .unwrap();
    let slides: Vec<_> = timeline
        .slides()
        .map(|slide| (slide.start_pos_beat, slide.end_pos_beat, slide.end_left_lane))
        .collect();
    assert_eq!(slides, vec![(4.0, 6.0, 5)]);
    assert_eq!(timeline.notes().len(), 2);
    assert_eq!(timeline.notes()[0].start_beat(), 4.0);
}

#[test]
fn test_end_before_start_in_beats() {
    let err = parse_body("#002333: 1400\n#001333: 2400", default_config()).unwrap_err();
    assert_eq!(unpaired(&err), Some((3, SlideFault::NotOpened)));
    assert_eq!(err.line(), 5);
}

#[test]
fn test_ties_keep_source_order() {
    let SusOutput { timeline, .. } = parse_body(
        "#00115: 14\n#00112: 14\n#001318: 1400\n#001348: 0024\n#00117: 14",
        default_config(),
    )
    .unwrap();
    let lanes: Vec<_> = timeline
        .notes()
        .iter()
        .map(|note| match note {
            Note::Tap(tap) => tap.left_lane,
            Note::Slide(slide) => slide.start_left_lane,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(lanes, vec![5, 2, 1, 7]);
    assert!(timeline.notes().iter().all(|note| note.start_sec() == 2.0));
}

#[test]
fn test_unsupported_families() {
    let body = "#00121: 1400\n#001401: 14\n#00151: 14\n#00110: 14";
    let SusOutput { timeline, warnings } = parse_body(body, default_config()).unwrap();
    assert_eq!(timeline.notes().len(), 1);
    assert_eq!(
        warnings
            .iter()
            .map(|warning| (warning.line(), warning.content().clone()))
            .collect::<Vec<_>>(),
        vec![
            (4, SusWarning::UnsupportedNoteFamily(NoteFamily::Hold)),
            (5, SusWarning::UnsupportedNoteFamily(NoteFamily::SlideVariant)),
            (6, SusWarning::UnsupportedNoteFamily(NoteFamily::Flick)),
        ]
    );

    let config = default_config().with_unsupported_family(UnsupportedFamilyPolicy::Error);
    let err = parse_body(body, config).unwrap_err();
    assert_eq!(
        err.content(),
        &SusError::UnsupportedNoteFamily(NoteFamily::Hold)
    );
    assert_eq!(err.line(), 4);
}

#[test]
fn test_assembler_steps() {
    let source = format!("{HEADER}#001331: 1400\n#002331: 2400");
    let LexOutput { directives } = parse_lex(&source, Radix::Base10).unwrap();
    let mut warnings = vec![];
    let measure_to_beat = MeasureToBeat::from_directives(&directives, &mut warnings).unwrap();
    let mut assembler = NoteAssembler::new(&measure_to_beat, UnsupportedFamilyPolicy::Ignore);

    for directive in directives.iter().rev() {
        assembler.process_line(directive, &mut warnings).unwrap();
    }
    assert!(warnings.is_empty());

    let notes = assembler.finish().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].start_beat(), 4.0);
}
