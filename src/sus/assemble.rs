//! Note assembler, which places taps and pairs slide fragments.
//!
//! A slide segment is written as a start fragment (`1x`) and an end fragment (`2x`) sharing a channel. The two may be on different lines in any order of the source, so slide fragments are gathered first and paired in the order of their measure-space positions, ties kept in the order of the source. Open fragments are held in global and local channel maps while pairing:
//!
//! - A start fragment opens the channel in the map local to its line. It shadows the channel carried over from other lines until the last fragment of its line.
//! - An end fragment closes the channel in the local map of its line if any, otherwise the carried channel.
//! - After the last fragment of a line, its channel still open in the local map is carried over.

use std::collections::{BTreeMap, HashMap};

use crate::sus::{
    SlideFault, SusError, SusErrorWithRange, SusWarning, SusWarningWithRange,
    UnsupportedFamilyPolicy,
    command::{
        Column, base36_digit,
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
        time::{Measure, MeasurePosition},
    },
    lex::{
        Directive, DirectiveWithRange,
        decode::{DecodedObj, ObjIter},
    },
    model::{Note, SlideSegment, TapNote},
    push_warning,
    timeline::MeasureToBeat,
};

/// The kind of a slide fragment which opens a segment.
const SLIDE_START: char = '1';
/// The kind of a slide fragment which closes a segment.
const SLIDE_END: char = '2';

/// The index of the source line among the processed lines, and of the slot in the line.
type ScanOrder = (usize, u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentKind {
    Start,
    End,
}

/// A start or end fragment of a slide, waiting to be paired.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlideFragment {
    kind: FragmentKind,
    channel: u32,
    left_lane: u32,
    width: u32,
    position: MeasurePosition,
    pos_beat: f64,
    order: ScanOrder,
}

impl SlideFragment {
    const fn line_index(&self) -> usize {
        self.order.0
    }
}

fn unpaired(fragment: &SourceRangeMixin<SlideFragment>, reason: SlideFault) -> SusErrorWithRange {
    SusError::UnpairedSlideFragment {
        channel: fragment.content().channel,
        reason,
    }
    .into_wrapper(fragment)
}

/// Open start fragments while pairing.
#[derive(Debug, Default)]
struct ChannelState {
    /// Opened on lines whose fragments are all paired, keyed by the channel.
    carried: BTreeMap<u32, SourceRangeMixin<SlideFragment>>,
    /// Opened on lines still having fragments to pair, keyed by the line index.
    local: BTreeMap<usize, SourceRangeMixin<SlideFragment>>,
}

impl ChannelState {
    fn pair(
        &mut self,
        fragment: SourceRangeMixin<SlideFragment>,
    ) -> Result<Option<(ScanOrder, SlideSegment)>, SusErrorWithRange> {
        let line_index = fragment.content().line_index();
        match fragment.content().kind {
            FragmentKind::Start => {
                if self.local.contains_key(&line_index) {
                    return Err(unpaired(&fragment, SlideFault::ReopenedInLine));
                }
                self.local.insert(line_index, fragment);
                Ok(None)
            }
            FragmentKind::End => {
                let end = fragment.content();
                let start = self
                    .local
                    .remove(&line_index)
                    .or_else(|| self.carried.remove(&end.channel))
                    .ok_or_else(|| unpaired(&fragment, SlideFault::NotOpened))?
                    .into_content();
                let segment = SlideSegment {
                    start_left_lane: start.left_lane,
                    start_width: start.width,
                    start_pos_beat: start.pos_beat,
                    start_pos_sec: 0.0,
                    end_left_lane: end.left_lane,
                    end_width: end.width,
                    end_pos_beat: end.pos_beat,
                    end_pos_sec: 0.0,
                };
                Ok(Some((start.order, segment)))
            }
        }
    }

    fn finish_line(&mut self, line_index: usize) -> Result<(), SusErrorWithRange> {
        let Some(open) = self.local.remove(&line_index) else {
            return Ok(());
        };
        let channel = open.content().channel;
        if self.carried.contains_key(&channel) {
            return Err(unpaired(&open, SlideFault::OverwrittenOpen));
        }
        self.carried.insert(channel, open);
        Ok(())
    }

    fn ensure_closed(&self) -> Result<(), SusErrorWithRange> {
        self.carried
            .values()
            .chain(self.local.values())
            .min_by_key(|open| open.start())
            .map_or(Ok(()), |open| Err(unpaired(open, SlideFault::NeverClosed)))
    }
}

/// Assembles notes from timed-data lines.
///
/// Taps are placed as their lines come, but slide fragments are paired in [`NoteAssembler::finish`] after all lines.
#[derive(Debug)]
pub struct NoteAssembler<'m> {
    measure_to_beat: &'m MeasureToBeat,
    unsupported_family: UnsupportedFamilyPolicy,
    processed_lines: usize,
    fragments: Vec<SourceRangeMixin<SlideFragment>>,
    notes: Vec<(ScanOrder, Note)>,
}

impl<'m> NoteAssembler<'m> {
    /// Creates an assembler placing notes with `measure_to_beat`.
    #[must_use]
    pub const fn new(measure_to_beat: &'m MeasureToBeat, unsupported_family: UnsupportedFamilyPolicy) -> Self {
        Self {
            measure_to_beat,
            unsupported_family,
            processed_lines: 0,
            fragments: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Processes a line. Lines other than tap, slide or unsupported note lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SusError::MalformedLine`] on a broken width, or [`SusError::UnsupportedNoteFamily`] if the policy rejects the family.
    pub fn process_line(
        &mut self,
        directive: &DirectiveWithRange<'_>,
        warnings: &mut Vec<SusWarningWithRange>,
    ) -> Result<(), SusErrorWithRange> {
        let &Directive::TimedData {
            measure,
            column,
            payload,
        } = directive.content()
        else {
            return Ok(());
        };
        let line_index = self.processed_lines;
        self.processed_lines += 1;
        match column {
            Column::Tap { lane } => {
                for obj in ObjIter::new(payload) {
                    let tap = TapNote {
                        left_lane: lane,
                        width: width_of(&obj).map_err(|err| err.into_wrapper(directive))?,
                        pos_beat: self.measure_to_beat.beat_at(obj.position(measure)),
                        pos_sec: 0.0,
                    };
                    self.notes.push(((line_index, obj.index), Note::Tap(tap)));
                }
            }
            Column::Slide { lane, channel } => {
                self.gather_fragments(directive, line_index, measure, lane, channel, payload)?;
            }
            Column::Unsupported(family) => match self.unsupported_family {
                UnsupportedFamilyPolicy::Ignore => push_warning(
                    warnings,
                    SusWarning::UnsupportedNoteFamily(family).into_wrapper(directive),
                ),
                UnsupportedFamilyPolicy::Error => {
                    return Err(SusError::UnsupportedNoteFamily(family).into_wrapper(directive));
                }
            },
            Column::TimeSignature | Column::TempoReference | Column::OtherControl => {}
        }
        Ok(())
    }

    fn gather_fragments(
        &mut self,
        directive: &DirectiveWithRange<'_>,
        line_index: usize,
        measure: Measure,
        lane: u32,
        channel: u32,
        payload: &str,
    ) -> Result<(), SusErrorWithRange> {
        for obj in ObjIter::new(payload) {
            let kind = match obj.kind() {
                SLIDE_START => FragmentKind::Start,
                SLIDE_END => FragmentKind::End,
                other => {
                    log::trace!(
                        "skipped slide point kind `{other}` on channel {channel} at line {}",
                        directive.line()
                    );
                    continue;
                }
            };
            let position = obj.position(measure);
            let fragment = SlideFragment {
                kind,
                channel,
                left_lane: lane,
                width: width_of(&obj).map_err(|err| err.into_wrapper(directive))?,
                position,
                pos_beat: self.measure_to_beat.beat_at(position),
                order: (line_index, obj.index),
            };
            self.fragments.push(fragment.into_wrapper(directive));
        }
        Ok(())
    }

    /// Pairs the gathered slide fragments and returns notes in the order of the source.
    ///
    /// # Errors
    ///
    /// Returns [`SusError::UnpairedSlideFragment`] on broken pairs of slide fragments. A channel still open at the end is reported at its start fragment.
    pub fn finish(self) -> Result<Vec<Note>, SusErrorWithRange> {
        let Self {
            mut fragments,
            mut notes,
            ..
        } = self;
        fragments.sort_by_key(|fragment| fragment.content().position);
        let last_of_line: HashMap<usize, usize> = fragments
            .iter()
            .enumerate()
            .map(|(index, fragment)| (fragment.content().line_index(), index))
            .collect();

        let mut state = ChannelState::default();
        let mut slides = 0;
        for (index, fragment) in fragments.into_iter().enumerate() {
            let line_index = fragment.content().line_index();
            if let Some((order, segment)) = state.pair(fragment)? {
                notes.push((order, Note::Slide(segment)));
                slides += 1;
            }
            if last_of_line.get(&line_index) == Some(&index) {
                state.finish_line(line_index)?;
            }
        }
        state.ensure_closed()?;

        notes.sort_by_key(|&(order, _)| order);
        log::debug!("assembled {} notes with {slides} slide segments", notes.len());
        Ok(notes.into_iter().map(|(_, note)| note).collect())
    }
}

fn width_of(obj: &DecodedObj<'_>) -> Result<u32, SusError> {
    base36_digit(obj.param()).ok_or_else(|| SusError::MalformedLine {
        message: format!("expected base-36 width in `{}`", obj.code),
    })
}
