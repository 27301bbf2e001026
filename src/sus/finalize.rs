//! Finalizer, which puts everything on the wall clock and builds the [`Timeline`].

use crate::sus::{
    model::{Note, SongInfo, Timeline},
    timeline::{BeatToSec, MeasureToBeat},
};

/// Resolves the second positions of all objects, and sorts notes by their start time.
///
/// The sort is stable, so notes starting at the same time keep the order they were assembled in.
#[must_use]
pub fn finalize(
    info: SongInfo,
    mut notes: Vec<Note>,
    measure_to_beat: MeasureToBeat,
    beat_to_sec: &BeatToSec,
) -> Timeline {
    for note in &mut notes {
        match note {
            Note::Tap(tap) => tap.pos_sec = beat_to_sec.sec_at(tap.pos_beat),
            Note::Slide(slide) => {
                slide.start_pos_sec = beat_to_sec.sec_at(slide.start_pos_beat);
                slide.end_pos_sec = beat_to_sec.sec_at(slide.end_pos_beat);
            }
        }
    }
    notes.sort_by(|a, b| a.start_sec().total_cmp(&b.start_sec()));

    let mut beat_per_measure_changes = measure_to_beat.into_anchors();
    for change in &mut beat_per_measure_changes {
        change.pos_sec = beat_to_sec.sec_at(change.pos_beat);
    }

    log::debug!(
        "finalized {} notes, {} tempo changes and {} time signature changes",
        notes.len(),
        beat_to_sec.anchors().len(),
        beat_per_measure_changes.len()
    );
    Timeline {
        info,
        notes,
        bpm_changes: beat_to_sec.anchors().to_vec(),
        beat_per_measure_changes,
    }
}
