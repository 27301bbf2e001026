//! Output models of the resolved song timeline.
//!
//! Every positioned object carries both a beat-space position and a wall-clock position in seconds. Beats are resolved first from measures, and seconds later by the [finalizer](crate::sus::finalize).

use crate::sus::command::time::MeasurePosition;

/// Descriptive information of the song.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SongInfo {
    /// `#TITLE`
    pub title: Option<String>,
    /// `#ARTIST`
    pub artist: Option<String>,
    /// `#DESIGNER`
    pub designer: Option<String>,
    /// `#WAVEOFFSET`. Seconds between the head of the audio and the beat 0, so that beat 0 is at `-wave_offset_sec`.
    pub wave_offset_sec: f64,
}

/// A change of beats per measure, from `#mmm02`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeatPerMeasureChange {
    /// Beats per measure after the change, always positive.
    pub beats_per_measure: f64,
    /// The measure where the change is.
    pub pos_measure: MeasurePosition,
    /// The position in beats.
    pub pos_beat: f64,
    /// The position in seconds.
    pub pos_sec: f64,
}

impl BeatPerMeasureChange {
    /// Creates a change whose beat and second positions are not resolved yet.
    #[must_use]
    pub const fn new(beats_per_measure: f64, pos_measure: MeasurePosition) -> Self {
        Self {
            beats_per_measure,
            pos_measure,
            pos_beat: 0.0,
            pos_sec: 0.0,
        }
    }
}

/// A change of tempo, placed by a tempo-table reference.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BpmChange {
    /// Beats per minute after the change, always positive.
    pub bpm: f64,
    /// The position in beats.
    pub pos_beat: f64,
    /// The position in seconds.
    pub pos_sec: f64,
}

impl BpmChange {
    /// Creates a change whose second position is not resolved yet.
    #[must_use]
    pub const fn new(bpm: f64, pos_beat: f64) -> Self {
        Self {
            bpm,
            pos_beat,
            pos_sec: 0.0,
        }
    }
}

/// A tap note.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TapNote {
    /// The leftmost lane the note covers.
    pub left_lane: u32,
    /// The number of lanes the note covers.
    pub width: u32,
    /// The position in beats.
    pub pos_beat: f64,
    /// The position in seconds.
    pub pos_sec: f64,
}

/// A two-point slide segment, from the start fragment to the end fragment on the same channel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlideSegment {
    /// The leftmost lane at the start.
    pub start_left_lane: u32,
    /// The width at the start.
    pub start_width: u32,
    /// The start position in beats.
    pub start_pos_beat: f64,
    /// The start position in seconds.
    pub start_pos_sec: f64,
    /// The leftmost lane at the end.
    pub end_left_lane: u32,
    /// The width at the end.
    pub end_width: u32,
    /// The end position in beats.
    pub end_pos_beat: f64,
    /// The end position in seconds.
    pub end_pos_sec: f64,
}

/// A note on the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
#[non_exhaustive]
pub enum Note {
    /// A tap note.
    Tap(TapNote),
    /// A slide segment.
    Slide(SlideSegment),
}

impl Note {
    /// The time in seconds where the note starts.
    #[must_use]
    pub const fn start_sec(&self) -> f64 {
        match self {
            Self::Tap(tap) => tap.pos_sec,
            Self::Slide(slide) => slide.start_pos_sec,
        }
    }

    /// The position in beats where the note starts.
    #[must_use]
    pub const fn start_beat(&self) -> f64 {
        match self {
            Self::Tap(tap) => tap.pos_beat,
            Self::Slide(slide) => slide.start_pos_beat,
        }
    }
}

/// The fully resolved song timeline.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timeline {
    pub(crate) info: SongInfo,
    pub(crate) notes: Vec<Note>,
    pub(crate) bpm_changes: Vec<BpmChange>,
    pub(crate) beat_per_measure_changes: Vec<BeatPerMeasureChange>,
}

impl Timeline {
    /// The song information.
    #[must_use]
    pub const fn info(&self) -> &SongInfo {
        &self.info
    }

    /// Notes, sorted by the start time. Notes starting at the same time are in the order of the source.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Tempo changes, sorted by the position.
    #[must_use]
    pub fn bpm_changes(&self) -> &[BpmChange] {
        &self.bpm_changes
    }

    /// Changes of beats per measure, sorted by the position.
    #[must_use]
    pub fn beat_per_measure_changes(&self) -> &[BeatPerMeasureChange] {
        &self.beat_per_measure_changes
    }

    /// Iterates tap notes in the order of [`Timeline::notes`].
    pub fn taps(&self) -> impl Iterator<Item = &TapNote> {
        self.notes.iter().filter_map(|note| match note {
            Note::Tap(tap) => Some(tap),
            Note::Slide(_) => None,
        })
    }

    /// Iterates slide segments in the order of [`Timeline::notes`].
    pub fn slides(&self) -> impl Iterator<Item = &SlideSegment> {
        self.notes.iter().filter_map(|note| match note {
            Note::Slide(slide) => Some(slide),
            Note::Tap(_) => None,
        })
    }

    /// The end time of the last note in seconds, or `None` if there is no note.
    #[must_use]
    pub fn last_note_sec(&self) -> Option<f64> {
        self.notes
            .iter()
            .map(|note| match note {
                Note::Tap(tap) => tap.pos_sec,
                Note::Slide(slide) => slide.end_pos_sec,
            })
            .max_by(f64::total_cmp)
    }
}
