//! The parser module of SUS (Sliding Universal Score) chart.
//!
//! The parsing runs in phases, and each phase owns its intermediate data:
//!
//! 1. [`lex`] classifies every line into a [`Directive`](lex::Directive), and [`lex::decode`] splits timed payloads into slots.
//! 2. [`timeline`] resolves time signatures into a measure-to-beat mapping, then tempo references into a beat-to-seconds mapping.
//! 3. [`assemble`] places taps and pairs slide fragments by their channels, in the order of their positions.
//! 4. [`finalize`] puts all objects on the wall clock and builds the [`Timeline`](model::Timeline).
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `&str` to input).
//! - Fail the whole parsing on a broken line or a broken slide pair, but warn on redundant definitions.
//! - Model only taps and two-point slide segments. Other note families are skipped or rejected by [`UnsupportedFamilyPolicy`].
//!
//! # Example
//!
//! ```
//! use sus_rs::sus::{SusOutput, parse_sus};
//!
//! let source = "#TITLE \"Test Song\"\n#BPM01: 120\n#00002: 4\n#00008: 01\n#00110: 14\n";
//! let SusOutput { timeline, warnings } = parse_sus(source)?;
//! assert_eq!(timeline.info().title.as_deref(), Some("Test Song"));
//! assert_eq!(timeline.notes()[0].start_sec(), 2.0);
//! assert!(warnings.is_empty());
//! # Ok::<(), sus_rs::sus::SusErrorWithRange>(())
//! ```

pub mod assemble;
pub mod command;
pub mod finalize;
pub mod lex;
pub mod model;
pub mod prelude;
pub mod timeline;

use itertools::Itertools;
use thiserror::Error;

use self::{
    assemble::NoteAssembler,
    command::{
        NoteFamily, Radix,
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
        time::{Measure, MeasurePosition},
    },
    finalize::finalize,
    lex::{Directive, DirectiveWithRange, LexOutput, cursor::LineCursor, parse_lex},
    model::{SongInfo, Timeline},
    timeline::{BeatToSec, MeasureToBeat, TempoTable},
};

/// Which anchor table a mapping is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorKind {
    /// `#mmm02` time signatures.
    TimeSignature,
    /// `#mmm08` tempo references.
    Tempo,
}

impl std::fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TimeSignature => f.write_str("time signature"),
            Self::Tempo => f.write_str("tempo"),
        }
    }
}

/// How a slide fragment failed to pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlideFault {
    /// An end fragment came while the channel is not open.
    #[error("end fragment without its start")]
    NotOpened,
    /// A start fragment came twice on the same line before an end.
    #[error("start fragment opened twice on a line")]
    ReopenedInLine,
    /// A start fragment left open on a line replaced the one still open from previous lines.
    #[error("start fragment overwrote the open one")]
    OverwrittenOpen,
    /// A start fragment is still open at the end of the chart.
    #[error("start fragment never closed")]
    NeverClosed,
}

/// A fatal error occurred when parsing the SUS format text.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SusError {
    /// The line looks like a known directive but its value is broken.
    #[error("malformed line: {message}")]
    MalformedLine {
        /// What is broken.
        message: String,
    },
    /// No anchor of the kind is defined, so the mapping cannot be built.
    #[error("no {0} is defined")]
    UndefinedAnchor(AnchorKind),
    /// A tempo reference points to the index without `#BPMzz` definition.
    #[error("undefined tempo index: {0}")]
    UndefinedTempoIndex(u32),
    /// A slide fragment could not be paired.
    #[error("unpaired slide fragment on channel {channel}: {reason}")]
    UnpairedSlideFragment {
        /// The channel of the fragment.
        channel: u32,
        /// How the pairing failed.
        reason: SlideFault,
    },
    /// A note family rejected by [`UnsupportedFamilyPolicy::Error`].
    #[error("unsupported note family: {0}")]
    UnsupportedNoteFamily(NoteFamily),
}

/// A [`SusError`] with the position of the line.
pub type SusErrorWithRange = SourceRangeMixin<SusError>;

/// The result type of SUS parsing.
pub type Result<T> = core::result::Result<T, SusErrorWithRange>;

/// A non-fatal problem found when parsing the SUS format text.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SusWarning {
    /// The line was skipped because its family is not modeled.
    #[error("skipped unsupported note family: {0}")]
    UnsupportedNoteFamily(NoteFamily),
    /// `#BPMzz` was defined again and the newer one is used.
    #[error("duplicating tempo definition: {0}")]
    DuplicateTempoDefinition(u32),
    /// `#mmm02` was defined again on the measure and the newer one is used.
    #[error("duplicating time signature on measure {0}")]
    DuplicateTimeSignature(Measure),
    /// Tempo references collided on the position and the newer one is used.
    #[error("duplicating tempo change at measure {0}")]
    DuplicateTempoChange(MeasurePosition),
    /// `#BPMzz` was defined but never referenced.
    #[error("unused tempo definition: {0}")]
    UnusedTempoDefinition(u32),
}

/// A [`SusWarning`] with the position of the line.
pub type SusWarningWithRange = SourceRangeMixin<SusWarning>;

/// Records a warning and logs it.
pub(crate) fn push_warning(warnings: &mut Vec<SusWarningWithRange>, warning: SusWarningWithRange) {
    log::warn!("{warning}");
    warnings.push(warning);
}

/// What to do with note families other than taps and slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnsupportedFamilyPolicy {
    /// Skip the line with [`SusWarning::UnsupportedNoteFamily`].
    #[default]
    Ignore,
    /// Fail with [`SusError::UnsupportedNoteFamily`].
    Error,
}

/// Options of the parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseConfig {
    /// The radix of the measure field in `#mmm`. It applies to the whole chart.
    pub measure_radix: Radix,
    /// What to do with unsupported note families.
    pub unsupported_family: UnsupportedFamilyPolicy,
}

impl ParseConfig {
    /// Sets the radix of the measure field.
    #[must_use]
    pub const fn with_measure_radix(mut self, measure_radix: Radix) -> Self {
        self.measure_radix = measure_radix;
        self
    }

    /// Sets the policy for unsupported note families.
    #[must_use]
    pub const fn with_unsupported_family(mut self, policy: UnsupportedFamilyPolicy) -> Self {
        self.unsupported_family = policy;
        self
    }
}

/// The default configuration: decimal measures and skipping unsupported families.
#[must_use]
pub fn default_config() -> ParseConfig {
    ParseConfig::default()
}

/// Output of parsing a SUS file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SusOutput {
    /// The resolved timeline.
    pub timeline: Timeline,
    /// Warnings that occurred during parsing, in the order of lines.
    pub warnings: Vec<SusWarningWithRange>,
}

/// Parses a SUS file from source text with [`default_config`].
///
/// # Errors
///
/// Returns the first fatal [`SusError`] with its position.
pub fn parse_sus(source: &str) -> Result<SusOutput> {
    parse_sus_with_config(source, default_config())
}

/// Parses a SUS file from lines. Positions in the result refer to the lines joined with `\n`.
///
/// # Errors
///
/// Returns the first fatal [`SusError`] with its position.
pub fn parse_sus_lines<I>(lines: I, config: ParseConfig) -> Result<SusOutput>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let source = lines
        .into_iter()
        .map(|line| line.as_ref().to_owned())
        .join("\n");
    parse_sus_with_config(&source, config)
}

/// Parses a SUS file from source text.
///
/// # Errors
///
/// Returns the first fatal [`SusError`] with its position. Errors not caused by a specific line, such as [`SusError::UndefinedAnchor`], are placed at the last non-blank line.
pub fn parse_sus_with_config(source: &str, config: ParseConfig) -> Result<SusOutput> {
    let LexOutput { directives } = parse_lex(source, config.measure_radix)?;
    log::debug!("classified {} directives", directives.len());
    let at_end = |err: SusError| end_of_source(source, err);

    let mut warnings = vec![];
    let info = collect_song_info(&directives);

    let measure_to_beat = MeasureToBeat::from_directives(&directives, &mut warnings).map_err(at_end)?;
    let mut tempo_table = TempoTable::from_directives(&directives, &mut warnings);
    let bpm_changes = tempo_table.place_changes(&directives, &measure_to_beat, &mut warnings)?;
    let beat_to_sec =
        BeatToSec::from_bpm_changes(bpm_changes, info.wave_offset_sec).map_err(at_end)?;

    let mut assembler = NoteAssembler::new(&measure_to_beat, config.unsupported_family);
    for directive in &directives {
        assembler.process_line(directive, &mut warnings)?;
    }
    let notes = assembler.finish()?;
    tempo_table.report_unused(&mut warnings);

    let timeline = finalize(info, notes, measure_to_beat, &beat_to_sec);
    warnings.sort_by_key(SourceRangeMixin::start);
    Ok(SusOutput { timeline, warnings })
}

fn collect_song_info(directives: &[DirectiveWithRange<'_>]) -> SongInfo {
    let mut info = SongInfo::default();
    for directive in directives {
        match directive.content() {
            Directive::Metadata { key, value } => {
                let slot = match &**key {
                    "TITLE" => &mut info.title,
                    "ARTIST" => &mut info.artist,
                    "DESIGNER" => &mut info.designer,
                    other => {
                        log::trace!("skipped metadata `{other}` at line {}", directive.line());
                        continue;
                    }
                };
                *slot = Some((*value).to_owned());
            }
            &Directive::WaveOffset(offset) => info.wave_offset_sec = offset,
            _ => {}
        }
    }
    info
}

fn end_of_source(source: &str, err: SusError) -> SusErrorWithRange {
    let (line, range) = LineCursor::new(source)
        .filter(|(_, _, text)| !text.trim().is_empty())
        .last()
        .map_or((1, 0..0), |(line, range, _)| (line, range));
    err.into_wrapper_range(line, range)
}
