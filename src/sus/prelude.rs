//! Prelude module for the SUS parser.
//!
//! This module re-exports all public types from the SUS module for convenient access.
//! You can use `use sus_rs::sus::prelude::*;` to import all SUS types at once.

// Re-export diagnostics from the crate level
#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_sus_error, emit_sus_warnings};

pub use super::{
    AnchorKind, ParseConfig, Result, SlideFault, SusError, SusErrorWithRange, SusOutput,
    SusWarning, SusWarningWithRange, UnsupportedFamilyPolicy,
    assemble::NoteAssembler,
    command::{
        Column, NoteFamily, Radix,
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
        time::{Measure, MeasurePosition},
    },
    default_config,
    finalize::finalize,
    lex::{
        Directive, DirectiveWithRange, LexOutput, classify,
        cursor::LineCursor,
        decode::{DecodedObj, ObjIter},
        parse_lex,
    },
    model::{BeatPerMeasureChange, BpmChange, Note, SlideSegment, SongInfo, TapNote, Timeline},
    parse_sus, parse_sus_lines, parse_sus_with_config,
    timeline::{Anchor, BeatToSec, MeasureToBeat, PiecewiseLinear, TempoTable},
};
