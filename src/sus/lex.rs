//! Directive classifier of SUS format.
//!
//! Raw [String] == [lex] ==> [`Directive`]s (in [`LexOutput`]) == [timeline](crate::sus::timeline) / [assemble](crate::sus::assemble) ==> [`Timeline`](crate::sus::model::Timeline)
//!
//! Every line is classified alone by fixed-position matching:
//!
//! - `#WAVEOFFSET 0.5` - the audio offset.
//! - `#BPMzz: 120` - a tempo-table entry, `zz` is a base-36 index.
//! - `#mmm02: 4` - beats per measure from the measure `mmm`.
//! - `#mmmcc: ZZZZ...` - a timed-data line on the measure `mmm` and the column `cc`.
//! - `#KEY value` - other metadata such as `#TITLE`.
//!
//! Other lines, such as comments, are ignored.

pub mod cursor;
pub mod decode;

use std::borrow::Cow;

use crate::{
    sus::{
        SusError, SusErrorWithRange,
        command::{Column, Radix, base36_digit, mixin::SourceRangeMixin, time::Measure},
    },
    util::StrExtension,
};

use self::{cursor::LineCursor, decode::is_valid_payload};

/// A directive classified from a line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum Directive<'a> {
    /// `#[key] [value]`. The key is uppercase and quotes around the value are removed.
    Metadata {
        /// String after `#` and until the first whitespace.
        key: Cow<'a, str>,
        /// String after the key and whitespaces.
        value: &'a str,
    },
    /// `#BPMzz: [bpm]`. Defines a tempo-table entry.
    TempoTableEntry {
        /// The base-36 index of the entry.
        index: u32,
        /// The tempo in beats per minute, always positive.
        bpm: f64,
    },
    /// `#WAVEOFFSET [seconds]`.
    WaveOffset(f64),
    /// `#mmm02: [beats]`. Sets beats per measure from the measure.
    TimeSignatureEntry {
        /// The measure where the change starts.
        measure: Measure,
        /// Beats per measure, always positive.
        beats_per_measure: f64,
    },
    /// `#mmmcc: ZZ...`. Places objects on the measure.
    TimedData {
        /// The measure where objects are.
        measure: Measure,
        /// The column code.
        column: Column,
        /// The sequence of 2-character codes, checked as an even-length alphanumeric string.
        payload: &'a str,
    },
    /// Lines without any meaning for this crate.
    Ignored,
}

/// A directive with position information.
pub type DirectiveWithRange<'a> = SourceRangeMixin<Directive<'a>>;

/// Lex Parsing Results, includes the classified directives.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LexOutput<'a> {
    /// Directives except [`Directive::Ignored`], in the order of lines.
    pub directives: Vec<DirectiveWithRange<'a>>,
}

/// Classifies all lines of the SUS format text.
///
/// # Errors
///
/// Returns [`SusError::MalformedLine`] on the first line which looks like a known directive but carries a broken value.
pub fn parse_lex(source: &str, measure_radix: Radix) -> Result<LexOutput<'_>, SusErrorWithRange> {
    let mut directives = vec![];
    for (line, range, text) in LineCursor::new(source) {
        match classify(text, measure_radix) {
            Ok(Directive::Ignored) => {}
            Ok(directive) => directives.push(SourceRangeMixin::new(directive, line, range)),
            Err(err) => return Err(SourceRangeMixin::new(err, line, range)),
        }
    }
    Ok(LexOutput { directives })
}

/// Classifies a line by itself.
///
/// # Errors
///
/// Returns [`SusError::MalformedLine`] if the line looks like a known directive but carries a broken value.
pub fn classify(line: &str, measure_radix: Radix) -> Result<Directive<'_>, SusError> {
    let line = line.trim();
    let Some(body) = line.strip_prefix('#') else {
        return Ok(Directive::Ignored);
    };

    if let Some(args) = body.strip_prefix_ignore_case("WAVEOFFSET") {
        if args.starts_with(char::is_whitespace) {
            let offset = parse_float(args, "wave offset")?;
            return Ok(Directive::WaveOffset(offset));
        }
    }

    match body.split_once(':') {
        Some((head, payload)) if !head.contains(char::is_whitespace) => {
            classify_with_colon(head, payload.trim(), measure_radix)
        }
        _ => Ok(classify_metadata(body)),
    }
}

fn classify_with_colon<'a>(
    head: &'a str,
    payload: &'a str,
    measure_radix: Radix,
) -> Result<Directive<'a>, SusError> {
    if let Some(index) = head.strip_prefix_ignore_case("BPM") {
        let mut digits = index.chars();
        let index = match (digits.next(), digits.next(), digits.next()) {
            (Some(hi), Some(lo), None) => base36_digit(hi)
                .zip(base36_digit(lo))
                .map(|(hi, lo)| hi * 36 + lo),
            _ => None,
        }
        .ok_or_else(|| malformed("expected 2-character base-36 tempo index"))?;
        let bpm = parse_float(payload, "tempo")?;
        if bpm <= 0.0 {
            return Err(malformed("tempo must be positive"));
        }
        return Ok(Directive::TempoTableEntry { index, bpm });
    }

    // `#mmm` is the 4-character head, then the column code follows.
    let (Some(measure), Some(code)) = (head.get(..3), head.get(3..)) else {
        return Ok(Directive::Ignored);
    };
    let Some(measure) = measure_radix.parse(measure).map(Measure) else {
        return Ok(Directive::Ignored);
    };
    let Some(column) = Column::parse(code) else {
        return if code.starts_with(['1', '3']) {
            Err(malformed(format!("broken column code `{code}`")))
        } else {
            Ok(Directive::Ignored)
        };
    };

    match column {
        Column::TimeSignature => {
            let beats_per_measure = parse_float(payload, "beats per measure")?;
            if beats_per_measure <= 0.0 {
                return Err(malformed("beats per measure must be positive"));
            }
            Ok(Directive::TimeSignatureEntry {
                measure,
                beats_per_measure,
            })
        }
        Column::OtherControl => Ok(Directive::Ignored),
        column => {
            if !is_valid_payload(payload) {
                return Err(malformed(
                    "expected an even-length sequence of alphanumeric codes",
                ));
            }
            Ok(Directive::TimedData {
                measure,
                column,
                payload,
            })
        }
    }
}

fn classify_metadata(body: &str) -> Directive<'_> {
    let (key, value) = body
        .split_once(char::is_whitespace)
        .unwrap_or((body, ""));
    if key.is_empty() {
        return Directive::Ignored;
    }
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    let key = if key.chars().any(|c| c.is_ascii_lowercase()) {
        Cow::Owned(key.to_ascii_uppercase())
    } else {
        Cow::Borrowed(key)
    };
    Directive::Metadata { key, value }
}

fn parse_float(text: &str, what: &str) -> Result<f64, SusError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| malformed(format!("expected a number as {what}")))
}

fn malformed(message: impl Into<String>) -> SusError {
    SusError::MalformedLine {
        message: message.into(),
    }
}
